//! Dashboard State Management
//!
//! Holds everything the dashboard renders: the loaded records, the selection
//! controller, the current [`DashboardView`], focus and cursor positions, and
//! the theme. Key handling lives here too so it can be exercised without a
//! terminal.

use crate::aggregator::DashboardView;
use crate::controller::SelectionController;
use crate::filter::{apply_filters, Dimension};
use crate::models::{ChangeTag, EnrichedRecord};
use crate::preferences::Theme;
use crossterm::event::{KeyCode, KeyModifiers};
use tracing::warn;

/// A focusable region of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Stability,
    Monthly,
    ChangeTypes,
    Repositories,
    Releases,
}

impl Pane {
    pub const ORDER: [Pane; 5] = [
        Pane::Stability,
        Pane::Monthly,
        Pane::ChangeTypes,
        Pane::Repositories,
        Pane::Releases,
    ];

    fn index(self) -> usize {
        Pane::ORDER.iter().position(|p| *p == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Pane::ORDER[(self.index() + 1) % Pane::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Pane::ORDER[(self.index() + Pane::ORDER.len() - 1) % Pane::ORDER.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            Pane::Stability => "Stability",
            Pane::Monthly => "Releases per month",
            Pane::ChangeTypes => "Changes by type",
            Pane::Repositories => "Avg working days (top 10)",
            Pane::Releases => "Releases",
        }
    }
}

/// Stability rows in the order they are drawn
pub const STABILITY_ROWS: [ChangeTag; 2] = [ChangeTag::Stable, ChangeTag::Prerelease];

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Reload,
    ThemeChanged(Theme),
}

#[derive(Debug)]
pub struct DashboardState {
    records: Vec<EnrichedRecord>,
    controller: SelectionController,
    view: DashboardView,
    focus: Pane,
    cursors: [usize; 5],
    theme: Theme,
    load_error: Option<String>,
    status: Option<String>,
}

impl DashboardState {
    pub fn new(records: Vec<EnrichedRecord>, page_size: usize, theme: Theme) -> Self {
        let controller = SelectionController::new(page_size);
        let view = DashboardView::compute(&records, controller.selection());
        Self {
            records,
            controller,
            view,
            focus: Pane::Releases,
            cursors: [0; 5],
            theme,
            load_error: None,
            status: None,
        }
    }

    /// State for a load that failed; only the error is shown
    pub fn failed(message: impl Into<String>, page_size: usize, theme: Theme) -> Self {
        let mut state = Self::new(Vec::new(), page_size, theme);
        state.load_error = Some(message.into());
        state
    }

    /// Swap in freshly loaded records, dropping the selection and cursors
    pub fn replace_records(&mut self, records: Vec<EnrichedRecord>) {
        self.records = records;
        self.controller = SelectionController::new(self.controller.page_size());
        self.cursors = [0; 5];
        self.load_error = None;
        self.status = Some(format!("Reloaded {} releases", self.records.len()));
        self.recompute();
    }

    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.load_error = Some(message.into());
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn focus(&self) -> Pane {
        self.focus
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn cursor(&self, pane: Pane) -> usize {
        self.cursors[pane.index()]
    }

    pub fn filtered(&self) -> Vec<&EnrichedRecord> {
        apply_filters(&self.records, self.controller.selection())
    }

    /// Rows of the current table page
    pub fn page_rows(&self) -> Vec<&EnrichedRecord> {
        let filtered = self.filtered();
        self.controller.page_slice(&filtered).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        self.controller.total_pages(self.filtered().len())
    }

    fn pane_len(&self, pane: Pane) -> usize {
        match pane {
            Pane::Stability => STABILITY_ROWS.len(),
            Pane::Monthly => self.view.monthly_frequency.len(),
            Pane::ChangeTypes => self.view.change_types.len(),
            Pane::Repositories => self.view.duration_ranking.len(),
            Pane::Releases => self.page_rows().len(),
        }
    }

    /// Rebuild the view after the selection or records changed
    fn recompute(&mut self) {
        self.view = DashboardView::compute(&self.records, self.controller.selection());
        for pane in Pane::ORDER {
            let len = self.pane_len(pane);
            let cursor = &mut self.cursors[pane.index()];
            *cursor = (*cursor).min(len.saturating_sub(1));
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn move_up(&mut self) {
        let cursor = &mut self.cursors[self.focus.index()];
        *cursor = cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.pane_len(self.focus);
        let cursor = &mut self.cursors[self.focus.index()];
        if *cursor + 1 < len {
            *cursor += 1;
        }
    }

    /// Toggle the filter behind the focused chart segment or table row
    pub fn activate(&mut self) {
        let cursor = self.cursor(self.focus);
        match self.focus {
            Pane::Stability => {
                self.controller.toggle_change_type(STABILITY_ROWS[cursor]);
            }
            Pane::Monthly => {
                let Some(month) = self.view.monthly_frequency.get(cursor) else {
                    return;
                };
                let month = month.month.clone();
                self.toggle(Dimension::Month, &month);
                return;
            }
            Pane::ChangeTypes => {
                let Some(total) = self.view.change_types.get(cursor) else {
                    return;
                };
                self.controller.toggle_change_type(total.change_type);
            }
            Pane::Repositories => {
                let Some(entry) = self.view.duration_ranking.get(cursor) else {
                    return;
                };
                let repo = entry.repo.clone();
                self.toggle(Dimension::Repository, &repo);
                return;
            }
            Pane::Releases => {
                self.toggle_row(Dimension::Repository);
                return;
            }
        }
        self.after_selection_change();
    }

    /// Toggle one attribute of the highlighted table row
    pub fn toggle_row(&mut self, dimension: Dimension) {
        let cursor = self.cursor(Pane::Releases);
        let value = match self.page_rows().get(cursor) {
            Some(record) => match dimension {
                Dimension::Repository => record.repo().to_string(),
                Dimension::Package => record.package().to_string(),
                Dimension::Author => record.author().to_string(),
                Dimension::Month => match record.month_label() {
                    Some(label) => label,
                    None => return,
                },
                Dimension::ChangeType => return,
            },
            None => return,
        };
        self.toggle(dimension, &value);
    }

    fn toggle(&mut self, dimension: Dimension, value: &str) {
        if let Err(e) = self.controller.toggle(dimension, value) {
            warn!(error = %e, "Ignoring invalid filter toggle");
            self.status = Some(e.to_string());
            return;
        }
        self.after_selection_change();
    }

    fn after_selection_change(&mut self) {
        self.cursors[Pane::Releases.index()] = 0;
        self.status = None;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.controller.clear();
        self.after_selection_change();
    }

    pub fn next_page(&mut self) {
        let rows = self.filtered().len();
        self.controller.next_page(rows);
        self.cursors[Pane::Releases.index()] = 0;
    }

    pub fn previous_page(&mut self) {
        let rows = self.filtered().len();
        self.controller.previous_page(rows);
        self.cursors[Pane::Releases.index()] = 0;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Apply a key press and report what the event loop must do next
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> Action {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('R') => return Action::Reload,
            KeyCode::Char('t') => return Action::ThemeChanged(self.toggle_theme()),
            _ => {}
        }

        // everything else needs data on screen
        if self.load_error.is_some() {
            return Action::None;
        }

        match code {
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_previous(),
            KeyCode::Up | KeyCode::Char('k') => self.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.move_down(),
            KeyCode::Left => self.previous_page(),
            KeyCode::Right => self.next_page(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('c') => self.clear_filters(),
            KeyCode::Char('r') if self.focus == Pane::Releases => {
                self.toggle_row(Dimension::Repository)
            }
            KeyCode::Char('p') if self.focus == Pane::Releases => {
                self.toggle_row(Dimension::Package)
            }
            KeyCode::Char('a') if self.focus == Pane::Releases => {
                self.toggle_row(Dimension::Author)
            }
            _ => {}
        }
        Action::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::ingest;

    const SAMPLE: &str = "id,repo,package_name,author,published_at_kst,is_prerelease,major_changes,minor_changes,working_days\n\
        1,app,app-core,kim,2024-01-05,false,['fix'],[],3\n\
        2,app,app-ui,lee,2024-02-01,true,[],['feat'],9\n\
        3,lib,lib-util,kim,2024-02-10,false,[],[],4\n";

    fn state() -> DashboardState {
        DashboardState::new(ingest(SAMPLE), 2, Theme::Light)
    }

    #[test]
    fn test_pane_cycle() {
        assert_eq!(Pane::Releases.next(), Pane::Stability);
        assert_eq!(Pane::Stability.previous(), Pane::Releases);
    }

    #[test]
    fn test_month_segment_toggles_filter() {
        let mut state = state();
        state.focus = Pane::Monthly;
        state.move_down(); // 2024-02
        state.activate();

        assert!(state.controller().selection().contains(Dimension::Month, "2024-02"));
        assert_eq!(state.view().kpis.total_releases, 2);

        // the only month left is the selected one; toggling it again clears it
        state.activate();
        assert!(state.controller().selection().is_empty());
        assert_eq!(state.view().kpis.total_releases, 3);
    }

    #[test]
    fn test_row_toggles_and_page_reset() {
        let mut state = state();
        state.next_page();
        assert_eq!(state.controller().page(), 2);

        state.handle_key(KeyCode::Char('a'), KeyModifiers::NONE);
        assert_eq!(state.controller().page(), 1);
        assert!(state.controller().selection().contains(Dimension::Author, "kim"));
        assert_eq!(state.view().kpis.total_releases, 2);

        state.handle_key(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(state.controller().selection().is_empty());
    }

    #[test]
    fn test_stability_segment_uses_tags() {
        let mut state = state();
        state.focus = Pane::Stability;
        state.move_down();
        state.activate();
        assert_eq!(state.view().stability.prerelease, 1);
        assert_eq!(state.view().stability.stable, 0);
    }

    #[test]
    fn test_error_state_only_accepts_global_keys() {
        let mut state = DashboardState::failed("404", 10, Theme::Dark);
        assert_eq!(state.handle_key(KeyCode::Tab, KeyModifiers::NONE), Action::None);
        assert_eq!(state.focus(), Pane::Releases);
        assert_eq!(
            state.handle_key(KeyCode::Char('R'), KeyModifiers::SHIFT),
            Action::Reload
        );
        assert_eq!(
            state.handle_key(KeyCode::Char('t'), KeyModifiers::NONE),
            Action::ThemeChanged(Theme::Light)
        );
        assert_eq!(
            state.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Action::Quit
        );
    }

    #[test]
    fn test_replace_records_resets_selection() {
        let mut state = state();
        state.handle_key(KeyCode::Char('r'), KeyModifiers::NONE);
        assert!(!state.controller().selection().is_empty());

        state.replace_records(ingest(SAMPLE));
        assert!(state.controller().selection().is_empty());
        assert_eq!(state.status(), Some("Reloaded 3 releases"));
    }
}
