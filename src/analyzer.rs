//! Release Analysis Engine
//!
//! [`ReleaseAnalyzer`] coordinates the pipeline behind every surface of the
//! tool:
//!
//! 1. **Load**: fetch the raw export text ([`crate::loader`])
//! 2. **Parse**: split it into [`RawRecord`]s ([`crate::parser`])
//! 3. **Enrich**: derive dates, tags and counts ([`crate::enricher`])
//! 4. **Filter + aggregate**: on demand, per selection ([`crate::aggregator`])
//!
//! The enriched records are immutable once loaded. A reload replaces them
//! wholesale; views are always recomputed from (records, selection).
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use release_dashboard::{FilterSelection, ReleaseAnalyzer};
//! use release_dashboard::loader::Source;
//!
//! # async fn example() -> release_dashboard::error::Result<()> {
//! let mut analyzer = ReleaseAnalyzer::new(Source::parse("data/releases.csv"), 30);
//! analyzer.load().await?;
//!
//! let view = analyzer.view(&FilterSelection::default());
//! println!("{} releases", view.kpis.total_releases);
//! # Ok(())
//! # }
//! ```

use crate::aggregator::DashboardView;
use crate::controller::SelectionController;
use crate::enricher::enrich_records;
use crate::error::Result;
use crate::filter::{apply_filters, FilterSelection};
use crate::loader::{load_text, Source};
use crate::logging::new_load_id;
use crate::models::{EnrichedRecord, RawRecord};
use crate::parser::parse_records;
use crate::reports::{ReportDisplayManager, TablePage};
use tracing::{info, info_span, warn, Instrument};

/// Parse and enrich raw export text in one step
pub fn ingest(text: &str) -> Vec<EnrichedRecord> {
    let raw: Vec<RawRecord> = parse_records(text);
    enrich_records(raw)
}

pub struct ReleaseAnalyzer {
    source: Source,
    timeout_secs: u64,
    records: Vec<EnrichedRecord>,
    display_manager: ReportDisplayManager,
}

impl ReleaseAnalyzer {
    pub fn new(source: Source, timeout_secs: u64) -> Self {
        Self {
            source,
            timeout_secs,
            records: Vec::new(),
            display_manager: ReportDisplayManager::new(),
        }
    }

    /// Analyzer over already-enriched records, with no source to reload from
    pub fn from_records(records: Vec<EnrichedRecord>) -> Self {
        Self {
            records,
            ..Self::new(Source::File(Default::default()), 1)
        }
    }

    pub fn with_json_pretty(mut self, pretty: bool) -> Self {
        self.display_manager = ReportDisplayManager::with_pretty_json(pretty);
        self
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Load, parse and enrich the source, replacing any previous records
    ///
    /// On failure the previous records are left untouched.
    pub async fn load(&mut self) -> Result<usize> {
        let span = info_span!("load", load_id = %new_load_id(), source = %self.source);
        let text = load_text(&self.source, self.timeout_secs)
            .instrument(span.clone())
            .await?;

        let _entered = span.enter();
        self.records = ingest(&text);
        info!(records = self.records.len(), "Release data ready");
        if self.records.is_empty() {
            warn!("No release records with a publish time were found");
        }
        Ok(self.records.len())
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EnrichedRecord> {
        self.records
    }

    pub fn filtered(&self, selection: &FilterSelection) -> Vec<&EnrichedRecord> {
        apply_filters(&self.records, selection)
    }

    /// Recompute every aggregate for `selection`
    pub fn view(&self, selection: &FilterSelection) -> DashboardView {
        DashboardView::compute(&self.records, selection)
    }

    /// The table page the controller currently points at
    pub fn table_page<'a>(&'a self, controller: &SelectionController) -> TablePage<'a> {
        let filtered = self.filtered(controller.selection());
        TablePage {
            page: controller.page(),
            total_pages: controller.total_pages(filtered.len()),
            total_rows: filtered.len(),
            rows: controller.page_slice(&filtered).to_vec(),
        }
    }

    pub fn run_summary(&self, selection: &FilterSelection, json_output: bool) -> Result<()> {
        let view = self.view(selection);
        self.display_manager
            .display_summary(&view, selection, json_output)
    }

    pub fn run_table(&self, controller: &SelectionController, json_output: bool) -> Result<()> {
        let page = self.table_page(controller);
        self.display_manager.display_table(&page, json_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Dimension;

    const SAMPLE: &str = "id,repo,package_name,author,published_at_kst,is_prerelease,major_changes,working_days\n\
        1,app,app-core,kim,2024-01-05,false,['fix'],3\n\
        2,app,app-core,lee,2024-02-01,true,[],9\n\
        3,lib,lib-util,kim,,false,[],4\n";

    #[test]
    fn test_ingest_drops_undated_rows() {
        let records = ingest(SAMPLE);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 2);
    }

    #[test]
    fn test_table_page_follows_controller() {
        let analyzer = ReleaseAnalyzer::from_records(ingest(SAMPLE));
        let mut controller = SelectionController::new(1);
        controller.set_page(2, 2);

        let page = analyzer.table_page(&controller);
        assert_eq!(page.total_rows, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, 1);

        controller.toggle(Dimension::Author, "lee").unwrap();
        let page = analyzer.table_page(&controller);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_rows, 1);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_records() {
        let mut analyzer = ReleaseAnalyzer::from_records(ingest(SAMPLE));
        assert!(analyzer.load().await.is_err());
        assert_eq!(analyzer.records().len(), 2);
    }
}
