//! Interactive Dashboard
//!
//! The terminal user interface (TUI) for browsing releases. Every chart
//! works as a filter control: selecting a bar or row toggles that value in
//! the shared [`FilterSelection`](crate::filter::FilterSelection), and every
//! pane is recomputed from the filtered records.
//!
//! ## Core Components
//!
//! - [`DashboardState`] - records, selection, focus and key handling
//! - [`DashboardApp`] - terminal owner and event loop (ratatui + crossterm)
//! - [`render_dashboard`] - draws one frame from a state
//!
//! ## TUI Layout
//!
//! ```text
//! ┌─ Release Dashboard ──────────────────────────────────────────────┐
//! │ Releases: 42 | Repositories: 6 | Authors: 9 | Avg working days: 4.3 │
//! ├─ Filters (c to clear) ───────────────────────────────────────────┤
//! │ [repo: app] [change-type: major]                                 │
//! ├─ Stability ─┬─ Releases per month ───────┬─ Changes by type ─────┤
//! │ ██████ 80%  │ 2024-01 ████ 4             │ major ██ 2            │
//! │ > stable 8  │ 2024-02 ██████ 6           │ minor █████ 5         │
//! ├─ Avg working days (top 10) ─┬─ Releases - page 1/3 (←/→) ────────┤
//! │  1. app          6.0        │ Published  Repository  Package ... │
//! └─────────────────────────────┴────────────────────────────────────┘
//!  Tab focus  Enter filter  r/p/a row filter  t theme  R reload  q quit
//! ```

pub mod state;
pub mod tui;
pub mod widgets;

pub use state::{Action, DashboardState, Pane};
pub use tui::{run_dashboard, DashboardApp, Reloader};
pub use widgets::{render_dashboard, AppTheme};
