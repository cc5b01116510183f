//! Release Dashboard Library
//!
//! Analytics over a flat CSV export of software release metadata: one row
//! per published version of a package, with its repository, author, publish
//! time, prerelease flag, categorized change lists and working-day count.
//!
//! ## Core Features
//!
//! - **Lenient parsing**: header-driven CSV reading with list cells written
//!   as `['a', 'b']` and tolerance for missing columns
//! - **Enrichment**: publish timestamps, change-type tags and change counts
//!   derived once per load
//! - **Cross-filtering**: one selection over repository, package, author,
//!   change type and month that every view shares
//! - **Aggregation**: KPIs, stability split, monthly frequency, change-type
//!   totals and a top-10 ranking by average working days
//! - **Surfaces**: an interactive terminal dashboard plus `summary` and
//!   `table` reports in text or JSON
//!
//! ## Architecture Overview
//!
//! - [`loader`] - read the export from a file or an http(s) URL
//! - [`parser`] - CSV text to [`RawRecord`]s
//! - [`enricher`] - [`RawRecord`] to [`EnrichedRecord`]
//! - [`filter`] - [`FilterSelection`] and the filtering predicate
//! - [`aggregator`] - [`DashboardView`] and its parts
//! - [`controller`] - selection plus pagination for the table
//! - [`analyzer`] - [`ReleaseAnalyzer`], the pipeline coordinator
//! - [`reports`] - text and JSON output
//! - [`preferences`] - persisted theme
//! - [`config`] - configuration with environment variable support
//! - [`logging`] - structured logging with JSON and pretty-print formats
//! - `display` - the interactive TUI (feature `dashboard`)
//!
//! ## Main Entry Point
//!
//! ```rust
//! use release_dashboard::{ingest, DashboardView, FilterSelection};
//! use release_dashboard::filter::Dimension;
//!
//! let csv = "id,repo,published_at_kst,working_days\n1,app,2024-01-05,3\n2,lib,2024-02-01,9\n";
//! let records = ingest(csv);
//!
//! let mut selection = FilterSelection::new();
//! selection.toggle(Dimension::Repository, "app").unwrap();
//!
//! let view = DashboardView::compute(&records, &selection);
//! assert_eq!(view.kpis.total_releases, 1);
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod controller;
pub mod enricher;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod models;
pub mod parser;
pub mod preferences;
pub mod reports;
pub mod timestamp_parser;

#[cfg(feature = "dashboard")]
pub mod display;

pub use aggregator::DashboardView;
pub use analyzer::{ingest, ReleaseAnalyzer};
pub use controller::SelectionController;
pub use error::{DashboardError, Result};
pub use filter::FilterSelection;
pub use models::*;
