use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use release_dashboard::config::Config;
use release_dashboard::loader::Source;
use release_dashboard::logging::init_logging;
use release_dashboard::{ChangeTag, FilterSelection, ReleaseAnalyzer, SelectionController};
use std::process;
use tracing::debug;

#[derive(Parser)]
#[command(name = "release-dashboard")]
#[command(about = "Explore release metadata: KPIs, charts and a cross-filtered release table")]
#[command(version)]
struct Cli {
    /// CSV export to read: a file path or an http(s) URL
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive dashboard (default)
    Dashboard,
    /// Print KPIs and chart data for the current filters
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Print one page of the filtered release table
    Table {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Page to show (1-based, clamped to the last page)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },
}

/// Filter flags; each may be repeated and values within one flag are OR-ed
#[derive(Args, Debug, Default, Clone)]
struct FilterArgs {
    /// Only releases from this repository
    #[arg(long = "repo", value_name = "REPO")]
    repos: Vec<String>,
    /// Only releases of this package
    #[arg(long = "package", value_name = "PACKAGE")]
    packages: Vec<String>,
    /// Only releases by this author
    #[arg(long = "author", value_name = "AUTHOR")]
    authors: Vec<String>,
    /// Only releases carrying this change tag (major, minor, patch, other-change, prerelease, stable, general-other)
    #[arg(long = "change-type", value_name = "TAG", value_parser = parse_change_type)]
    change_types: Vec<ChangeTag>,
    /// Only releases published in this month (YYYY-MM)
    #[arg(long = "month", value_name = "YYYY-MM")]
    months: Vec<String>,
}

fn parse_change_type(value: &str) -> std::result::Result<ChangeTag, String> {
    value.parse().map_err(|e: release_dashboard::DashboardError| e.to_string())
}

impl FilterArgs {
    fn into_selection(self) -> FilterSelection {
        FilterSelection {
            repositories: self.repos.into_iter().collect(),
            packages: self.packages.into_iter().collect(),
            authors: self.authors.into_iter().collect(),
            change_types: self.change_types.into_iter().collect(),
            months: self.months.into_iter().collect(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(source) = cli.source {
        config.source.location = source;
    }

    // Held for the whole run so file logs are flushed on exit
    let _log_guard = init_logging(&config.logging, &config.paths.log_directory);
    debug!(source = %config.source.location, "Configuration loaded");

    let source = Source::parse(&config.source.location);

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Summary { filters, json } => {
            let analyzer = load_or_exit(&config, source, json).await;
            let selection = filters.into_selection();
            if let Err(e) = analyzer.run_summary(&selection, json) {
                handle_error(e.into(), json);
            }
        }
        Commands::Table {
            filters,
            json,
            page,
            page_size,
        } => {
            let analyzer = load_or_exit(&config, source, json).await;
            let mut controller = SelectionController::with_selection(
                filters.into_selection(),
                page_size.unwrap_or(config.display.page_size),
            );
            let rows = analyzer.filtered(controller.selection()).len();
            controller.set_page(page, rows);
            if let Err(e) = analyzer.run_table(&controller, json) {
                handle_error(e.into(), json);
            }
        }
        Commands::Dashboard => run_interactive(config, source).await?,
    }

    Ok(())
}

async fn load_or_exit(config: &Config, source: Source, json: bool) -> ReleaseAnalyzer {
    let mut analyzer = ReleaseAnalyzer::new(source, config.source.timeout_secs)
        .with_json_pretty(config.output.json_pretty);
    if let Err(e) = analyzer.load().await {
        handle_error(e.into(), json);
    }
    analyzer
}

#[cfg(feature = "dashboard")]
async fn run_interactive(config: Config, source: Source) -> Result<()> {
    use release_dashboard::display::{run_dashboard, DashboardState, Reloader};
    use release_dashboard::preferences::ThemeStore;
    use tracing::error;

    let theme_store = ThemeStore::new(config.paths.preferences_file.clone());
    let theme = theme_store.load();
    let page_size = config.display.page_size;
    let timeout_secs = config.source.timeout_secs;

    let mut analyzer = ReleaseAnalyzer::new(source.clone(), timeout_secs);
    let loaded = analyzer.load().await;
    let state = match loaded {
        Ok(_) => DashboardState::new(analyzer.into_records(), page_size, theme),
        Err(e) => {
            error!(error = %e, "Initial load failed");
            DashboardState::failed(e.to_string(), page_size, theme)
        }
    };

    let handle = tokio::runtime::Handle::current();
    let reloader: Reloader = Box::new(move || {
        let mut analyzer = ReleaseAnalyzer::new(source.clone(), timeout_secs);
        handle.block_on(analyzer.load())?;
        Ok(analyzer.into_records())
    });

    tokio::task::spawn_blocking(move || run_dashboard(state, theme_store, reloader)).await??;
    Ok(())
}

#[cfg(not(feature = "dashboard"))]
async fn run_interactive(_config: Config, _source: Source) -> Result<()> {
    anyhow::bail!("built without the `dashboard` feature; use `summary` or `table`")
}

fn handle_error(e: anyhow::Error, json: bool) -> ! {
    if json {
        println!("{}", serde_json::json!({ "error": e.to_string() }));
    } else {
        eprintln!("Error: {}", e);
    }
    process::exit(1);
}
