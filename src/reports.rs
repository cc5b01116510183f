//! Text and JSON reports
//!
//! Non-interactive output for the `summary` and `table` commands: colored
//! terminal text for people, JSON for scripts.

use crate::aggregator::DashboardView;
use crate::error::Result;
use crate::filter::FilterSelection;
use crate::models::{ChangeTag, EnrichedRecord};
use colored::Colorize;
use serde::Serialize;

/// One page of the filtered release table
#[derive(Debug, Clone, Serialize)]
pub struct TablePage<'a> {
    pub page: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
    #[serde(rename = "totalRows")]
    pub total_rows: usize,
    pub rows: Vec<&'a EnrichedRecord>,
}

/// Format a publish date for table cells
pub fn format_published(record: &EnrichedRecord) -> String {
    record
        .published_at
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Change tags of a record, without the stability tag
pub fn format_change_tags(record: &EnrichedRecord) -> String {
    record
        .tags
        .iter()
        .filter(|tag| !matches!(tag, ChangeTag::Prerelease | ChangeTag::Stable))
        .map(|tag| tag.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct ReportDisplayManager {
    pretty_json: bool,
}

impl Default for ReportDisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportDisplayManager {
    pub fn new() -> Self {
        Self { pretty_json: true }
    }

    pub fn with_pretty_json(pretty_json: bool) -> Self {
        Self { pretty_json }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = if self.pretty_json {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        Ok(rendered?)
    }

    pub fn display_summary(
        &self,
        view: &DashboardView,
        selection: &FilterSelection,
        json_output: bool,
    ) -> Result<()> {
        if json_output {
            let output = serde_json::json!({"filters": selection, "summary": view});
            println!("{}", self.to_json(&output)?);
            return Ok(());
        }

        println!("\n{}", "=".repeat(80).bright_cyan());
        println!("{}", "Release Dashboard - Summary".bright_white().bold());
        println!("{}", "=".repeat(80).bright_cyan());

        print_filters(selection);

        let kpis = &view.kpis;
        println!(
            "\n{} {} releases • {} repositories • {} authors • {} avg working days\n",
            "📊".bright_yellow(),
            kpis.total_releases.to_string().bright_white().bold(),
            kpis.repositories.to_string().bright_white().bold(),
            kpis.authors.to_string().bright_white().bold(),
            kpis.avg_working_days.to_string().bright_green().bold()
        );

        println!("{} Stability:", "🧪".bright_blue());
        println!(
            "   stable: {}   prerelease: {}",
            view.stability.stable.to_string().bright_green(),
            view.stability.prerelease.to_string().bright_yellow()
        );

        println!("\n{} Releases per month:", "📅".bright_blue());
        if view.monthly_frequency.is_empty() {
            println!("   {}", "no dated releases".dimmed());
        }
        let peak = view
            .monthly_frequency
            .iter()
            .map(|m| m.count)
            .max()
            .unwrap_or(0);
        for month in &view.monthly_frequency {
            println!(
                "   {}: {} {}",
                month.month.bright_white().bold(),
                bar(month.count, peak, 40).bright_cyan(),
                month.count
            );
        }

        println!("\n{} Changes by type:", "🔧".bright_blue());
        if view.change_types.is_empty() {
            println!("   {}", "no listed changes".dimmed());
        }
        for total in &view.change_types {
            println!(
                "   {}: {}",
                total.change_type.as_str().bright_cyan(),
                total.total.to_string().bright_white()
            );
        }

        println!("\n{} Slowest repositories (avg working days):", "⏱".bright_blue());
        if view.duration_ranking.is_empty() {
            println!("   {}", "no working-day data".dimmed());
        }
        for (rank, repo) in view.duration_ranking.iter().enumerate() {
            println!(
                "   {:>2}. {} {} ({} releases)",
                rank + 1,
                repo.repo.bright_cyan(),
                format!("{:.1}", repo.avg_working_days).bright_green(),
                repo.releases
            );
        }
        println!();

        Ok(())
    }

    pub fn display_table(&self, page: &TablePage<'_>, json_output: bool) -> Result<()> {
        if json_output {
            println!("{}", self.to_json(page)?);
            return Ok(());
        }

        println!(
            "\n{} Releases - page {} of {} ({} rows)\n",
            "📋".bright_yellow(),
            page.page.to_string().bright_white().bold(),
            page.total_pages.to_string().bright_white().bold(),
            page.total_rows.to_string().bright_white()
        );

        println!(
            "{:<16}  {:<20}  {:<20}  {:<12}  {:<14}  {:<10}  {:>4}  {}",
            "published", "repo", "package", "version", "author", "stability", "days", "changes"
        );
        println!("{}", "-".repeat(110).dimmed());

        if page.rows.is_empty() {
            println!("{}", "No releases match the current filters.".dimmed());
        }

        for record in &page.rows {
            let stability = if record.is_prerelease {
                "prerelease".yellow()
            } else {
                "stable".green()
            };
            println!(
                "{:<16}  {:<20}  {:<20}  {:<12}  {:<14}  {:<10}  {:>4}  {}",
                format_published(record),
                truncate(record.repo(), 20).bright_cyan(),
                truncate(record.package(), 20),
                truncate(record.version(), 12),
                truncate(record.author(), 14),
                stability,
                record.working_days,
                format_change_tags(record)
            );
        }
        println!();

        Ok(())
    }
}

fn print_filters(selection: &FilterSelection) {
    if selection.is_empty() {
        println!("{}", "Filters: none".dimmed());
        return;
    }
    let chips: Vec<String> = selection
        .chips()
        .into_iter()
        .map(|(dimension, value)| format!("{}={}", dimension, value))
        .collect();
    println!("Filters: {}", chips.join(", ").bright_yellow());
}

fn bar(value: usize, peak: usize, width: usize) -> String {
    if peak == 0 {
        return String::new();
    }
    let filled = (value * width).div_ceil(peak);
    "█".repeat(filled)
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-repository", 8), "a-very-…");
    }

    #[test]
    fn test_bar_scales_to_peak() {
        assert_eq!(bar(0, 0, 10), "");
        assert_eq!(bar(5, 10, 10).chars().count(), 5);
        assert_eq!(bar(10, 10, 10).chars().count(), 10);
        assert_eq!(bar(1, 10, 4).chars().count(), 1);
    }
}
