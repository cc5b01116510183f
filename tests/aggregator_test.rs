//! Aggregates over filtered records

mod common;

use common::{csv_with_durations, SAMPLE_CSV};
use release_dashboard::aggregator::{Average, TOP_REPOSITORIES};
use release_dashboard::filter::Dimension;
use release_dashboard::{ingest, ChangeTag, DashboardView, FilterSelection};

#[test]
fn test_sample_view() {
    let records = ingest(SAMPLE_CSV);
    let view = DashboardView::compute(&records, &FilterSelection::new());

    assert_eq!(view.kpis.total_releases, 4);
    assert_eq!(view.kpis.repositories, 2);
    assert_eq!(view.kpis.authors, 3);
    // (3 + 9 + 4) / 3, the zero-day release is not counted
    assert_eq!(view.kpis.avg_working_days.to_string(), "5.3");

    assert_eq!(view.stability.stable, 3);
    assert_eq!(view.stability.prerelease, 1);

    let months: Vec<(&str, usize)> = view
        .monthly_frequency
        .iter()
        .map(|m| (m.month.as_str(), m.count))
        .collect();
    assert_eq!(months, vec![("2024-01", 1), ("2024-02", 2), ("2024-03", 1)]);

    let change_types: Vec<ChangeTag> = view.change_types.iter().map(|t| t.change_type).collect();
    assert_eq!(
        change_types,
        vec![
            ChangeTag::Major,
            ChangeTag::Minor,
            ChangeTag::Patch,
            ChangeTag::OtherChange
        ]
    );

    let ranking: Vec<(&str, f64)> = view
        .duration_ranking
        .iter()
        .map(|r| (r.repo.as_str(), r.avg_working_days))
        .collect();
    assert_eq!(ranking, vec![("app", 6.0), ("lib", 4.0)]);
}

#[test]
fn test_average_of_three_three_nine() {
    let records = ingest(&csv_with_durations(&[("app", 3), ("app", 3), ("app", 9)]));
    let view = DashboardView::compute(&records, &FilterSelection::new());

    assert_eq!(view.kpis.avg_working_days.to_string(), "5.0");
    assert_eq!(view.duration_ranking.len(), 1);
    assert_eq!(view.duration_ranking[0].avg_working_days, 5.0);
    assert_eq!(view.duration_ranking[0].releases, 3);
}

#[test]
fn test_no_working_days_is_not_applicable() {
    let records = ingest(&csv_with_durations(&[("app", 0), ("lib", 0)]));
    let view = DashboardView::compute(&records, &FilterSelection::new());

    assert_eq!(view.kpis.avg_working_days, Average(None));
    assert_eq!(view.kpis.avg_working_days.to_string(), "N/A");
    assert!(view.duration_ranking.is_empty());
}

#[test]
fn test_ranking_keeps_top_ten_in_descending_order() {
    let names: Vec<String> = (0..15).map(|i| format!("repo-{:02}", i)).collect();
    let rows: Vec<(&str, u32)> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), (i as u32 % 7) + 1))
        .collect();
    let records = ingest(&csv_with_durations(&rows));
    let view = DashboardView::compute(&records, &FilterSelection::new());

    assert_eq!(view.duration_ranking.len(), TOP_REPOSITORIES);
    assert!(view
        .duration_ranking
        .windows(2)
        .all(|pair| pair[0].avg_working_days >= pair[1].avg_working_days));
    assert_eq!(view.duration_ranking[0].avg_working_days, 7.0);
}

#[test]
fn test_zero_change_totals_are_omitted() {
    let records = ingest(SAMPLE_CSV);
    let mut selection = FilterSelection::new();
    selection.toggle(Dimension::Repository, "app").unwrap();

    let view = DashboardView::compute(&records, &selection);
    let change_types: Vec<ChangeTag> = view.change_types.iter().map(|t| t.change_type).collect();
    assert_eq!(change_types, vec![ChangeTag::Major, ChangeTag::Minor]);
}

#[test]
fn test_view_follows_selection() {
    let records = ingest(SAMPLE_CSV);
    let mut selection = FilterSelection::new();
    selection.toggle(Dimension::Month, "2024-02").unwrap();

    let view = DashboardView::compute(&records, &selection);
    assert_eq!(view.kpis.total_releases, 2);
    assert_eq!(view.monthly_frequency.len(), 1);
    assert_eq!(view.stability.prerelease, 1);

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["kpis"]["totalReleases"], 2);
    assert_eq!(json["kpis"]["avgWorkingDays"], "6.5");
}

#[test]
fn test_kpi_and_ranking_round_the_same_way() {
    // Mean of 1.25 sits exactly on a rounding tie
    let records = ingest(&csv_with_durations(&[("app", 1), ("app", 1), ("app", 1), ("app", 2)]));
    let view = DashboardView::compute(&records, &FilterSelection::new());

    assert_eq!(view.kpis.avg_working_days.to_string(), "1.3");
    assert_eq!(view.duration_ranking[0].avg_working_days, 1.3);
    assert_eq!(
        format!("{:.1}", view.duration_ranking[0].avg_working_days),
        view.kpis.avg_working_days.to_string()
    );
}

#[test]
fn test_ranking_ties_keep_first_appearance_order() {
    // Later rows are newer, so the newest-first records see mid, alpha, zeta
    let records = ingest(&csv_with_durations(&[
        ("zeta", 4),
        ("alpha", 3),
        ("alpha", 5),
        ("mid", 4),
        ("slow", 8),
    ]));
    let view = DashboardView::compute(&records, &FilterSelection::new());

    let order: Vec<&str> = view
        .duration_ranking
        .iter()
        .map(|r| r.repo.as_str())
        .collect();
    assert_eq!(order, vec!["slow", "mid", "alpha", "zeta"]);
}
