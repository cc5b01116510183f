//! Summary statistics over a filtered record set
//!
//! Every function here is a pure reduction. Nothing is cached: after the
//! selection or the source data changes, callers rebuild a [`DashboardView`]
//! from scratch with [`DashboardView::compute`].

use crate::filter::{apply_filters, FilterSelection};
use crate::models::{ChangeTag, EnrichedRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Number of repositories kept in the duration ranking
pub const TOP_REPOSITORIES: usize = 10;

/// Shown in place of an average when no record has a working-day count
pub const NOT_APPLICABLE: &str = "N/A";

/// Average with one decimal place, or "not applicable"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Average(pub Option<f64>);

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:.1}", round_one_decimal(value)),
            None => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for Average {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    #[serde(rename = "totalReleases")]
    pub total_releases: usize,
    pub repositories: usize,
    pub authors: usize,
    #[serde(rename = "avgWorkingDays")]
    pub avg_working_days: Average,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StabilityDistribution {
    pub prerelease: usize,
    pub stable: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeTypeTotal {
    #[serde(rename = "changeType")]
    pub change_type: ChangeTag,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryDuration {
    pub repo: String,
    #[serde(rename = "avgWorkingDays")]
    pub avg_working_days: f64,
    pub releases: usize,
}

pub fn compute_kpis(records: &[&EnrichedRecord]) -> Kpis {
    let repositories: HashSet<&str> = records.iter().map(|r| r.repo()).collect();
    let authors: HashSet<&str> = records.iter().map(|r| r.author()).collect();

    let durations: Vec<u32> = records
        .iter()
        .map(|r| r.working_days)
        .filter(|days| *days > 0)
        .collect();
    let avg_working_days = if durations.is_empty() {
        Average(None)
    } else {
        let sum: u64 = durations.iter().map(|d| u64::from(*d)).sum();
        Average(Some(sum as f64 / durations.len() as f64))
    };

    Kpis {
        total_releases: records.len(),
        repositories: repositories.len(),
        authors: authors.len(),
        avg_working_days,
    }
}

/// Prerelease vs stable, from the flag itself rather than the tag set
pub fn stability_distribution(records: &[&EnrichedRecord]) -> StabilityDistribution {
    let prerelease = records.iter().filter(|r| r.is_prerelease).count();
    StabilityDistribution {
        prerelease,
        stable: records.len() - prerelease,
    }
}

/// Releases per `YYYY-MM`, ascending; undated records are skipped
pub fn monthly_frequency(records: &[&EnrichedRecord]) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for label in records.iter().filter_map(|r| r.month_label()) {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

/// Summed change counts, zero totals omitted, in major/minor/patch/other order
pub fn change_type_totals(records: &[&EnrichedRecord]) -> Vec<ChangeTypeTotal> {
    let sum = |count: fn(&EnrichedRecord) -> usize| records.iter().map(|&r| count(r)).sum::<usize>();
    let totals = [
        (ChangeTag::Major, sum(|r| r.num_major_changes)),
        (ChangeTag::Minor, sum(|r| r.num_minor_changes)),
        (ChangeTag::Patch, sum(|r| r.num_patch_changes)),
        (ChangeTag::OtherChange, sum(|r| r.num_other_changes)),
    ];
    totals
        .into_iter()
        .filter(|(_, total)| *total > 0)
        .map(|(change_type, total)| ChangeTypeTotal { change_type, total })
        .collect()
}

/// Top repositories by average working days, highest first
///
/// Averages are rounded to one decimal before sorting; ties keep the order in
/// which repositories first appear.
pub fn repository_duration_ranking(records: &[&EnrichedRecord]) -> Vec<RepositoryDuration> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, (u64, usize)> = HashMap::new();

    for record in records.iter().filter(|r| r.working_days > 0) {
        let entry = groups.entry(record.repo()).or_insert_with(|| {
            order.push(record.repo());
            (0, 0)
        });
        entry.0 += u64::from(record.working_days);
        entry.1 += 1;
    }

    let mut ranking: Vec<RepositoryDuration> = order
        .into_iter()
        .map(|repo| {
            let (sum, releases) = groups[repo];
            RepositoryDuration {
                repo: repo.to_string(),
                avg_working_days: round_one_decimal(sum as f64 / releases as f64),
                releases,
            }
        })
        .collect();

    ranking.sort_by(|a, b| b.avg_working_days.total_cmp(&a.avg_working_days));
    ranking.truncate(TOP_REPOSITORIES);
    ranking
}

/// Half away from zero, shared by the KPI text and the ranking values
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Everything the presentation layer shows for one (records, selection) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub kpis: Kpis,
    pub stability: StabilityDistribution,
    #[serde(rename = "monthlyFrequency")]
    pub monthly_frequency: Vec<MonthlyCount>,
    #[serde(rename = "changeTypes")]
    pub change_types: Vec<ChangeTypeTotal>,
    #[serde(rename = "durationRanking")]
    pub duration_ranking: Vec<RepositoryDuration>,
}

impl DashboardView {
    /// Filter `records` with `selection` and recompute every aggregate
    pub fn compute(records: &[EnrichedRecord], selection: &FilterSelection) -> Self {
        let filtered = apply_filters(records, selection);
        Self::from_filtered(&filtered)
    }

    pub fn from_filtered(filtered: &[&EnrichedRecord]) -> Self {
        Self {
            kpis: compute_kpis(filtered),
            stability: stability_distribution(filtered),
            monthly_frequency: monthly_frequency(filtered),
            change_types: change_type_totals(filtered),
            duration_ranking: repository_duration_ranking(filtered),
        }
    }
}
