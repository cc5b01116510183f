//! Core Data Models
//!
//! This module defines the records that flow through the release analysis
//! pipeline, from raw CSV rows to enriched, classified release events.
//!
//! ## Data Flow
//!
//! 1. **Raw Data**: [`RawRecord`] - One row of the CSV export, fields kept as text
//! 2. **Enrichment**: [`EnrichedRecord`] - Parsed date, numeric fields,
//!    classification tags and change counts
//! 3. **Views**: see [`crate::aggregator`] for the derived summaries
//!
//! ## Classification
//!
//! Every enriched record carries a set of [`ChangeTag`]s. Exactly one of
//! `prerelease`/`stable` is always present. Each change list that is not empty
//! adds its tag, and `general-other` is added only when none of the four
//! change tags apply.

use crate::error::DashboardError;
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// CSV column names, in the order used when writing records back out
pub const COLUMNS: [&str; 15] = [
    "id",
    "repo",
    "package_name",
    "version",
    "author",
    "published_at_kst",
    "is_prerelease",
    "is_draft",
    "major_changes",
    "minor_changes",
    "patch_changes",
    "other_changes",
    "working_days",
    "year",
    "month",
];

/// Columns decoded as bracketed lists instead of plain text
pub const LIST_COLUMNS: [&str; 4] = [
    "major_changes",
    "minor_changes",
    "patch_changes",
    "other_changes",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub repo: String,
    pub package_name: String,
    pub version: String,
    pub author: String,
    pub published_at_kst: String,
    pub is_prerelease: String,
    pub is_draft: String,
    pub major_changes: Vec<String>,
    pub minor_changes: Vec<String>,
    pub patch_changes: Vec<String>,
    pub other_changes: Vec<String>,
    pub working_days: String,
    pub year: String,
    pub month: String,
}

impl RawRecord {
    /// Text value of a scalar column, `None` for list columns and unknown names
    pub fn scalar(&self, column: &str) -> Option<&str> {
        let value = match column {
            "id" => &self.id,
            "repo" => &self.repo,
            "package_name" => &self.package_name,
            "version" => &self.version,
            "author" => &self.author,
            "published_at_kst" => &self.published_at_kst,
            "is_prerelease" => &self.is_prerelease,
            "is_draft" => &self.is_draft,
            "working_days" => &self.working_days,
            "year" => &self.year,
            "month" => &self.month,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Items of a list column, `None` for scalar columns and unknown names
    pub fn list(&self, column: &str) -> Option<&[String]> {
        let value = match column {
            "major_changes" => &self.major_changes,
            "minor_changes" => &self.minor_changes,
            "patch_changes" => &self.patch_changes,
            "other_changes" => &self.other_changes,
            _ => return None,
        };
        Some(value.as_slice())
    }
}

/// Classification tag attached to an enriched record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeTag {
    Major,
    Minor,
    Patch,
    OtherChange,
    Prerelease,
    Stable,
    GeneralOther,
}

impl ChangeTag {
    pub const ALL: [ChangeTag; 7] = [
        ChangeTag::Major,
        ChangeTag::Minor,
        ChangeTag::Patch,
        ChangeTag::OtherChange,
        ChangeTag::Prerelease,
        ChangeTag::Stable,
        ChangeTag::GeneralOther,
    ];

    /// The four tags derived from change lists, in reporting order
    pub const CHANGE_KINDS: [ChangeTag; 4] = [
        ChangeTag::Major,
        ChangeTag::Minor,
        ChangeTag::Patch,
        ChangeTag::OtherChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeTag::Major => "major",
            ChangeTag::Minor => "minor",
            ChangeTag::Patch => "patch",
            ChangeTag::OtherChange => "other-change",
            ChangeTag::Prerelease => "prerelease",
            ChangeTag::Stable => "stable",
            ChangeTag::GeneralOther => "general-other",
        }
    }
}

impl fmt::Display for ChangeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeTag {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChangeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| DashboardError::InvalidChangeType(s.to_string()))
    }
}

/// A release event after enrichment; immutable once built
///
/// Serializes as one flat row: raw text columns plus the parsed values, with
/// each parsed column emitted once under its typed name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub raw: RawRecord,
    pub id: u64,
    pub working_days: u32,
    pub is_prerelease: bool,
    pub is_draft: bool,
    pub published_at: Option<NaiveDateTime>,
    pub tags: BTreeSet<ChangeTag>,
    pub num_major_changes: usize,
    pub num_minor_changes: usize,
    pub num_patch_changes: usize,
    pub num_other_changes: usize,
}

#[derive(Serialize)]
struct RecordRow<'a> {
    #[serde(rename = "recordId")]
    id: u64,
    repo: &'a str,
    package_name: &'a str,
    version: &'a str,
    author: &'a str,
    published_at_kst: &'a str,
    major_changes: &'a [String],
    minor_changes: &'a [String],
    patch_changes: &'a [String],
    other_changes: &'a [String],
    year: &'a str,
    month: &'a str,
    #[serde(rename = "workingDays")]
    working_days: u32,
    #[serde(rename = "isPrerelease")]
    is_prerelease: bool,
    #[serde(rename = "isDraft")]
    is_draft: bool,
    #[serde(rename = "publishedAt")]
    published_at: Option<NaiveDateTime>,
    tags: &'a BTreeSet<ChangeTag>,
    #[serde(rename = "numMajorChanges")]
    num_major_changes: usize,
    #[serde(rename = "numMinorChanges")]
    num_minor_changes: usize,
    #[serde(rename = "numPatchChanges")]
    num_patch_changes: usize,
    #[serde(rename = "numOtherChanges")]
    num_other_changes: usize,
}

impl Serialize for EnrichedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = &self.raw;
        RecordRow {
            id: self.id,
            repo: &raw.repo,
            package_name: &raw.package_name,
            version: &raw.version,
            author: &raw.author,
            published_at_kst: &raw.published_at_kst,
            major_changes: &raw.major_changes,
            minor_changes: &raw.minor_changes,
            patch_changes: &raw.patch_changes,
            other_changes: &raw.other_changes,
            year: &raw.year,
            month: &raw.month,
            working_days: self.working_days,
            is_prerelease: self.is_prerelease,
            is_draft: self.is_draft,
            published_at: self.published_at,
            tags: &self.tags,
            num_major_changes: self.num_major_changes,
            num_minor_changes: self.num_minor_changes,
            num_patch_changes: self.num_patch_changes,
            num_other_changes: self.num_other_changes,
        }
        .serialize(serializer)
    }
}

impl EnrichedRecord {
    pub fn repo(&self) -> &str {
        &self.raw.repo
    }

    pub fn package(&self) -> &str {
        &self.raw.package_name
    }

    pub fn author(&self) -> &str {
        &self.raw.author
    }

    pub fn version(&self) -> &str {
        &self.raw.version
    }

    /// `YYYY-MM` label of the publish date, if it parsed
    pub fn month_label(&self) -> Option<String> {
        self.published_at
            .map(|date| format!("{:04}-{:02}", date.year(), date.month()))
    }

    pub fn has_tag(&self, tag: ChangeTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Sort key used for newest-first ordering; undated records count as the epoch
    pub fn timestamp_millis(&self) -> i64 {
        self.published_at
            .map(|date| date.and_utc().timestamp_millis())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_tag_round_trip_labels() {
        for tag in ChangeTag::ALL {
            assert_eq!(tag.as_str().parse::<ChangeTag>().unwrap(), tag);
        }
        assert_eq!(" Major ".parse::<ChangeTag>().unwrap(), ChangeTag::Major);
        assert!("breaking".parse::<ChangeTag>().is_err());
    }

    #[test]
    fn test_change_tag_serde_uses_labels() {
        let json = serde_json::to_string(&ChangeTag::OtherChange).unwrap();
        assert_eq!(json, "\"other-change\"");
    }

    #[test]
    fn test_enriched_row_emits_each_column_once() {
        let record = EnrichedRecord {
            raw: RawRecord {
                id: "7".to_string(),
                repo: "app".to_string(),
                is_prerelease: "True".to_string(),
                is_draft: "False".to_string(),
                working_days: "3".to_string(),
                ..Default::default()
            },
            id: 7,
            working_days: 3,
            is_prerelease: true,
            is_draft: false,
            published_at: None,
            tags: BTreeSet::from([ChangeTag::Prerelease, ChangeTag::GeneralOther]),
            num_major_changes: 0,
            num_minor_changes: 0,
            num_patch_changes: 0,
            num_other_changes: 0,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["recordId"], 7);
        assert_eq!(json["workingDays"], 3);
        assert_eq!(json["isPrerelease"], true);
        assert_eq!(json["isDraft"], false);
        assert_eq!(json["repo"], "app");
        for duplicate in ["id", "working_days", "is_prerelease", "is_draft"] {
            assert!(json.get(duplicate).is_none(), "{} serialized twice", duplicate);
        }
    }

    #[test]
    fn test_raw_record_column_access() {
        let record = RawRecord {
            repo: "app".to_string(),
            major_changes: vec!["fix".to_string()],
            ..Default::default()
        };
        assert_eq!(record.scalar("repo"), Some("app"));
        assert_eq!(record.scalar("major_changes"), None);
        assert_eq!(record.list("major_changes"), Some(&["fix".to_string()][..]));
        assert_eq!(record.list("repo"), None);
    }
}
