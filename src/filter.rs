//! Cross-filtering over enriched records
//!
//! A [`FilterSelection`] holds five independent sets. An empty set places no
//! restriction on its dimension; a record must satisfy every non-empty one
//! (AND across dimensions) by matching any value in it (OR within one).

use crate::error::{DashboardError, Result};
use crate::models::{ChangeTag, EnrichedRecord};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// One independently filterable attribute of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Repository,
    Package,
    Author,
    ChangeType,
    Month,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Repository,
        Dimension::Package,
        Dimension::Author,
        Dimension::ChangeType,
        Dimension::Month,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Repository => "repo",
            Dimension::Package => "package",
            Dimension::Author => "author",
            Dimension::ChangeType => "change-type",
            Dimension::Month => "month",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .into_iter()
            .find(|dimension| dimension.as_str() == s.trim())
            .ok_or_else(|| DashboardError::InvalidDimension(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub repositories: BTreeSet<String>,
    pub packages: BTreeSet<String>,
    pub authors: BTreeSet<String>,
    #[serde(rename = "changeTypes")]
    pub change_types: BTreeSet<ChangeTag>,
    pub months: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no dimension restricts anything
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
            && self.packages.is_empty()
            && self.authors.is_empty()
            && self.change_types.is_empty()
            && self.months.is_empty()
    }

    /// Flip membership of `value` in `dimension`; returns whether it is now selected
    ///
    /// Change-type values must name a [`ChangeTag`].
    pub fn toggle(&mut self, dimension: Dimension, value: &str) -> Result<bool> {
        let selected = match dimension {
            Dimension::Repository => toggle_in(&mut self.repositories, value.to_string()),
            Dimension::Package => toggle_in(&mut self.packages, value.to_string()),
            Dimension::Author => toggle_in(&mut self.authors, value.to_string()),
            Dimension::Month => toggle_in(&mut self.months, value.to_string()),
            Dimension::ChangeType => self.toggle_change_type(value.parse()?),
        };
        Ok(selected)
    }

    pub fn toggle_change_type(&mut self, tag: ChangeTag) -> bool {
        toggle_in(&mut self.change_types, tag)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        match dimension {
            Dimension::Repository => self.repositories.contains(value),
            Dimension::Package => self.packages.contains(value),
            Dimension::Author => self.authors.contains(value),
            Dimension::Month => self.months.contains(value),
            Dimension::ChangeType => value
                .parse::<ChangeTag>()
                .map(|tag| self.change_types.contains(&tag))
                .unwrap_or(false),
        }
    }

    /// Selected values as `(dimension, label)` pairs, for rendering chips
    pub fn chips(&self) -> Vec<(Dimension, String)> {
        let mut chips = Vec::new();
        chips.extend(self.repositories.iter().map(|v| (Dimension::Repository, v.clone())));
        chips.extend(self.packages.iter().map(|v| (Dimension::Package, v.clone())));
        chips.extend(self.authors.iter().map(|v| (Dimension::Author, v.clone())));
        chips.extend(
            self.change_types
                .iter()
                .map(|tag| (Dimension::ChangeType, tag.to_string())),
        );
        chips.extend(self.months.iter().map(|v| (Dimension::Month, v.clone())));
        chips
    }

    /// Whether a single record passes every active dimension
    pub fn matches(&self, record: &EnrichedRecord) -> bool {
        if !self.repositories.is_empty() && !self.repositories.contains(record.repo()) {
            return false;
        }
        if !self.packages.is_empty() && !self.packages.contains(record.package()) {
            return false;
        }
        if !self.authors.is_empty() && !self.authors.contains(record.author()) {
            return false;
        }
        if !self.change_types.is_empty()
            && !record.tags.iter().any(|tag| self.change_types.contains(tag))
        {
            return false;
        }
        if !self.months.is_empty() {
            match record.month_label() {
                Some(label) if self.months.contains(&label) => {}
                _ => return false,
            }
        }
        true
    }
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

/// Records passing `selection`, in their original order
pub fn apply_filters<'a>(
    records: &'a [EnrichedRecord],
    selection: &FilterSelection,
) -> Vec<&'a EnrichedRecord> {
    if selection.is_empty() {
        return records.iter().collect();
    }

    let filtered: Vec<&EnrichedRecord> = records
        .iter()
        .filter(|record| selection.matches(record))
        .collect();
    debug!(
        total = records.len(),
        retained = filtered.len(),
        "Applied filters"
    );
    filtered
}
