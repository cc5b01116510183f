//! Record enrichment
//!
//! Turns parsed rows into [`EnrichedRecord`]s: numeric fields, flags, the
//! publish date, classification tags and change counts. Rows without a
//! publish timestamp are dropped here, and the result is ordered newest first.

use crate::models::{ChangeTag, EnrichedRecord, RawRecord};
use crate::timestamp_parser::TimestampParser;
use std::collections::BTreeSet;
use tracing::debug;

/// Enrich and sort records, newest first
pub fn enrich_records(records: Vec<RawRecord>) -> Vec<EnrichedRecord> {
    let total = records.len();
    let mut enriched: Vec<EnrichedRecord> = records
        .into_iter()
        .filter(|record| !record.published_at_kst.trim().is_empty())
        .map(enrich_record)
        .collect();

    // stable, so equal dates keep file order
    enriched.sort_by_key(|record| std::cmp::Reverse(record.timestamp_millis()));

    debug!(
        input = total,
        kept = enriched.len(),
        dropped = total - enriched.len(),
        "Enriched release records"
    );
    enriched
}

/// Enrich a single record; never fails, bad fields fall back to zero or `None`
pub fn enrich_record(raw: RawRecord) -> EnrichedRecord {
    let id = parse_number(&raw.id, "id");
    let working_days = parse_number(&raw.working_days, "working_days");
    let is_prerelease = parse_flag(&raw.is_prerelease);
    let is_draft = parse_flag(&raw.is_draft);

    let published_at = TimestampParser::parse(&raw.published_at_kst);
    if published_at.is_none() {
        debug!(timestamp = %raw.published_at_kst, "Unparsable publish timestamp");
    }

    let tags = classify(&raw, is_prerelease);

    EnrichedRecord {
        id,
        working_days,
        is_prerelease,
        is_draft,
        published_at,
        tags,
        num_major_changes: raw.major_changes.len(),
        num_minor_changes: raw.minor_changes.len(),
        num_patch_changes: raw.patch_changes.len(),
        num_other_changes: raw.other_changes.len(),
        raw,
    }
}

/// Classification tags for a record
pub fn classify(raw: &RawRecord, is_prerelease: bool) -> BTreeSet<ChangeTag> {
    let mut tags = BTreeSet::new();

    tags.insert(if is_prerelease {
        ChangeTag::Prerelease
    } else {
        ChangeTag::Stable
    });

    let lists = [
        (ChangeTag::Major, &raw.major_changes),
        (ChangeTag::Minor, &raw.minor_changes),
        (ChangeTag::Patch, &raw.patch_changes),
        (ChangeTag::OtherChange, &raw.other_changes),
    ];
    for (tag, list) in lists {
        if !list.is_empty() {
            tags.insert(tag);
        }
    }

    if !ChangeTag::CHANGE_KINDS.iter().any(|tag| tags.contains(tag)) {
        tags.insert(ChangeTag::GeneralOther);
    }

    tags
}

fn parse_number<T: std::str::FromStr + Default>(value: &str, field: &str) -> T {
    match value.trim().parse() {
        Ok(number) => number,
        Err(_) => {
            if !value.trim().is_empty() {
                debug!(field, value, "Non-numeric value, using 0");
            }
            T::default()
        }
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
