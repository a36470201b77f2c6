//! Age-group classification
//!
//! Source age labels come as plain integers (`"7"`), integers with a unit
//! (`"7 years"`, `"7 år"`) or top-coded values (`"100+ years"`, `"126+"`).
//! Only the first whitespace-separated token is inspected.

use crate::error::{IssueLog, SoftIssue};
use crate::models::{AgeGroup, PopulationObservation, RawPopulationRecord};

/// Classify an age label; `None` means the label is unknown
#[must_use]
pub fn classify(label: Option<&str>) -> Option<AgeGroup> {
    parse_age(label?).map(AgeGroup::from_age)
}

/// Whole years encoded in an age label
#[must_use]
pub fn parse_age(label: &str) -> Option<u32> {
    let token = label.split_whitespace().next()?;
    let digits = token.strip_suffix('+').unwrap_or(token);
    digits.parse().ok()
}

/// Classify a label, recording it in the issue log when it is unknown
pub fn classify_or_record(label: Option<&str>, issues: &mut IssueLog) -> Option<AgeGroup> {
    let group = classify(label);
    if group.is_none() {
        issues.record(SoftIssue::UnknownAge {
            label: label.map(str::to_string),
        });
    }
    group
}

/// Classify population records, dropping (and counting) unknown ages
pub fn classify_population(
    records: Vec<RawPopulationRecord>,
    issues: &mut IssueLog,
) -> Vec<PopulationObservation> {
    let total = records.len();
    let observations: Vec<PopulationObservation> = records
        .into_iter()
        .filter_map(|record| {
            let age_group = classify_or_record(record.age_label.as_deref(), issues)?;
            Some(PopulationObservation {
                country: record.country,
                municipality: record.municipality,
                year: record.year,
                age_group,
                value: record.value,
            })
        })
        .collect();

    if observations.len() < total {
        log::info!(
            "Dropped {} population records with unknown age",
            total - observations.len()
        );
    }
    observations
}
