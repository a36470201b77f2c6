//! Soft data issues absorbed during a run.
//!
//! None of these abort the pipeline. Each stage records what it dropped or
//! nulled so the run summary can report it.

use std::collections::BTreeMap;
use std::fmt;

/// A per-row problem that is absorbed locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftIssue {
    /// Age label that does not classify into an age group
    UnknownAge {
        /// The label as it appeared in the source (`None` when the cell was empty)
        label: Option<String>,
    },
    /// Municipality with no polygon in the target sub-regions
    JoinMismatch {
        /// Municipality name as produced by the normalizer
        municipality: String,
    },
    /// Municipality-year whose total population is zero
    ZeroTotal {
        /// Municipality name
        municipality: String,
        /// Snapshot year
        year: i32,
    },
    /// Value cell carrying a missing-data marker
    MissingValue {
        /// Name of the extract
        source_name: String,
    },
}

impl fmt::Display for SoftIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAge { label: Some(label) } => write!(f, "unparseable age label '{label}'"),
            Self::UnknownAge { label: None } => write!(f, "missing age label"),
            Self::JoinMismatch { municipality } => {
                write!(f, "no polygon in scope for municipality '{municipality}'")
            }
            Self::ZeroTotal { municipality, year } => {
                write!(f, "zero total population for {municipality} in {year}")
            }
            Self::MissingValue { source_name } => write!(f, "missing value in {source_name}"),
        }
    }
}

/// Tally of soft issues seen during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueLog {
    /// Unknown age labels and how often each occurred
    pub unknown_ages: BTreeMap<String, usize>,
    /// Municipalities dropped by the geographic joiner, with the number of rows dropped
    pub unmatched_municipalities: BTreeMap<String, usize>,
    /// Number of municipality-years with a zero total
    pub zero_totals: usize,
    /// Missing value cells per extract
    pub missing_values: BTreeMap<String, usize>,
}

impl IssueLog {
    /// Create an empty tally
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue. The first occurrence of each distinct issue is logged at debug level.
    pub fn record(&mut self, issue: SoftIssue) {
        let first = match &issue {
            SoftIssue::UnknownAge { label } => {
                let key = label.clone().unwrap_or_default();
                bump(&mut self.unknown_ages, key)
            }
            SoftIssue::JoinMismatch { municipality } => {
                bump(&mut self.unmatched_municipalities, municipality.clone())
            }
            SoftIssue::ZeroTotal { .. } => {
                self.zero_totals += 1;
                true
            }
            SoftIssue::MissingValue { source_name } => {
                bump(&mut self.missing_values, source_name.clone())
            }
        };

        if first {
            log::debug!("Absorbed data issue: {issue}");
        }
    }

    /// Number of rows excluded because their age label was unknown
    #[must_use]
    pub fn unknown_age_count(&self) -> usize {
        self.unknown_ages.values().sum()
    }

    /// Whether nothing was absorbed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_ages.is_empty()
            && self.unmatched_municipalities.is_empty()
            && self.zero_totals == 0
            && self.missing_values.is_empty()
    }

    /// Log a one-line summary per issue kind
    pub fn log_summary(&self) {
        if self.is_empty() {
            log::info!("No data issues absorbed");
            return;
        }
        if !self.unknown_ages.is_empty() {
            log::warn!(
                "Excluded {} rows with unknown age ({} distinct labels)",
                self.unknown_age_count(),
                self.unknown_ages.len()
            );
        }
        if !self.unmatched_municipalities.is_empty() {
            log::info!(
                "Dropped {} municipalities outside the polygon scope",
                self.unmatched_municipalities.len()
            );
        }
        if self.zero_totals > 0 {
            log::warn!("{} municipality-years had a zero total population", self.zero_totals);
        }
        for (source_name, count) in &self.missing_values {
            log::info!("Skipped {count} missing value cells in {source_name}");
        }
    }
}

fn bump(map: &mut BTreeMap<String, usize>, key: String) -> bool {
    let count = map.entry(key).or_insert(0);
    *count += 1;
    *count == 1
}
