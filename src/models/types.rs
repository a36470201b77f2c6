//! Core enumerations shared by every pipeline stage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lower and upper (inclusive) bound of each age group; `None` means unbounded above
pub const AGE_GROUP_BOUNDS: [(AgeGroup, u32, Option<u32>); 3] = [
    (AgeGroup::Youth, 0, Some(19)),
    (AgeGroup::WorkingAge, 20, Some(64)),
    (AgeGroup::Elderly, 65, None),
];

/// Age bucket used throughout the canonical table
///
/// Ordered by lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AgeGroup {
    /// 0 to 19 years
    Youth,
    /// 20 to 64 years
    WorkingAge,
    /// 65 years and over
    Elderly,
}

impl AgeGroup {
    /// All age groups in ascending order
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Youth, AgeGroup::WorkingAge, AgeGroup::Elderly];

    /// Bucket for an age in whole years
    #[must_use]
    pub fn from_age(age: u32) -> Self {
        AGE_GROUP_BOUNDS
            .iter()
            .find(|(_, lower, upper)| age >= *lower && upper.is_none_or(|upper| age <= upper))
            .map_or(AgeGroup::Elderly, |(group, _, _)| *group)
    }

    /// Label used in the canonical table
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Youth => "youth",
            AgeGroup::WorkingAge => "working age",
            AgeGroup::Elderly => "elderly",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AgeGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgeGroup::ALL
            .into_iter()
            .find(|group| group.label() == s)
            .ok_or_else(|| format!("unknown age group '{s}'"))
    }
}

impl From<AgeGroup> for String {
    fn from(group: AgeGroup) -> Self {
        group.label().to_string()
    }
}

impl TryFrom<String> for AgeGroup {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Source country of a statistical extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    /// Statistics Denmark extracts
    Denmark,
    /// Statistics Sweden extracts
    Sweden,
}

impl Country {
    /// Two-letter code as used in the polygon table's `CNTR` property
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Country::Denmark => "DK",
            Country::Sweden => "SE",
        }
    }

    /// Parse a `CNTR` code
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "DK" => Some(Country::Denmark),
            "SE" => Some(Country::Sweden),
            _ => None,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sign of net migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Trend {
    /// More people moved in than out
    Positive,
    /// More people moved out than in
    Negative,
}

impl Trend {
    /// Trend of a net migration figure; balanced migration has no trend
    #[must_use]
    pub fn of(net: i64) -> Option<Self> {
        match net.signum() {
            1 => Some(Trend::Positive),
            -1 => Some(Trend::Negative),
            _ => None,
        }
    }
}

impl From<Trend> for String {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Positive => "positive".to_string(),
            Trend::Negative => "negative".to_string(),
        }
    }
}

impl TryFrom<String> for Trend {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "positive" => Ok(Trend::Positive),
            "negative" => Ok(Trend::Negative),
            other => Err(format!("unknown trend '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_group_bounds_are_inclusive() {
        assert_eq!(AgeGroup::from_age(0), AgeGroup::Youth);
        assert_eq!(AgeGroup::from_age(19), AgeGroup::Youth);
        assert_eq!(AgeGroup::from_age(20), AgeGroup::WorkingAge);
        assert_eq!(AgeGroup::from_age(64), AgeGroup::WorkingAge);
        assert_eq!(AgeGroup::from_age(65), AgeGroup::Elderly);
        assert_eq!(AgeGroup::from_age(126), AgeGroup::Elderly);
    }

    #[test]
    fn test_age_group_ordering_and_labels() {
        assert!(AgeGroup::Youth < AgeGroup::WorkingAge);
        assert!(AgeGroup::WorkingAge < AgeGroup::Elderly);
        for group in AgeGroup::ALL {
            assert_eq!(group.label().parse::<AgeGroup>(), Ok(group));
        }
    }

    #[test]
    fn test_trend_sign() {
        assert_eq!(Trend::of(20), Some(Trend::Positive));
        assert_eq!(Trend::of(-3), Some(Trend::Negative));
        assert_eq!(Trend::of(0), None);
    }

    #[test]
    fn test_country_codes() {
        assert_eq!(Country::from_code("DK"), Some(Country::Denmark));
        assert_eq!(Country::from_code("SE"), Some(Country::Sweden));
        assert_eq!(Country::from_code("NO"), None);
    }
}
