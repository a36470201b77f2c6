//! Municipality name canonicalization
//!
//! Statistics offices prefix names with their municipality code
//! (`"1280 Malmö"`, `"101 København"`) and occasionally publish English
//! exonyms. The polygon table uses the bare native spelling, so every
//! normalizer maps names through here before the geographic join.

use std::collections::BTreeMap;

/// Maps source spellings onto the native names used by the polygon table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCanonicalizer {
    aliases: BTreeMap<String, String>,
}

impl NameCanonicalizer {
    /// Create a canonicalizer from `source spelling -> native spelling` pairs
    #[must_use]
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Native spelling of a raw municipality cell
    #[must_use]
    pub fn canonical(&self, raw: &str) -> String {
        let name = strip_code_prefix(raw);
        match self.aliases.get(name) {
            Some(native) => native.clone(),
            None => name.to_string(),
        }
    }
}

/// Remove a leading numeric code token
///
/// `"1280 Malmö"` becomes `"Malmö"`. A name that is only a number is left as is.
#[must_use]
pub fn strip_code_prefix(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((code, rest)) if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) => {
            rest.trim()
        }
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_prefix() {
        assert_eq!(strip_code_prefix("1280 Malmö"), "Malmö");
        assert_eq!(strip_code_prefix("101 København"), "København");
        assert_eq!(strip_code_prefix("1256 Östra Göinge"), "Östra Göinge");
        assert_eq!(strip_code_prefix("  Lund "), "Lund");
        assert_eq!(strip_code_prefix("Lyngby-Taarbæk"), "Lyngby-Taarbæk");
        assert_eq!(strip_code_prefix("0480"), "0480");
    }

    #[test]
    fn test_aliases_apply_after_prefix() {
        let names = NameCanonicalizer::new(BTreeMap::from([(
            "Copenhagen".to_string(),
            "København".to_string(),
        )]));
        assert_eq!(names.canonical("101 Copenhagen"), "København");
        assert_eq!(names.canonical("Copenhagen"), "København");
        assert_eq!(names.canonical("Frederiksberg"), "Frederiksberg");
    }
}
