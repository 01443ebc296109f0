//! Region label normalization.
//!
//! Reporting splits one large market out of its continental grouping before
//! aggregation, so that e.g. "United States" shows up next to "Americas"
//! rather than inside it.

use crate::schema::CleanedRecord;

/// Rewrites the region label of records whose country code matches one of a
/// small set of aliases. Matching is case-insensitive and ignores surrounding
/// whitespace. Everything else passes through unchanged.
#[derive(Debug, Clone)]
pub struct RegionNormalizer {
    bucket: String,
    aliases: Vec<String>,
}

impl RegionNormalizer {
    pub fn new(bucket: impl Into<String>, aliases: &[&str]) -> Self {
        Self {
            bucket: bucket.into(),
            aliases: aliases.iter().map(|a| a.trim().to_lowercase()).collect(),
        }
    }

    /// Promotes the United States out of its continental grouping, covering
    /// the two-letter and full-name forms seen in upstream exports.
    pub fn united_states() -> Self {
        Self::new("United States", &["us", "usa", "united states"])
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn matches(&self, country: &str) -> bool {
        let needle = country.trim().to_lowercase();
        self.aliases.iter().any(|a| *a == needle)
    }

    /// Returns a new table with matching rows rebucketed. Idempotent: the
    /// country code is left untouched, so a second pass rewrites the same
    /// rows to the same label.
    pub fn normalize(&self, records: &[CleanedRecord]) -> Vec<CleanedRecord> {
        records
            .iter()
            .map(|record| {
                let mut record = record.clone();
                if let Some(country) = &record.country {
                    if self.matches(country) && record.region.is_some() {
                        record.region = Some(self.bucket.clone());
                    }
                }
                record
            })
            .collect()
    }
}

impl Default for RegionNormalizer {
    fn default() -> Self {
        Self::united_states()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: Option<&str>, country: Option<&str>) -> CleanedRecord {
        CleanedRecord {
            business_area: "ACTH".to_string(),
            product_area: "ACCC".to_string(),
            product_line: "CCVE".to_string(),
            region: region.map(str::to_string),
            country: country.map(str::to_string),
            difference: 10.0,
            delta_pct: 0.0,
        }
    }

    #[test]
    fn test_rebuckets_matching_country() {
        let normalizer = RegionNormalizer::united_states();
        let out = normalizer.normalize(&[record(Some("Americas"), Some("US"))]);
        assert_eq!(out[0].region.as_deref(), Some("United States"));
    }

    #[test]
    fn test_matching_is_case_insensitive_and_trimmed() {
        let normalizer = RegionNormalizer::united_states();
        for country in ["us", "Us", " USA ", "united states", "United States"] {
            let out = normalizer.normalize(&[record(Some("Americas"), Some(country))]);
            assert_eq!(out[0].region.as_deref(), Some("United States"), "{country}");
        }
    }

    #[test]
    fn test_non_matching_rows_pass_through() {
        let normalizer = RegionNormalizer::united_states();
        let input = vec![
            record(Some("EMEA"), Some("DE")),
            record(Some("Americas"), None),
            record(None, Some("US")),
        ];
        let out = normalizer.normalize(&input);
        assert_eq!(out, input);
    }

    #[test]
    fn test_idempotent_on_normalized_data() {
        let normalizer = RegionNormalizer::united_states();
        let once = normalizer.normalize(&[record(Some("Americas"), Some("US"))]);
        let twice = normalizer.normalize(&once);
        assert_eq!(once, twice);
    }
}
