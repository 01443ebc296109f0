//! Column layout of the source dataset.
//!
//! Upstream exports carry their dimension table prefixes in the header row
//! (e.g. `DimProduct[Business Area Code]`). The schema is resolved once at
//! load time so that everything downstream works with typed accessors instead
//! of repeating string lookups per operation.

use csv::StringRecord;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{NarratorError, Result};

pub const COL_BUSINESS_AREA: &str = "DimProduct[Business Area Code]";
pub const COL_PRODUCT_AREA: &str = "DimProduct[Product Area Code]";
pub const COL_PRODUCT_LINE: &str = "DimProduct[Product Line Code]";
pub const COL_REGION: &str = "DimMarketGeo[Region Label Geo]";
pub const COL_COUNTRY: &str = "DimMarketGeo[Country Code Geo]";
pub const COL_PRIOR_VALUE: &str = "[Value_cper]";
pub const COL_CURRENT_VALUE: &str = "[Value_mper]";

/// Derived columns, addressable by the scaling transform.
pub const COL_DIFFERENCE: &str = "[Difference]";
pub const COL_DELTA_PCT: &str = "[Delta]";

/// Format/share columns the loader drops on sight. Safe to be absent.
pub const DISCARDED_COLUMNS: &[&str] = &[
    "[v_Value_cper_FormatString]",
    "[v_Value_mper_FormatString]",
    "[Book_to_Bill_mper]",
    "[Value___Share_mper]",
    "[Value___Share_diff]",
];

/// Header positions resolved once per loaded file.
///
/// Region and country are optional: some exports carry no geography split,
/// and aggregation degrades gracefully without them (see
/// [`crate::aggregation::aggregate`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSchema {
    pub(crate) business_area: usize,
    pub(crate) product_area: usize,
    pub(crate) product_line: usize,
    pub(crate) region: Option<usize>,
    pub(crate) country: Option<usize>,
    pub(crate) prior_value: usize,
    pub(crate) current_value: usize,
}

impl DatasetSchema {
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| NarratorError::MissingColumn(name.to_string()))
        };
        let find_optional = |name: &str| headers.iter().position(|h| h.trim() == name);

        for column in DISCARDED_COLUMNS {
            if find_optional(column).is_some() {
                debug!("Ignoring discarded column '{}'", column);
            }
        }

        Ok(Self {
            business_area: find(COL_BUSINESS_AREA)?,
            product_area: find(COL_PRODUCT_AREA)?,
            product_line: find(COL_PRODUCT_LINE)?,
            region: find_optional(COL_REGION),
            country: find_optional(COL_COUNTRY),
            prior_value: find(COL_PRIOR_VALUE)?,
            current_value: find(COL_CURRENT_VALUE)?,
        })
    }

    pub fn has_region(&self) -> bool {
        self.region.is_some()
    }

    pub fn has_country(&self) -> bool {
        self.country.is_some()
    }
}

/// One cleaned row of the loaded dataset.
///
/// Source value columns are consumed during derivation and not retained;
/// the pre-clean totals live on [`crate::dataset::Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub business_area: String,
    pub product_area: String,
    pub product_line: String,
    pub region: Option<String>,
    pub country: Option<String>,
    /// Current-period minus prior-period value.
    pub difference: f64,
    /// `(1 - difference / prior) * 100`. Kept with the historical formula of
    /// the upstream reports; display-only, never used in aggregation.
    pub delta_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> StringRecord {
        StringRecord::from(cols.to_vec())
    }

    #[test]
    fn test_schema_resolves_all_columns() {
        let h = headers(&[
            COL_BUSINESS_AREA,
            COL_PRODUCT_AREA,
            COL_PRODUCT_LINE,
            COL_REGION,
            COL_COUNTRY,
            COL_PRIOR_VALUE,
            COL_CURRENT_VALUE,
            "[v_Value_cper_FormatString]",
        ]);

        let schema = DatasetSchema::from_headers(&h).unwrap();
        assert_eq!(schema.business_area, 0);
        assert_eq!(schema.region, Some(3));
        assert!(schema.has_region());
        assert!(schema.has_country());
        assert_eq!(schema.current_value, 6);
    }

    #[test]
    fn test_schema_tolerates_missing_geography() {
        let h = headers(&[
            COL_BUSINESS_AREA,
            COL_PRODUCT_AREA,
            COL_PRODUCT_LINE,
            COL_PRIOR_VALUE,
            COL_CURRENT_VALUE,
        ]);

        let schema = DatasetSchema::from_headers(&h).unwrap();
        assert!(!schema.has_region());
        assert!(!schema.has_country());
    }

    #[test]
    fn test_schema_rejects_missing_required_column() {
        let h = headers(&[COL_BUSINESS_AREA, COL_PRODUCT_AREA, COL_PRODUCT_LINE]);

        let err = DatasetSchema::from_headers(&h).unwrap_err();
        match err {
            NarratorError::MissingColumn(name) => assert_eq!(name, COL_PRIOR_VALUE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_schema_trims_header_whitespace() {
        let h = headers(&[
            " DimProduct[Business Area Code] ",
            COL_PRODUCT_AREA,
            COL_PRODUCT_LINE,
            COL_PRIOR_VALUE,
            COL_CURRENT_VALUE,
        ]);

        assert!(DatasetSchema::from_headers(&h).is_ok());
    }
}
