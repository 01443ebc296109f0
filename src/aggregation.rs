//! Grouping and summation of change drivers.
//!
//! One parameterized aggregation covers every call shape the reporting flow
//! uses: per product area, per product area and region, per product line and
//! region, and the whole-business-area variant.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::schema::{CleanedRecord, DatasetSchema};

/// A grouping dimension of the product/geography hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimension {
    ProductArea,
    ProductLine,
    Region,
}

impl Dimension {
    pub fn label(&self) -> &'static str {
        match self {
            Dimension::ProductArea => "Product Area",
            Dimension::ProductLine => "Product Line",
            Dimension::Region => "Region",
        }
    }
}

/// Output ordering of grouped rows.
///
/// `TotalDifferenceDesc` is the default everywhere; `Key` is the deliberate
/// variant used when the downstream prompt expects rows in hierarchy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    TotalDifferenceDesc,
    Key,
}

/// A single aggregation request: required business-area filter, optional
/// product-area filter chained after it, and the ordered dimension set.
#[derive(Debug, Clone)]
pub struct DriverQuery<'a> {
    pub business_area: &'a str,
    pub product_area: Option<&'a str>,
    pub dimensions: &'a [Dimension],
    pub order: OrderBy,
}

impl<'a> DriverQuery<'a> {
    pub fn new(business_area: &'a str, dimensions: &'a [Dimension]) -> Self {
        Self {
            business_area,
            product_area: None,
            dimensions,
            order: OrderBy::default(),
        }
    }

    pub fn with_product_area(mut self, product_area: &'a str) -> Self {
        self.product_area = Some(product_area);
        self
    }

    pub fn ordered_by(mut self, order: OrderBy) -> Self {
        self.order = order;
        self
    }
}

/// One grouped row: a key value per requested dimension plus the summed
/// difference of every record in the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverRow {
    pub keys: Vec<String>,
    pub total_difference: f64,
}

/// Grouped drivers with their dimension labels. The rows partition the
/// filtered record set: every filtered record lands in exactly one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverTable {
    pub dimensions: Vec<Dimension>,
    pub rows: Vec<DriverRow>,
}

impl DriverTable {
    pub fn empty(dimensions: &[Dimension]) -> Self {
        Self {
            dimensions: dimensions.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of `total_difference` across all rows; the enclosing-scope total
    /// fed into contribution computation.
    pub fn scope_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total_difference).sum()
    }
}

/// Filters by business area (and product area when given), groups by the
/// requested dimensions, and sums `difference` per group.
///
/// Requesting [`Dimension::Region`] against a dataset without a region column
/// returns an empty table with the declared dimensions rather than failing:
/// geography is optional upstream and must not take the pipeline down.
/// Groups with no records never appear in the output.
pub fn aggregate(
    records: &[CleanedRecord],
    schema: &DatasetSchema,
    query: &DriverQuery<'_>,
) -> DriverTable {
    if query.dimensions.is_empty() {
        return DriverTable::empty(query.dimensions);
    }
    if query.dimensions.contains(&Dimension::Region) && !schema.has_region() {
        debug!(
            "Region dimension requested but dataset has no region column; returning empty table"
        );
        return DriverTable::empty(query.dimensions);
    }

    // BTreeMap keeps grouping deterministic; per-group sums accumulate in
    // input order, so repeated runs over the same file produce identical
    // floating point results.
    let mut groups: BTreeMap<Vec<String>, f64> = BTreeMap::new();

    for record in records {
        if record.business_area != query.business_area {
            continue;
        }
        if let Some(product_area) = query.product_area {
            if record.product_area != product_area {
                continue;
            }
        }

        let Some(keys) = group_keys(record, query.dimensions) else {
            continue;
        };
        *groups.entry(keys).or_insert(0.0) += record.difference;
    }

    let mut rows: Vec<DriverRow> = groups
        .into_iter()
        .map(|(keys, total_difference)| DriverRow {
            keys,
            total_difference,
        })
        .collect();

    match query.order {
        OrderBy::TotalDifferenceDesc => {
            rows.sort_by(|a, b| {
                b.total_difference
                    .partial_cmp(&a.total_difference)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.keys.cmp(&b.keys))
            });
        }
        // BTreeMap iteration already yields key order.
        OrderBy::Key => {}
    }

    DriverTable {
        dimensions: query.dimensions.to_vec(),
        rows,
    }
}

fn group_keys(record: &CleanedRecord, dimensions: &[Dimension]) -> Option<Vec<String>> {
    let mut keys = Vec::with_capacity(dimensions.len());
    for dimension in dimensions {
        let key = match dimension {
            Dimension::ProductArea => record.product_area.clone(),
            Dimension::ProductLine => record.product_line.clone(),
            Dimension::Region => record.region.clone()?,
        };
        keys.push(key);
    }
    Some(keys)
}
