//! Dataset loading and cleaning.
//!
//! A [`Dataset`] is built once from a semicolon-delimited export and owns the
//! cleaned table for its lifetime. Every downstream operation borrows the
//! records read-only; the one exception is [`Dataset::scale_columns`], the
//! obfuscation transform, which takes `&mut self`.

use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};
use rand::Rng;

use crate::error::{NarratorError, Result};
use crate::schema::{
    CleanedRecord, DatasetSchema, COL_CURRENT_VALUE, COL_DELTA_PCT, COL_DIFFERENCE,
    COL_PRIOR_VALUE,
};

/// Default factor range for [`Dataset::scale_columns`].
pub const DEFAULT_SCALE_RANGE: (f64, f64) = (4.0, 10.0);

#[derive(Debug, Clone)]
pub struct Dataset {
    schema: DatasetSchema,
    records: Vec<CleanedRecord>,
    prior_total: f64,
    current_total: f64,
}

impl Dataset {
    /// Loads and cleans a semicolon-delimited comparison export.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading dataset from {}", path.as_ref().display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Same as [`Dataset::from_path`] but over any reader, which keeps tests
    /// and in-memory fixtures away from the filesystem.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(reader);

        let schema = DatasetSchema::from_headers(csv_reader.headers()?)?;

        let mut records = Vec::new();
        let mut prior_total = 0.0;
        let mut current_total = 0.0;

        for row in csv_reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            let prior = parse_value(&row, schema.prior_value, COL_PRIOR_VALUE, line)?;
            let current = parse_value(&row, schema.current_value, COL_CURRENT_VALUE, line)?;

            // Totals are taken over the raw rows, before any cleaning.
            prior_total += prior;
            current_total += current;

            let difference = current - prior;
            let delta_pct = if prior == 0.0 {
                0.0
            } else {
                (1.0 - difference / prior) * 100.0
            };

            records.push(CleanedRecord {
                business_area: field(&row, Some(schema.business_area)),
                product_area: field(&row, Some(schema.product_area)),
                product_line: field(&row, Some(schema.product_line)),
                region: optional_field(&row, schema.region),
                country: optional_field(&row, schema.country),
                difference,
                delta_pct,
            });
        }

        debug!(
            "Loaded {} records (prior total {:.2}, current total {:.2})",
            records.len(),
            prior_total,
            current_total
        );

        Ok(Self {
            schema,
            records,
            prior_total,
            current_total,
        })
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    /// Sum of prior-period values over the raw file, computed before cleaning.
    pub fn prior_total(&self) -> f64 {
        self.prior_total
    }

    /// Sum of current-period values over the raw file, computed before cleaning.
    pub fn current_total(&self) -> f64 {
        self.current_total
    }

    /// Distinct business-area codes in first-seen order.
    pub fn unique_business_areas(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for record in &self.records {
            if !seen.iter().any(|b| b == &record.business_area) {
                seen.push(record.business_area.clone());
            }
        }
        seen
    }

    /// Multiplies each named numeric column by one randomly drawn factor,
    /// identical for every row of that column. Used to obfuscate magnitudes
    /// before handing data to an external model; relative ordering and sign
    /// are preserved. Returns the factor chosen per column.
    ///
    /// Unknown column names are skipped with a warning.
    pub fn scale_columns(
        &mut self,
        columns: &[&str],
        range: (f64, f64),
    ) -> Result<Vec<(String, f64)>> {
        self.scale_columns_with_rng(columns, range, &mut rand::thread_rng())
    }

    /// [`Dataset::scale_columns`] with an explicit RNG, for reproducible runs.
    pub fn scale_columns_with_rng<R: Rng>(
        &mut self,
        columns: &[&str],
        range: (f64, f64),
        rng: &mut R,
    ) -> Result<Vec<(String, f64)>> {
        let (low, high) = range;
        if !(low > 0.0 && low < high) {
            return Err(NarratorError::InvalidScaleRange { low, high });
        }

        let mut factors = Vec::new();
        for &column in columns {
            let factor = rng.gen_range(low..high);
            match column {
                COL_DIFFERENCE => {
                    for record in &mut self.records {
                        record.difference *= factor;
                    }
                }
                COL_DELTA_PCT => {
                    for record in &mut self.records {
                        record.delta_pct *= factor;
                    }
                }
                other => {
                    warn!("Scale transform skipping unknown column '{}'", other);
                    continue;
                }
            }
            info!("Scaled column '{}' by factor {:.4}", column, factor);
            factors.push((column.to_string(), factor));
        }

        Ok(factors)
    }
}

fn field(row: &csv::StringRecord, index: Option<usize>) -> String {
    index
        .and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn optional_field(row: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_value(row: &csv::StringRecord, index: usize, column: &str, line: u64) -> Result<f64> {
    let raw = row.get(index).unwrap_or("").trim();
    if raw.is_empty() {
        // Missing values are zero-filled before derivation.
        return Ok(0.0);
    }
    raw.parse::<f64>().map_err(|_| NarratorError::InvalidValue {
        column: column.to_string(),
        value: raw.to_string(),
        line,
    })
}
