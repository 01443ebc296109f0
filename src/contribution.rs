//! Contribution percentages and magnitude classification.
//!
//! Both transforms are pure: given the same grouped table they produce the
//! same output, and an empty table flows through as an empty table.

use serde::{Deserialize, Serialize};

use crate::aggregation::{Dimension, DriverTable};

/// Four-way magnitude/direction category. There is deliberately no
/// "no change" bucket: a zero difference classifies as a minor decrease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    MajorIncrease,
    MinorIncrease,
    MajorDecrease,
    MinorDecrease,
}

impl ChangeType {
    pub fn label(&self) -> &'static str {
        match self {
            ChangeType::MajorIncrease => "Major Increase",
            ChangeType::MinorIncrease => "Minor Increase",
            ChangeType::MajorDecrease => "Major Decrease",
            ChangeType::MinorDecrease => "Minor Decrease",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRow {
    pub keys: Vec<String>,
    pub total_difference: f64,
    /// Share of the enclosing scope's total difference, sign-normalized so
    /// that positive always means "in the direction of the overall trend".
    pub contribution_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionTable {
    pub dimensions: Vec<Dimension>,
    pub rows: Vec<ContributionRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    pub keys: Vec<String>,
    pub total_difference: f64,
    pub contribution_pct: f64,
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedTable {
    pub dimensions: Vec<Dimension>,
    pub rows: Vec<ClassifiedRow>,
}

/// Attaches the signed percentage contribution of each row to the enclosing
/// scope's total.
///
/// When the scope total is negative the multiplier flips to -100, which keeps
/// each row's contribution sign aligned with the direction of its own change
/// and lands the row sum on -100 instead of +100. Individual contributions
/// can exceed 100% in magnitude when rows partially cancel; the signed row
/// sum always matches the scope total's sign.
/// A zero scope total is a legitimate degenerate input (all changes cancel)
/// and yields 0.0 for every row instead of dividing.
pub fn with_contribution(table: DriverTable, scope_total: f64) -> ContributionTable {
    let multiplier = if scope_total < 0.0 { -100.0 } else { 100.0 };

    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            let contribution_pct = if scope_total == 0.0 {
                0.0
            } else {
                row.total_difference / scope_total * multiplier
            };
            ContributionRow {
                keys: row.keys,
                total_difference: row.total_difference,
                contribution_pct,
            }
        })
        .collect();

    ContributionTable {
        dimensions: table.dimensions,
        rows,
    }
}

/// Classifies each row against the 75th percentile of absolute total
/// differences across the current row set.
///
/// The threshold is scope-relative and recomputed on every call: re-filtering
/// to a smaller scope moves the major/minor boundary with it.
pub fn with_classification(table: ContributionTable) -> ClassifiedTable {
    let magnitudes: Vec<f64> = table
        .rows
        .iter()
        .map(|r| r.total_difference.abs())
        .collect();
    let threshold = percentile(&magnitudes, 0.75);

    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            let change_type = classify(row.total_difference, threshold);
            ClassifiedRow {
                keys: row.keys,
                total_difference: row.total_difference,
                contribution_pct: row.contribution_pct,
                change_type,
            }
        })
        .collect();

    ClassifiedTable {
        dimensions: table.dimensions,
        rows,
    }
}

fn classify(total_difference: f64, threshold: f64) -> ChangeType {
    if total_difference > threshold {
        ChangeType::MajorIncrease
    } else if total_difference > 0.0 {
        ChangeType::MinorIncrease
    } else if total_difference < -threshold {
        ChangeType::MajorDecrease
    } else {
        ChangeType::MinorDecrease
    }
}

/// Linearly interpolated quantile over an unsorted sample. Returns 0.0 for an
/// empty sample so that classification of an empty table stays total.
pub(crate) fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

impl ContributionTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn scope_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total_difference).sum()
    }

    /// Plain-text rendering for prompt embedding, one padded row per line.
    pub fn to_text(&self) -> String {
        let mut headers: Vec<String> = self
            .dimensions
            .iter()
            .map(|d| d.label().to_string())
            .collect();
        headers.push("Total Difference".to_string());
        headers.push("Contribution %".to_string());

        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.keys.clone();
                cells.push(format!("{:.2}", row.total_difference));
                cells.push(format!("{:.2}", row.contribution_pct));
                cells
            })
            .collect();

        render_table(&headers, &rows)
    }
}

impl ClassifiedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn scope_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total_difference).sum()
    }

    pub fn to_text(&self) -> String {
        let mut headers: Vec<String> = self
            .dimensions
            .iter()
            .map(|d| d.label().to_string())
            .collect();
        headers.push("Total Difference".to_string());
        headers.push("Contribution %".to_string());
        headers.push("Change Type".to_string());

        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.keys.clone();
                cells.push(format!("{:.2}", row.total_difference));
                cells.push(format!("{:.2}", row.contribution_pct));
                cells.push(row.change_type.label().to_string());
                cells
            })
            .collect();

        render_table(&headers, &rows)
    }
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let format_line = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = format_line(headers);
    for row in rows {
        out.push('\n');
        out.push_str(&format_line(row));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::DriverRow;
    use approx::assert_relative_eq;

    fn grouped(rows: &[(&[&str], f64)]) -> DriverTable {
        DriverTable {
            dimensions: vec![Dimension::ProductLine, Dimension::Region],
            rows: rows
                .iter()
                .map(|(keys, total)| DriverRow {
                    keys: keys.iter().map(|k| k.to_string()).collect(),
                    total_difference: *total,
                })
                .collect(),
        }
    }

    #[test]
    fn test_contributions_sum_to_plus_100_for_positive_scope() {
        let table = grouped(&[
            (&["A", "US"], 60.0),
            (&["B", "EMEA"], 30.0),
            (&["C", "APAC"], -10.0),
        ]);
        let total = table.scope_total();
        let contributions = with_contribution(table, total);

        let sum: f64 = contributions.rows.iter().map(|r| r.contribution_pct).sum();
        assert_relative_eq!(sum, 100.0, max_relative = 1e-9);
        assert!(contributions.rows[0].contribution_pct > 0.0);
        assert!(contributions.rows[2].contribution_pct < 0.0);
    }

    #[test]
    fn test_contributions_sum_to_minus_100_for_negative_scope() {
        let table = grouped(&[
            (&["A", "US"], 100.0),
            (&["A", "EMEA"], 10.0),
            (&["B", "US"], -50.0),
            (&["B", "EMEA"], -200.0),
        ]);
        let total = table.scope_total();
        assert_relative_eq!(total, -140.0);

        let contributions = with_contribution(table, total);
        let pct: Vec<f64> = contributions.rows.iter().map(|r| r.contribution_pct).collect();

        // Each row keeps the sign of its own change; magnitudes can exceed
        // 100% under partial offsetting.
        assert_relative_eq!(pct[0], 100.0 / -140.0 * -100.0, max_relative = 1e-9);
        assert_relative_eq!(pct[3], -200.0 / -140.0 * -100.0, max_relative = 1e-9);
        assert!(pct[3] < -100.0);

        let sum: f64 = pct.iter().sum();
        assert_relative_eq!(sum, -100.0, max_relative = 1e-9);
    }

    #[test]
    fn test_zero_total_scope_yields_zero_contributions() {
        let table = grouped(&[(&["A", "US"], 50.0), (&["B", "US"], -50.0)]);
        let total = table.scope_total();
        let contributions = with_contribution(table, total);

        for row in &contributions.rows {
            assert_relative_eq!(row.contribution_pct, 0.0);
        }
    }

    #[test]
    fn test_empty_table_flows_through() {
        let table = DriverTable::empty(&[Dimension::ProductLine]);
        let contributions = with_contribution(table, 0.0);
        assert!(contributions.is_empty());

        let classified = with_classification(contributions);
        assert!(classified.is_empty());
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        assert_relative_eq!(percentile(&[10.0, 50.0, 100.0, 200.0], 0.75), 125.0);
        assert_relative_eq!(percentile(&[5.0], 0.75), 5.0);
        assert_relative_eq!(percentile(&[], 0.75), 0.0);
    }

    #[test]
    fn test_classification_boundaries() {
        let table = grouped(&[
            (&["A", "US"], 100.0),
            (&["A", "EMEA"], 10.0),
            (&["B", "US"], -50.0),
            (&["B", "EMEA"], -200.0),
        ]);
        let total = table.scope_total();
        let classified = with_classification(with_contribution(table, total));

        // Threshold over {100, 10, 50, 200} is 125: a value at or below the
        // threshold is minor, strictly beyond it is major.
        let types: Vec<ChangeType> = classified.rows.iter().map(|r| r.change_type).collect();
        assert_eq!(
            types,
            vec![
                ChangeType::MinorIncrease,
                ChangeType::MinorIncrease,
                ChangeType::MinorDecrease,
                ChangeType::MajorDecrease,
            ]
        );
    }

    #[test]
    fn test_zero_difference_is_minor_decrease() {
        let table = grouped(&[(&["A", "US"], 0.0), (&["B", "US"], 40.0)]);
        let total = table.scope_total();
        let classified = with_classification(with_contribution(table, total));
        assert_eq!(classified.rows[0].change_type, ChangeType::MinorDecrease);
    }

    #[test]
    fn test_threshold_is_scope_relative() {
        let wide = grouped(&[
            (&["A", "US"], 1000.0),
            (&["B", "US"], 100.0),
            (&["C", "US"], 10.0),
            (&["D", "US"], 1.0),
        ]);
        let narrow = grouped(&[(&["C", "US"], 10.0), (&["D", "US"], 1.0)]);

        let wide_threshold = percentile(
            &wide.rows.iter().map(|r| r.total_difference.abs()).collect::<Vec<_>>(),
            0.75,
        );
        let narrow_threshold = percentile(
            &narrow.rows.iter().map(|r| r.total_difference.abs()).collect::<Vec<_>>(),
            0.75,
        );
        assert!(wide_threshold != narrow_threshold);

        // A 10-unit change is negligible in the wide scope but becomes a
        // major increase once the scope shrinks around it.
        let wide_total = wide.scope_total();
        let wide_classified = with_classification(with_contribution(wide, wide_total));
        let narrow_total = narrow.scope_total();
        let narrow_classified = with_classification(with_contribution(narrow, narrow_total));

        let c_wide = wide_classified.rows.iter().find(|r| r.keys[0] == "C").unwrap();
        let c_narrow = narrow_classified.rows.iter().find(|r| r.keys[0] == "C").unwrap();
        assert_eq!(c_wide.change_type, ChangeType::MinorIncrease);
        assert_eq!(c_narrow.change_type, ChangeType::MajorIncrease);
    }

    #[test]
    fn test_to_text_renders_headers_and_rows() {
        let table = grouped(&[(&["CCVE", "EMEA"], 125.0)]);
        let total = table.scope_total();
        let text = with_classification(with_contribution(table, total)).to_text();

        assert!(text.contains("Product Line"));
        assert!(text.contains("Contribution %"));
        assert!(text.contains("CCVE"));
        assert!(text.contains("Minor Increase"));
    }
}
