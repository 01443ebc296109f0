//! End-to-end summary generation for a loaded dataset.
//!
//! Walks a [`SummaryPlan`] scope by scope: obfuscates magnitudes, normalizes
//! regions, aggregates by product line and region, attaches contributions,
//! humanizes codes, and asks the narrator for one summary per non-empty
//! scope.

use log::{info, warn};

use crate::aggregation::{aggregate, Dimension, DriverQuery, OrderBy};
use crate::contribution::with_contribution;
use crate::dataset::{Dataset, DEFAULT_SCALE_RANGE};
use crate::error::Result;
use crate::llm::narrator::Narrator;
use crate::llm::prompts::SummaryType;
use crate::mapping::{expand_codes, expand_dimension_keys};
use crate::region::RegionNormalizer;
use crate::report::SummaryRecord;
use crate::schema::COL_DIFFERENCE;

/// One business area to summarize. `product_areas: None` means the whole
/// business area is summarized in a single block, with rows in hierarchy
/// order rather than impact order.
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub business_area: String,
    pub product_areas: Option<Vec<String>>,
}

/// The set of business-area scopes a report run covers.
#[derive(Debug, Clone)]
pub struct SummaryPlan {
    pub entries: Vec<PlanEntry>,
}

impl SummaryPlan {
    pub fn new(entries: Vec<PlanEntry>) -> Self {
        Self { entries }
    }
}

impl Default for SummaryPlan {
    /// The scope map of the standing report: two business areas broken down
    /// per product area, one summarized as a whole.
    fn default() -> Self {
        let per_area = |business_area: &str, product_areas: &[&str]| PlanEntry {
            business_area: business_area.to_string(),
            product_areas: Some(product_areas.iter().map(|s| s.to_string()).collect()),
        };

        Self::new(vec![
            per_area(
                "ACTH",
                &["ACAT", "ACCA", "ACCC", "ACCP", "ACG3", "ACTC", "ACVI"],
            ),
            per_area("SWIC", &["ARJO", "SWA3", "SWIN", "SWIW", "SWWP"]),
            PlanEntry {
                business_area: "LISC".to_string(),
                product_areas: None,
            },
        ])
    }
}

/// Generates one [`SummaryRecord`] per non-empty scope in the plan.
///
/// The dataset is mutated once up front by the scaling transform; every
/// scope then reads the same obfuscated table. Narrative failures propagate
/// to the caller with the records generated so far discarded, but the
/// dataset itself stays valid for a retry.
pub async fn run_summaries(
    dataset: &mut Dataset,
    plan: &SummaryPlan,
    summary_type: SummaryType,
    narrator: &Narrator,
) -> Result<Vec<SummaryRecord>> {
    dataset.scale_columns(&[COL_DIFFERENCE], DEFAULT_SCALE_RANGE)?;

    let records = RegionNormalizer::united_states().normalize(dataset.records());
    let dimensions = [Dimension::ProductLine, Dimension::Region];
    let mut summaries = Vec::new();

    for entry in &plan.entries {
        info!(
            "Summarizing {} ({})",
            entry.business_area,
            summary_type.as_str()
        );

        match &entry.product_areas {
            None => {
                let query = DriverQuery::new(&entry.business_area, &dimensions)
                    .ordered_by(OrderBy::Key);
                let table = aggregate(&records, dataset.schema(), &query);
                if table.is_empty() {
                    warn!("No data for business area {}", entry.business_area);
                    continue;
                }

                let scope_total = table.scope_total();
                let mut contributions = with_contribution(table, scope_total);
                expand_dimension_keys(&mut contributions, Dimension::ProductLine);

                let result = narrator
                    .summarize_block(summary_type, &contributions.to_text(), scope_total)
                    .await?;
                summaries.push(to_record(
                    &entry.business_area,
                    "All",
                    summary_type,
                    result,
                ));
            }
            Some(product_areas) => {
                for product_area in product_areas {
                    let query = DriverQuery::new(&entry.business_area, &dimensions)
                        .with_product_area(product_area);
                    let table = aggregate(&records, dataset.schema(), &query);
                    if table.is_empty() {
                        continue;
                    }

                    let scope_total = table.scope_total();
                    let mut contributions = with_contribution(table, scope_total);
                    expand_dimension_keys(&mut contributions, Dimension::ProductLine);

                    let result = narrator
                        .summarize_block(summary_type, &contributions.to_text(), scope_total)
                        .await?;
                    summaries.push(to_record(
                        &entry.business_area,
                        product_area,
                        summary_type,
                        result,
                    ));
                }
            }
        }
    }

    Ok(summaries)
}

fn to_record(
    business_area: &str,
    product_area: &str,
    summary_type: SummaryType,
    result: crate::llm::types::NarrativeResult,
) -> SummaryRecord {
    SummaryRecord {
        business_area: business_area.to_string(),
        product_area: expand_codes(product_area),
        summary: result.text,
        input_tokens: result.usage.prompt_tokens,
        output_tokens: result.usage.completion_tokens,
        total_tokens: result.usage.total_tokens,
        summary_type: summary_type.as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_covers_standing_report() {
        let plan = SummaryPlan::default();
        assert_eq!(plan.entries.len(), 3);

        let lisc = plan
            .entries
            .iter()
            .find(|e| e.business_area == "LISC")
            .unwrap();
        assert!(lisc.product_areas.is_none());

        let acth = plan
            .entries
            .iter()
            .find(|e| e.business_area == "ACTH")
            .unwrap();
        assert_eq!(acth.product_areas.as_ref().unwrap().len(), 7);
    }
}
