//! # Sales Driver Narrator
//!
//! A library for turning a two-period sales comparison export (monetary
//! values by product hierarchy and geography) into classified change drivers
//! and LLM-written narrative summaries.
//!
//! ## Core Concepts
//!
//! - **Dataset**: a semicolon-delimited export loaded and cleaned once, then
//!   read-only for its lifetime
//! - **Driver Table**: the period-over-period difference summed per group of
//!   hierarchy/geography dimensions
//! - **Contribution %**: each group's share of its enclosing scope's total,
//!   sign-normalized so the row sum lands on ±100 with the scope total's sign
//! - **Change Type**: four-way magnitude classification against a
//!   scope-relative 75th-percentile threshold
//! - **Narrative** (feature `narrative`): chat-completion summaries of the
//!   classified table, optionally fact-checked against the numbers
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_driver_narrator::*;
//!
//! let dataset = Dataset::from_path("net_sales_qtd.csv")?;
//! let records = RegionNormalizer::united_states().normalize(dataset.records());
//!
//! let dims = [Dimension::ProductLine, Dimension::Region];
//! let query = DriverQuery::new("ACTH", &dims).with_product_area("ACCC");
//! let drivers = aggregate(&records, dataset.schema(), &query);
//!
//! let total = drivers.scope_total();
//! let classified = with_classification(with_contribution(drivers, total));
//! println!("{}", classified.to_text());
//! ```

pub mod aggregation;
pub mod contribution;
pub mod dataset;
pub mod error;
pub mod mapping;
pub mod region;
pub mod report;
pub mod schema;

#[cfg(feature = "narrative")]
pub mod llm;

pub use aggregation::{aggregate, Dimension, DriverQuery, DriverRow, DriverTable, OrderBy};
pub use contribution::{
    with_classification, with_contribution, ChangeType, ClassifiedRow, ClassifiedTable,
    ContributionRow, ContributionTable,
};
pub use dataset::{Dataset, DEFAULT_SCALE_RANGE};
pub use error::{NarratorError, Result};
pub use mapping::{expand_codes, expand_dimension_keys, product_name};
pub use region::RegionNormalizer;
pub use report::{
    append_csv_report, append_review_section, append_text_report, SummaryRecord,
};
pub use schema::{CleanedRecord, DatasetSchema};
