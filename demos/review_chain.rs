//! Runs the four-pass review chain (draft, analysis, condensation,
//! validation) over one business area and appends the result to a text file.
//!
//! ```sh
//! cargo run --example review_chain --features narrative
//! ```

use dotenv::dotenv;
use sales_driver_narrator::llm::{ChatClient, Narrator};
use sales_driver_narrator::{
    aggregate, append_review_section, expand_codes, with_classification, with_contribution,
    Dataset, Dimension, DriverQuery, OrderBy, RegionNormalizer,
};
use std::error::Error;

const BUSINESS_AREA: &str = "LISC";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let api_key = std::env::var("API_KEY").expect("API_KEY must be set");
    let narrator = Narrator::new(ChatClient::new(api_key));

    let path = std::env::var("NET_SALES_PATH").expect("NET_SALES_PATH must be set");
    let dataset = Dataset::from_path(&path)?;
    let records = RegionNormalizer::united_states().normalize(dataset.records());

    let dims = [Dimension::ProductLine, Dimension::Region];
    let query = DriverQuery::new(BUSINESS_AREA, &dims).ordered_by(OrderBy::Key);
    let drivers = aggregate(&records, dataset.schema(), &query);
    if drivers.is_empty() {
        println!("No rows for business area {BUSINESS_AREA}, nothing to review.");
        return Ok(());
    }

    let scope_total = drivers.scope_total();
    let classified = with_classification(with_contribution(drivers, scope_total));
    println!("{}\n", classified.to_text());

    let reviewed = narrator.review(&classified).await?;
    let summary = expand_codes(&reviewed.summary);
    let validation = expand_codes(&reviewed.validation);

    append_review_section("review.txt", BUSINESS_AREA, &summary, &validation)?;
    println!("Review for {BUSINESS_AREA} saved to review.txt");

    Ok(())
}
