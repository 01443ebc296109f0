//! Generates the standing net-sales and order-intake summary report.
//!
//! Requires `API_KEY` plus `NET_SALES_PATH` / `ORDER_INTAKE_PATH` in the
//! environment (or a `.env` file). Run with:
//!
//! ```sh
//! cargo run --example summary_workflow --features narrative
//! ```

use dotenv::dotenv;
use sales_driver_narrator::llm::{run_summaries, ChatClient, Narrator, SummaryPlan, SummaryType};
use sales_driver_narrator::{append_csv_report, append_text_report, Dataset};
use std::error::Error;

async fn create_summary(
    path: &str,
    summary_type: SummaryType,
    narrator: &Narrator,
) -> Result<(), Box<dyn Error>> {
    println!("Processing {} ({})...", path, summary_type.as_str());

    let mut dataset = Dataset::from_path(path)?;
    let plan = SummaryPlan::default();
    let summaries = run_summaries(&mut dataset, &plan, summary_type, narrator).await?;

    append_text_report("summaries.txt", summary_type.as_str(), &summaries)?;
    append_csv_report("summaries.csv", &summaries)?;

    println!(
        "Appended {} {} summaries to summaries.txt and summaries.csv",
        summaries.len(),
        summary_type.as_str()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let api_key = std::env::var("API_KEY").expect("API_KEY must be set");
    let narrator = Narrator::new(ChatClient::new(api_key));

    let net_sales_path = std::env::var("NET_SALES_PATH").expect("NET_SALES_PATH must be set");
    create_summary(&net_sales_path, SummaryType::NetSales, &narrator).await?;

    let order_intake_path =
        std::env::var("ORDER_INTAKE_PATH").expect("ORDER_INTAKE_PATH must be set");
    create_summary(&order_intake_path, SummaryType::OrderIntake, &narrator).await?;

    Ok(())
}
