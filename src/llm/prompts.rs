//! Prompt templates for the narrative passes.
//!
//! Two entry points exist: the single-shot report summary (one call per
//! business-area/product-area scope) and the four-pass review chain
//! (natural-language draft, trend analysis, condensed summary, fact-check).

use serde::{Deserialize, Serialize};

/// Which metric the summarized dataset describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryType {
    NetSales,
    OrderIntake,
}

impl SummaryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryType::NetSales => "net_sales",
            SummaryType::OrderIntake => "order_intake",
        }
    }

    fn metric_phrase(&self) -> &'static str {
        match self {
            SummaryType::NetSales => "net sales",
            SummaryType::OrderIntake => "order intake",
        }
    }
}

pub const SYSTEM_PROMPT: &str = "\
You are a financial analyst writing a financial report. Your task is to analyze and summarize changes in financial data.

You must write a concise summary in at most 4 sentences to complement the numerical data in a financial report.
Focus on clear, direct language and only state what is evident in the data - no speculation or recommendations.
Do not include numbers. Focus on trends, main drivers, and regions as specified.";

pub const INTERPRETER_ROLE: &str = "You are a financial data analyst summarizing trends across a company's product lines and regions.";
pub const ANALYSIS_ROLE: &str = "You are a business analyst specializing in data-driven insights for sales trends.";
pub const SUMMARY_ROLE: &str = "You are a report writer condensing a sales trend analysis into a qualitative summary.";
pub const VALIDATOR_ROLE: &str = "You are a financial validator that fact-checks financial reporting.";

/// User prompt for the single-shot report summary.
pub fn summary_prompt(summary_type: SummaryType, data_block: &str, overall_change: f64) -> String {
    format!(
        "\
The data below shows {metric} changes segmented by product line and region, with relative contributions to the overall change in a business area.
The overall change is {overall_change:.2}.

Instructions:
- Identify whether the overall trend is an increase or decrease
- Detect the main positive and main negative drivers
- Detect if there are product lines where the direction of change is consistent across all regions
- Write a concise final qualitative summary about the detected trends
- Start the summary by mentioning the driver that has the biggest overall impact

Rules for the final summary:
- Maximum of 4 sentences for the summary
- Do not speculate, do not include numbers, only state what the data clearly shows
- Do not include the overall trend in the summary since that is already understood
- A product line can only be mentioned once in the summary
- Only use terms like main detractor and main growth driver if one product line stands out from the rest

Expected output examples:
Example 1: All product lines up. [Product Line] in [Region] as main growth driver. [Product Line] increasing in [Region]. [Product Line] up in all regions.
Example 2: [Product Line] and [Product Line] decreasing in [Region]. [Product Line] in [Region] as main detractor, partly offset by [Product Line] in [Region].
Example 3: [Product Line] in [Region] as main detractor. Increase from [Product Line] in [Region].

Data:
{data_block}",
        metric = summary_type.metric_phrase(),
        overall_change = overall_change,
        data_block = data_block.trim(),
    )
}

/// Pass 1: row-by-row natural-language description of the classified table.
pub fn natural_language_prompt(data_block: &str) -> String {
    format!(
        "\
The data below summarizes changes between two periods across product lines and regions.
Each entry contains the product line, the region it relates to, the magnitude of the change, and the change type (minor/major increase/decrease).

Data:
{data_block}

Task:
- Summarize the changes one row at a time
- Clearly state major vs. minor changes
- Write in natural language

Rules:
- Use concise, structured sentences
- Do not include raw numbers, just directional trends
- Do not generate code

Example output:
- \"[Product Line] saw a major increase in [Region]\"
- \"[Product Line] had a minor decrease in [Region]\"",
        data_block = data_block.trim(),
    )
}

/// Pass 2: per-product-line trend analysis of the pass-1 text.
pub fn analysis_prompt(natural_language_report: &str) -> String {
    format!(
        "\
The following text summarizes the changes between two periods, per product line and region, including whether each change is a minor or major increase or decrease.

Summary data:
{report}

Task:
1. Consider one product line at a time
2. Identify whether the direction of change has been consistent across regions
3. Identify the major drivers ([Product Line] + [Region]) for increase and decrease
4. Write the result in natural language

Rules:
- Write in clear, structured language
- Do not generate code

Example output:
- \"[Product Line] up in all regions.\"
- \"[Product Line] saw a major increase in [Region].\"",
        report = natural_language_report.trim(),
    )
}

/// Pass 3: condensed 4-sentence summary of the pass-2 analysis.
pub fn condense_prompt(analysis: &str) -> String {
    format!(
        "\
The following text is an analysis of changes between two periods, including the magnitude of each change and whether it is considered a minor or major increase or decrease.

Raw analysis:
{analysis}

Task:
1. Write a concise summary of the key trends
2. Highlight significant changes and ignore minor fluctuations

Example output:
[Product Line] in [Region] as main growth driver. [Product Line] up in all regions. Decrease from [Product Line] in [Region].

Rules:
1. Maximum 4 sentences
2. Keep it descriptive and concise
3. Do not generate code",
        analysis = analysis.trim(),
    )
}

/// Pass 4: fact-check of the condensed summary against the raw table.
pub fn validation_prompt(summary: &str, raw_data: &str) -> String {
    format!(
        "\
Below is a generated summary of financial trends within our company.
Your task is to validate whether the summary describes the raw data well.

Raw data:
{raw_data}

Generated summary:
{summary}

Task:
1. Verify that all trends match the raw data
2. Flag any incorrect or misleading information
3. Correct the summary if a major mistake has been made

Example output:
- \"Validation Passed: No inconsistencies.\"
- \"Validation Warning: [Product Line] in [Region] is reported as an increase, but data shows a decrease.\"
- \"Corrected Summary: ...\"",
        raw_data = raw_data.trim(),
        summary = summary.trim(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prompt_embeds_data_and_change() {
        let prompt = summary_prompt(SummaryType::OrderIntake, "CCVE  EMEA  125.00  100.00", -140.5);
        assert!(prompt.contains("order intake changes"));
        assert!(prompt.contains("-140.50"));
        assert!(prompt.contains("CCVE  EMEA"));
    }

    #[test]
    fn test_summary_type_strings() {
        assert_eq!(SummaryType::NetSales.as_str(), "net_sales");
        assert_eq!(SummaryType::OrderIntake.as_str(), "order_intake");
    }

    #[test]
    fn test_chain_prompts_embed_inputs() {
        assert!(natural_language_prompt("TABLE").contains("TABLE"));
        assert!(analysis_prompt("DRAFT").contains("DRAFT"));
        assert!(condense_prompt("ANALYSIS").contains("ANALYSIS"));

        let validation = validation_prompt("SUMMARY", "RAW");
        assert!(validation.contains("SUMMARY"));
        assert!(validation.contains("RAW"));
    }
}
