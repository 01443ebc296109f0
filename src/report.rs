//! Append-only report persistence.
//!
//! Narrative output is collected into [`SummaryRecord`]s and appended to a
//! plain-text report and a semicolon-delimited summary table. Both artifacts
//! accumulate across repeated runs rather than being overwritten.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One generated summary plus its token accounting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "Business Area")]
    pub business_area: String,
    #[serde(rename = "Product Area")]
    pub product_area: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Input Tokens")]
    pub input_tokens: u32,
    #[serde(rename = "Output Tokens")]
    pub output_tokens: u32,
    #[serde(rename = "Total Tokens")]
    pub total_tokens: u32,
    #[serde(rename = "Summary Type")]
    pub summary_type: String,
}

const SECTION_RULE: &str = "------------------------------------------------------------";

/// Appends a titled block of summaries to the text report, one sentence per
/// line per summary.
pub fn append_text_report<P: AsRef<Path>>(
    path: P,
    title: &str,
    records: &[SummaryRecord],
) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    writeln!(file, "\n=== {} SUMMARY ===\n", title.to_uppercase())?;
    for record in records {
        writeln!(file, "Business Area : {}", record.business_area)?;
        writeln!(file, "Product Area  : {}", record.product_area)?;
        writeln!(file, "Summary:")?;
        for sentence in sentence_lines(&record.summary) {
            writeln!(file, "{}", sentence)?;
        }
        writeln!(file, "{}\n", SECTION_RULE)?;
    }

    info!(
        "Appended {} summaries to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Appends records to the semicolon-delimited summary table, writing the
/// header row only when the file is first created.
pub fn append_csv_report<P: AsRef<Path>>(path: P, records: &[SummaryRecord]) -> Result<()> {
    let path = path.as_ref();
    let write_headers = !path.exists();

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(write_headers)
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!("Appended {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Appends a summary/validation pair from the review chain as one structured
/// section.
pub fn append_review_section<P: AsRef<Path>>(
    path: P,
    scope: &str,
    summary: &str,
    validation: &str,
) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;

    writeln!(file, "\n{}", "=".repeat(60))?;
    writeln!(file, "Scope: {}", scope)?;
    writeln!(file, "{}\n", "=".repeat(60))?;

    writeln!(file, "Summary of Key Trends:")?;
    writeln!(file, "{}", SECTION_RULE)?;
    writeln!(file, "{}\n", summary.trim())?;

    writeln!(file, "Validation Report:")?;
    writeln!(file, "{}", SECTION_RULE)?;
    writeln!(file, "{}", validation.trim())?;
    writeln!(file, "\n{}\n", "=".repeat(60))?;

    Ok(())
}

/// Splits free text into sentences at `.`, `!` or `?` followed by
/// whitespace, for one-sentence-per-line report formatting.
fn sentence_lines(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.trim().chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            sentences.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }
    sentences
}
