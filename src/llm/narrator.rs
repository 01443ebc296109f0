//! Narrative generation over classified driver tables.

use log::info;

use crate::contribution::ClassifiedTable;
use crate::error::Result;
use crate::llm::client::{ChatClient, ChatOptions};
use crate::llm::prompts;
use crate::llm::types::NarrativeResult;

/// Output of the four-pass review chain: the condensed summary and the
/// fact-check verdict produced against the same table.
#[derive(Debug, Clone)]
pub struct ReviewedNarrative {
    pub summary: String,
    pub validation: String,
}

/// Orchestrates the narrative calls. Holds no pipeline state: every method
/// takes the rendered table (or an earlier pass's text) and returns the
/// model's output, so aggregation results stay reusable when a call fails.
pub struct Narrator {
    client: ChatClient,
}

impl Narrator {
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    /// Single-shot report summary for one scope.
    pub async fn summarize_block(
        &self,
        summary_type: prompts::SummaryType,
        data_block: &str,
        overall_change: f64,
    ) -> Result<NarrativeResult> {
        let prompt = prompts::summary_prompt(summary_type, data_block, overall_change);
        let result = self
            .client
            .chat(prompts::SYSTEM_PROMPT, &prompt, ChatOptions::summary())
            .await?;
        info!(
            "Summary generated ({} tokens, estimated cost ${:.4})",
            result.usage.total_tokens,
            result.usage.estimated_cost()
        );
        Ok(result)
    }

    /// Pass 1: row-by-row natural-language rendering of the table.
    pub async fn describe_rows(&self, data_block: &str) -> Result<NarrativeResult> {
        let prompt = prompts::natural_language_prompt(data_block);
        self.client
            .chat(prompts::INTERPRETER_ROLE, &prompt, ChatOptions::deterministic())
            .await
    }

    /// Pass 2: cross-region trend analysis of the pass-1 text.
    pub async fn analyze_trends(&self, natural_language_report: &str) -> Result<NarrativeResult> {
        let prompt = prompts::analysis_prompt(natural_language_report);
        self.client
            .chat(prompts::ANALYSIS_ROLE, &prompt, ChatOptions::deterministic())
            .await
    }

    /// Pass 3: condensed 4-sentence summary.
    pub async fn condense(&self, analysis: &str) -> Result<NarrativeResult> {
        let prompt = prompts::condense_prompt(analysis);
        self.client
            .chat(prompts::SUMMARY_ROLE, &prompt, ChatOptions::deterministic())
            .await
    }

    /// Pass 4: fact-check of a summary against the raw table.
    pub async fn validate(&self, summary: &str, data_block: &str) -> Result<NarrativeResult> {
        let prompt = prompts::validation_prompt(summary, data_block);
        self.client
            .chat(prompts::VALIDATOR_ROLE, &prompt, ChatOptions::deterministic())
            .await
    }

    /// Runs the full chain (draft, analysis, condensation, validation) over a
    /// classified table. Each pass feeds the next as plain text.
    pub async fn review(&self, table: &ClassifiedTable) -> Result<ReviewedNarrative> {
        let data_block = table.to_text();

        let draft = self.describe_rows(&data_block).await?;
        info!("Review pass 1/4 (natural language) complete");

        let analysis = self.analyze_trends(&draft.text).await?;
        info!("Review pass 2/4 (trend analysis) complete");

        let summary = self.condense(&analysis.text).await?;
        info!("Review pass 3/4 (condensed summary) complete");

        let validation = self.validate(&summary.text, &data_block).await?;
        info!("Review pass 4/4 (validation) complete");

        Ok(ReviewedNarrative {
            summary: summary.text,
            validation: validation.text,
        })
    }
}
