pub mod client;
pub mod narrator;
pub mod prompts;
pub mod summarizer;
pub mod types;

pub use client::*;
pub use narrator::*;
pub use prompts::SummaryType;
pub use summarizer::*;
pub use types::*;
