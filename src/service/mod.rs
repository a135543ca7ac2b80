pub mod analysis;
pub mod chat;
pub mod history;
pub mod llm;
#[cfg(test)]
pub mod testing;

pub use analysis::AnalysisService;
pub use chat::ChatService;
pub use history::HistoryService;
pub use llm::{LlmClient, TextGenerator};
