pub mod chat;
pub mod config;
pub mod extracted;
pub mod review;

pub use chat::{ChatMessage, ChatRole};
pub use config::{Config, CorsConfig, HistoryConfig, LlmConfig};
pub use review::*;
