//! Nimbus Assistant
//!
//! Chat completion for the assistant sidebar. A [`ChatSession`] keeps the
//! conversation and sends a bounded window of it to a [`ChatCompletion`]
//! backend; [`OllamaClient`] talks to a local Ollama server.

mod chat;
mod error;
mod model;
mod ollama;

pub use chat::{summarize_prompt, ChatCompletion, ChatMessage, ChatSession, Role};
pub use error::AssistantError;
pub use model::ModelSelection;
pub use ollama::OllamaClient;

pub type Result<T> = std::result::Result<T, AssistantError>;
