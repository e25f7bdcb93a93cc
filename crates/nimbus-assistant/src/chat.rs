//! Conversation state

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::AssistantError;
use crate::Result;

pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant running in a web browser.";

/// Previous messages sent along with each request
pub const CONTEXT_MESSAGES: usize = 10;

/// Page text included in a summary request, in characters
pub const SUMMARY_TEXT_LIMIT: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A backend that answers a conversation with one reply
pub trait ChatCompletion: Send + Sync {
    fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Messages for the next request: system prompt, recent context, `text`
    pub fn request_messages(&self, text: &str) -> Vec<ChatMessage> {
        let skip = self.history.len().saturating_sub(CONTEXT_MESSAGES);

        let mut messages = Vec::with_capacity(CONTEXT_MESSAGES + 2);
        messages.push(ChatMessage::new(Role::System, SYSTEM_PROMPT));
        messages.extend(self.history[skip..].iter().cloned());
        messages.push(ChatMessage::new(Role::User, text));
        messages
    }

    /// Send `text` and return the reply. The exchange is only kept when the
    /// backend answered.
    pub async fn send<B>(&mut self, backend: &B, model: &str, text: &str) -> Result<String>
    where
        B: ChatCompletion,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        let messages = self.request_messages(text);
        let reply = backend.complete(model, &messages).await?;

        self.history.push(ChatMessage::new(Role::User, text));
        self.history.push(ChatMessage::new(Role::Assistant, reply.clone()));
        Ok(reply)
    }
}

/// Prompt asking for a summary of page text, truncated to
/// [`SUMMARY_TEXT_LIMIT`] characters
pub fn summarize_prompt(page_text: &str) -> String {
    let excerpt: String = page_text.chars().take(SUMMARY_TEXT_LIMIT).collect();
    format!("Please summarize the following content:\n\n{}...", excerpt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Echoes the last user message, or fails when told to
    struct EchoBackend {
        fail: bool,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl EchoBackend {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatCompletion for EchoBackend {
        async fn complete(&self, _model: &str, messages: &[ChatMessage]) -> Result<String> {
            self.seen.lock().unwrap().push(messages.to_vec());
            if self.fail {
                return Err(AssistantError::Unavailable("offline".to_string()));
            }
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(format!("echo: {}", last))
        }
    }

    #[tokio::test]
    async fn test_send_keeps_exchange() {
        let backend = EchoBackend::new(false);
        let mut session = ChatSession::new();

        let reply = session.send(&backend, "llama3", " hello ").await.unwrap();
        assert_eq!(reply, "echo: hello");
        assert_eq!(
            session.history(),
            &[
                ChatMessage::new(Role::User, "hello"),
                ChatMessage::new(Role::Assistant, "echo: hello"),
            ]
        );

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0][0], ChatMessage::new(Role::System, SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn test_failed_send_keeps_history_unchanged() {
        let backend = EchoBackend::new(true);
        let mut session = ChatSession::new();

        assert!(session.send(&backend, "llama3", "hello").await.is_err());
        assert!(session.history().is_empty());
        assert!(matches!(
            session.send(&backend, "llama3", "   ").await,
            Err(AssistantError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn test_context_is_bounded() {
        let backend = EchoBackend::new(false);
        let mut session = ChatSession::new();
        for i in 0..8 {
            session.send(&backend, "m", &format!("q{}", i)).await.unwrap();
        }

        let messages = session.request_messages("next");
        // system + 10 of history + new message
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[1].content, "q3");
        assert_eq!(messages[11].content, "next");
    }

    #[test]
    fn test_summarize_prompt_truncates_by_chars() {
        let text = "é".repeat(SUMMARY_TEXT_LIMIT + 100);
        let prompt = summarize_prompt(&text);

        assert!(prompt.starts_with("Please summarize the following content:\n\n"));
        assert_eq!(prompt.chars().filter(|c| *c == 'é').count(), SUMMARY_TEXT_LIMIT);
        assert!(prompt.ends_with("..."));
    }
}
