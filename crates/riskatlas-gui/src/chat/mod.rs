//! Conversation state of the risk assistant.

pub mod markdown;

use riskatlas_core::types::{ChatRequest, ChatRole, ChatTurn};

/// Id of the greeting message.
pub const WELCOME_ID: u64 = 0;

pub const WELCOME_MESSAGE: &str = "Hi! I'm **RiskAtlas AI**. I can see every country risk score, \
policy alert and supply chain record the dashboard tracks.\n\nTry asking:\n\
• *\"Which countries have critical trade risk?\"*\n\
• *\"What are the latest sanctions on Russia?\"*\n\
• *\"Best alternatives to sourcing from China?\"*\n\
• *\"Tell me about the selected country\"*";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: ChatRole,
    pub content: String,
    /// Shown in the transcript but never sent back as history.
    pub local: bool,
}

impl ChatMessage {
    fn welcome() -> Self {
        Self {
            id: WELCOME_ID,
            role: ChatRole::Assistant,
            content: WELCOME_MESSAGE.to_string(),
            local: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    pub messages: Vec<ChatMessage>,
    /// Text being composed
    pub input: String,
    pending: bool,
    next_id: u64,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::welcome()],
            input: String::new(),
            pending: false,
            next_id: WELCOME_ID + 1,
        }
    }
}

impl ChatSession {
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    fn push(&mut self, role: ChatRole, content: String, local: bool) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            role,
            content,
            local,
        });
        self.next_id += 1;
    }

    /// Moves the composed input into the transcript and builds the request.
    ///
    /// Returns `None` for blank input or while a reply is outstanding.
    pub fn begin_send(&mut self, country_id: Option<&str>) -> Option<ChatRequest> {
        let message = self.input.trim().to_string();
        if message.is_empty() || self.pending {
            return None;
        }

        let history = self
            .messages
            .iter()
            .filter(|m| !m.local)
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();

        self.push(ChatRole::User, message.clone(), false);
        self.input.clear();
        self.pending = true;

        Some(ChatRequest {
            message,
            country_id: country_id.map(str::to_string),
            history,
        })
    }

    /// Appends the assistant's reply, or an explanation of why there is none.
    pub fn finish(&mut self, reply: Result<String, String>, base_url: &str) {
        match reply {
            Ok(reply) => self.push(ChatRole::Assistant, reply, false),
            Err(error) => {
                let help = format!(
                    "⚠ **{}**\n\nMake sure:\n• The backend is running at `{}`\n• Its language model service is reachable",
                    error, base_url
                );
                self.push(ChatRole::Assistant, help, true);
            }
        }
        self.pending = false;
    }

    /// Back to just the greeting.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_welcome() {
        let session = ChatSession::default();
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].id, WELCOME_ID);
        assert_eq!(session.messages[0].role, ChatRole::Assistant);
        assert!(!session.is_pending());
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut session = ChatSession::default();
        session.input = "   \n ".to_string();
        assert!(session.begin_send(None).is_none());
        assert_eq!(session.messages.len(), 1);
    }

    #[test]
    fn test_send_and_reply() {
        let mut session = ChatSession::default();
        session.input = "  Which countries are critical?  ".to_string();

        let request = session.begin_send(Some("CN")).unwrap();
        assert_eq!(request.message, "Which countries are critical?");
        assert_eq!(request.country_id.as_deref(), Some("CN"));
        // Welcome and the message being sent are not history.
        assert!(request.history.is_empty());
        assert!(session.input.is_empty());
        assert!(session.is_pending());
        assert_eq!(session.messages.last().unwrap().role, ChatRole::User);

        // One question at a time.
        session.input = "and Russia?".to_string();
        assert!(session.begin_send(None).is_none());
        assert_eq!(session.input, "and Russia?");

        session.finish(Ok("Russia and Iran.".to_string()), "http://localhost:8000");
        assert!(!session.is_pending());

        let request = session.begin_send(None).unwrap();
        assert_eq!(
            request.history,
            vec![
                ChatTurn {
                    role: ChatRole::User,
                    content: "Which countries are critical?".to_string(),
                },
                ChatTurn {
                    role: ChatRole::Assistant,
                    content: "Russia and Iran.".to_string(),
                },
            ]
        );

        let ids: Vec<u64> = session.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_failure_names_backend() {
        let mut session = ChatSession::default();
        session.input = "hello".to_string();
        session.begin_send(None);
        session.finish(
            Err("Failed to reach the assistant".to_string()),
            "http://localhost:8000",
        );

        let last = session.messages.last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert!(last.content.contains("**Failed to reach the assistant**"));
        assert!(last.content.contains("http://localhost:8000"));
        assert!(last.local);
        assert!(!session.is_pending());
    }

    #[test]
    fn test_failure_text_is_not_sent_as_history() {
        let mut session = ChatSession::default();
        session.input = "hello".to_string();
        session.begin_send(None);
        session.finish(Err("timed out".to_string()), "http://localhost:8000");

        session.input = "hello again".to_string();
        let request = session.begin_send(None).unwrap();
        assert_eq!(
            request.history,
            vec![ChatTurn {
                role: ChatRole::User,
                content: "hello".to_string(),
            }]
        );
        // Still visible in the transcript.
        assert_eq!(session.messages.len(), 4);
    }

    #[test]
    fn test_clear() {
        let mut session = ChatSession::default();
        session.input = "hello".to_string();
        session.begin_send(None);
        session.clear();
        assert_eq!(session.messages, vec![ChatMessage::welcome()]);
        assert!(!session.is_pending());
    }
}
