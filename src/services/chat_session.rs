// src/services/chat_session.rs
use std::fmt::{self, Debug, Display};

use uuid::Uuid;

use super::relay_client::RelayApi;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    You,
    Bot,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::You => "You",
            Speaker::Bot => "Bot",
        }
    }
}

impl Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptEntry {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    /// `("You", "hello")` style view, handy for comparisons.
    pub fn as_pair(&self) -> (&'static str, &str) {
        (self.speaker.label(), &self.text)
    }
}

/// One chat UI session: an append-only transcript plus the pending input
/// line. Lives from `new()` until `reset()` or drop.
pub struct ChatSession {
    id: Uuid,
    entries: Vec<TranscriptEntry>,
    input: String,
}

impl Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            entries: Vec::new(),
            input: String::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Drops the transcript and pending input and starts a fresh session id.
    pub fn reset(&mut self) {
        tracing::debug!(session = %self.id, entries = self.entries.len(), "resetting chat session");
        *self = Self::new();
    }

    /// Submits whatever is in the input buffer.
    pub async fn submit_input<R: RelayApi>(&mut self, relay: &R) -> bool {
        let text = self.input.clone();
        self.submit(relay, &text).await
    }

    /// One round trip to the relay. Blank text is ignored and returns
    /// `false`; otherwise the user line and the reply (or an `Error: ...`
    /// line) are appended together and the input buffer is cleared.
    pub async fn submit<R: RelayApi>(&mut self, relay: &R, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        let reply = match relay.generate(text).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "relay call failed");
                format!("Error: {e}")
            }
        };

        self.entries.push(TranscriptEntry::new(Speaker::You, text));
        self.entries.push(TranscriptEntry::new(Speaker::Bot, reply));
        self.input.clear();
        true
    }
}
