//! Conversation-related types.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The visitor typing into the widget.
    User,
    /// The model, or a canned reply standing in for it.
    Assistant,
}

/// A message in the transcript. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    #[inline]
    pub(crate) fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[inline]
    pub(crate) fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Everything a renderer needs to draw the widget.
///
/// A fresh value is published after every change, see
/// [`crate::ChatWidget::subscribe`]. Renderers should scroll to the newest
/// message whenever the transcript grows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversationState {
    pub(crate) transcript: Vec<Message>,
    pub(crate) draft_input: String,
    pub(crate) pending: bool,
    pub(crate) is_open: bool,
}

impl ConversationState {
    /// Creates a state whose transcript holds only the greeting.
    #[inline]
    pub(crate) fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            transcript: vec![Message::assistant(greeting)],
            ..Default::default()
        }
    }

    /// The messages so far, oldest first.
    #[inline]
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The newest message.
    #[inline]
    pub fn latest(&self) -> Option<&Message> {
        self.transcript.last()
    }

    /// The text typed but not yet sent.
    #[inline]
    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    /// Whether a request is in flight. Submissions are rejected while
    /// this is `true`, so renderers should show a typing indicator and
    /// disable the send control.
    #[inline]
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Whether the chat window is visible.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }
}
