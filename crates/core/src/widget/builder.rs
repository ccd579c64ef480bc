use leadchat_model::ModelProvider;

use super::ChatWidget;
use super::state::{IdleFn, TranscriptFn};
use crate::conversation::Message;
use crate::model_client::ModelClient;
use crate::replies::CannedReplies;

/// [`ChatWidget`] builder.
pub struct ChatWidgetBuilder {
    pub(super) model_client: ModelClient,
    pub(super) instructions: String,
    pub(super) replies: CannedReplies,
    pub(super) on_transcript: Option<TranscriptFn>,
    pub(super) on_idle: Option<IdleFn>,
}

impl ChatWidgetBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            instructions: String::new(),
            replies: Default::default(),
            on_transcript: None,
            on_idle: None,
        }
    }

    /// Sets the instructions sent ahead of every user utterance.
    #[inline]
    pub fn with_instructions<S: Into<String>>(
        mut self,
        instructions: S,
    ) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// Replaces the greeting and all fallback messages.
    #[inline]
    pub fn with_canned_replies(mut self, replies: CannedReplies) -> Self {
        self.replies = replies;
        self
    }

    /// Sets the greeting that seeds the transcript.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.replies.greeting = greeting.into();
        self
    }

    /// Attaches a callback to be invoked for every message appended to the
    /// transcript, including fallbacks.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.on_transcript = Some(Box::new(on_transcript));
        self
    }

    /// Attaches a callback to be invoked when a request has settled and
    /// the widget accepts submissions again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.on_idle = Some(Box::new(on_idle));
        self
    }

    /// Builds the widget and spawns its task.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[inline]
    pub fn build(self) -> ChatWidget {
        ChatWidget::spawn_from_builder(self)
    }
}
