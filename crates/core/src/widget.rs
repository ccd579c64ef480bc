mod builder;
mod mailbox;
mod state;

use tokio::sync::{mpsc, watch};
use tracing::Instrument;

use crate::conversation::ConversationState;
pub use builder::ChatWidgetBuilder;
use mailbox::{Command, run_widget};
pub use mailbox::WidgetDeadError;
use state::WidgetState;

/// A chat widget instance, which maintains one conversation against a
/// model provider.
///
/// The state lives in its own task and every method here just sends a
/// command to it, so calls return immediately. Commands are handled in
/// the order they are sent, and at most one model request is in flight:
/// a submission that arrives while one is pending is ignored, not queued.
///
/// Handles are cheap to clone. The task terminates once every handle is
/// dropped and the in-flight request, if any, has finished.
#[derive(Clone)]
pub struct ChatWidget {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<ConversationState>,
}

impl ChatWidget {
    /// Submits a user utterance.
    ///
    /// Ignored if the text is blank or a request is already in flight.
    /// Otherwise the utterance is appended, the draft input is cleared,
    /// and exactly one assistant message follows once the model answers
    /// (or fails to).
    #[inline]
    pub fn submit<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), WidgetDeadError> {
        self.send(Command::Submit(text.into()))
    }

    /// Shows or hides the chat window.
    #[inline]
    pub fn toggle_open(&self) -> Result<(), WidgetDeadError> {
        self.send(Command::ToggleOpen)
    }

    /// Replaces the unsent input text.
    #[inline]
    pub fn set_draft_input<S: Into<String>>(
        &self,
        text: S,
    ) -> Result<(), WidgetDeadError> {
        self.send(Command::SetDraftInput(text.into()))
    }

    /// Returns the most recently published state.
    ///
    /// Commands sent just before this call may not be reflected yet.
    #[inline]
    pub fn state(&self) -> ConversationState {
        self.state_rx.borrow().clone()
    }

    /// Returns a receiver that is notified after every state change made
    /// from now on. The current state counts as already seen.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        let mut state_rx = self.state_rx.clone();
        state_rx.mark_unchanged();
        state_rx
    }

    #[inline]
    fn send(&self, cmd: Command) -> Result<(), WidgetDeadError> {
        self.cmd_tx.send(cmd).map_err(|_| WidgetDeadError)
    }
}

impl ChatWidget {
    fn spawn_from_builder(builder: ChatWidgetBuilder) -> Self {
        let ChatWidgetBuilder {
            model_client,
            instructions,
            replies,
            on_transcript,
            on_idle,
        } = builder;

        let conversation = ConversationState::with_greeting(&replies.greeting);
        let (state_tx, state_rx) = watch::channel(conversation.clone());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let state = WidgetState {
            model_client,
            instructions,
            replies,
            conversation,
            state_tx,
            cmd_tx: cmd_tx.downgrade(),
            on_transcript,
            on_idle,
        };
        tokio::spawn(
            run_widget(state, cmd_rx).instrument(trace_span!("widget")),
        );

        Self { cmd_tx, state_rx }
    }
}
