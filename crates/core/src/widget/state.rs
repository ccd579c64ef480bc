use leadchat_model::{ModelMessage, ModelRequest};
use tokio::sync::{mpsc, watch};

use super::mailbox::{Command, RequestGuard};
use crate::conversation::{ConversationState, Message};
use crate::model_client::{ModelClient, TurnOutcome};
use crate::replies::CannedReplies;

pub type TranscriptFn = Box<dyn Fn(&Message) + Send + Sync>;
pub type IdleFn = Box<dyn Fn() + Send + Sync>;

/// Why a submission was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyInput,
    Pending,
}

pub struct WidgetState {
    pub(super) model_client: ModelClient,
    pub(super) instructions: String,
    pub(super) replies: CannedReplies,
    pub(super) conversation: ConversationState,
    pub(super) state_tx: watch::Sender<ConversationState>,
    pub(super) cmd_tx: mpsc::WeakUnboundedSender<Command>,

    pub(super) on_transcript: Option<TranscriptFn>,
    pub(super) on_idle: Option<IdleFn>,
}

impl WidgetState {
    pub fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(text) => {
                if let Err(rejection) = self.submit(text) {
                    debug!("submission ignored: {rejection:?}");
                }
            }
            Command::ToggleOpen => {
                self.conversation.is_open = !self.conversation.is_open;
                self.publish();
            }
            Command::SetDraftInput(text) => {
                self.conversation.draft_input = text;
                self.publish();
            }
            Command::RequestFinished(outcome) => {
                self.finish_request(outcome);
            }
        }
    }

    fn submit(&mut self, text: String) -> Result<(), SubmitRejection> {
        if text.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.conversation.pending {
            return Err(SubmitRejection::Pending);
        }
        let Some(cmd_tx) = self.cmd_tx.upgrade() else {
            // Every handle is gone, nobody would see the reply.
            warn!("widget is shutting down, discard the submission");
            return Ok(());
        };

        let request = self.build_model_request(&text);
        self.append(Message::user(text));
        self.conversation.draft_input.clear();
        self.conversation.pending = true;
        self.publish();

        let model_client = self.model_client.clone();
        tokio::spawn(async move {
            let guard = RequestGuard::new(cmd_tx);
            let outcome = model_client.send_request(request).await;
            guard.finish(outcome);
        });
        Ok(())
    }

    /// Only the latest utterance goes out, earlier turns are not sent.
    fn build_model_request(&self, input: &str) -> ModelRequest {
        if self.instructions.is_empty() {
            ModelRequest {
                messages: vec![ModelMessage::User(input.to_owned())],
            }
        } else {
            ModelRequest::single_turn(self.instructions.clone(), input)
        }
    }

    fn finish_request(&mut self, outcome: TurnOutcome) {
        if !self.conversation.pending {
            error!("got an outcome with no request in flight: {outcome:?}");
            return;
        }

        let content = match outcome {
            TurnOutcome::Success(text) => text,
            TurnOutcome::ServiceError(_) => self.replies.service_error.clone(),
            TurnOutcome::MalformedResponse => {
                self.replies.malformed_response.clone()
            }
            TurnOutcome::TransportFailure(_) => {
                self.replies.transport_failure.clone()
            }
        };
        self.append(Message::assistant(content));
        self.conversation.pending = false;
        self.publish();

        if let Some(on_idle) = &self.on_idle {
            on_idle();
        }
    }

    #[inline]
    fn append(&mut self, msg: Message) {
        if let Some(on_transcript) = &self.on_transcript {
            on_transcript(&msg);
        }
        self.conversation.transcript.push(msg);
    }

    #[inline]
    fn publish(&self) {
        self.state_tx.send_replace(self.conversation.clone());
    }
}
