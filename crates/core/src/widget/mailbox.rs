use std::error::Error;
use std::fmt;

use tokio::sync::mpsc;

use super::state::WidgetState;
use crate::model_client::TurnOutcome;

/// Returned by [`crate::ChatWidget`] methods once the task that owns the
/// conversation is gone, so the command could not be delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetDeadError;

impl fmt::Display for WidgetDeadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("chat widget is no longer running")
    }
}

impl Error for WidgetDeadError {}

/// Everything that may change the widget state. Commands are handled one
/// at a time, in the order they were sent.
#[derive(Debug)]
pub enum Command {
    Submit(String),
    ToggleOpen,
    SetDraftInput(String),
    RequestFinished(TurnOutcome),
}

/// Owns the state and applies commands until every sender is gone.
///
/// The state only keeps a weak sender for itself, so the loop ends once
/// all widget handles are dropped and no request is in flight.
pub async fn run_widget(
    mut state: WidgetState,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
) {
    debug!("started");
    while let Some(cmd) = cmd_rx.recv().await {
        trace!("received command: {cmd:?}");

        let proc_span = trace_span!("proc cmd");
        proc_span.in_scope(|| {
            state.handle(cmd);
            trace!("finished");
        });
    }
    debug!("will terminate");
}

/// Reports the outcome of the in-flight request back to the widget when
/// dropped, so `pending` is released even if the request task is aborted
/// or panics before it records an outcome.
pub struct RequestGuard {
    cmd_tx: mpsc::UnboundedSender<Command>,
    outcome: Option<TurnOutcome>,
}

impl RequestGuard {
    #[inline]
    pub fn new(cmd_tx: mpsc::UnboundedSender<Command>) -> Self {
        Self {
            cmd_tx,
            outcome: None,
        }
    }

    #[inline]
    pub fn finish(mut self, outcome: TurnOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or_else(|| {
            warn!("request task ended without an outcome");
            TurnOutcome::TransportFailure("request was interrupted".to_owned())
        });
        if self.cmd_tx.send(Command::RequestFinished(outcome)).is_err() {
            debug!("widget is gone, discard the outcome");
        }
    }
}
