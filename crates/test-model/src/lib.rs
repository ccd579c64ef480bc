//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use leadchat_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<PresetReply>,
    received: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should answer each request, in order. If the script runs out, the
/// request fails with a transport error.
///
/// Every request is recorded, so tests can inspect the outbound payloads
/// with [`TestModelProvider::received_requests`]. Clones share the same
/// script and records.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    /// Creates a provider that answers with the given replies in order.
    #[inline]
    pub fn with_replies(
        replies: impl IntoIterator<Item = PresetReply>,
    ) -> Self {
        let provider = Self::default();
        for reply in replies {
            provider.add_reply(reply);
        }
        provider
    }

    #[inline]
    pub fn add_reply(&self, reply: PresetReply) {
        self.script().replies.push_back(reply);
    }

    /// Sets how long every request takes before its reply is delivered.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far.
    pub fn received_requests(&self) -> Vec<ModelRequest> {
        self.script().received.clone()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        // A poisoned lock only means another test thread panicked.
        self.script.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestModelProvider")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let reply = {
            let mut script = self.script();
            script.received.push(req.clone());
            script.replies.pop_front()
        };
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;
            match reply {
                Some(PresetReply::Text(text)) => {
                    Ok(ModelResponse::with_text(text))
                }
                Some(PresetReply::ServiceError(message)) => {
                    Err(Error::new(message, ErrorKind::Service))
                }
                Some(PresetReply::Malformed) => Err(Error::new(
                    "no candidates in reply",
                    ErrorKind::MalformedResponse,
                )),
                Some(PresetReply::TransportFailure) => Err(Error::new(
                    "connection reset by peer",
                    ErrorKind::Transport,
                )),
                None => {
                    Err(Error::new("script is exhausted", ErrorKind::Transport))
                }
            }
        }
    }
}
