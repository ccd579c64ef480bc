use std::pin::Pin;
use std::sync::Arc;

use leadchat_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

type BoxedOutcomeFuture = Pin<Box<dyn Future<Output = TurnOutcome> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedOutcomeFuture + Send + Sync>;

/// How one turn against the model ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model produced this text.
    Success(String),
    /// The service answered with a structured error.
    ServiceError(String),
    /// The service answered without usable text.
    MalformedResponse,
    /// The request could not complete.
    TransportFailure(String),
}

impl<E: ModelProviderError> From<Result<ModelResponse, E>> for TurnOutcome {
    fn from(result: Result<ModelResponse, E>) -> Self {
        match result {
            Ok(resp) if resp.text.trim().is_empty() => Self::MalformedResponse,
            Ok(resp) => Self::Success(resp.text),
            Err(err) => match err.kind() {
                ErrorKind::Service => Self::ServiceError(err.to_string()),
                ErrorKind::MalformedResponse => Self::MalformedResponse,
                ErrorKind::Transport => Self::TransportFailure(err.to_string()),
            },
        }
    }
}

/// A wrapper around a model provider that provides a type-erased
/// interface for the widget.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // Erase `P`, so the widget state doesn't need a generic parameter.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    let outcome = TurnOutcome::from(fut.await);
                    match &outcome {
                        TurnOutcome::Success(text) => {
                            trace!("got {} bytes of text", text.len());
                        }
                        TurnOutcome::ServiceError(reason)
                        | TurnOutcome::TransportFailure(reason) => {
                            error!("request failed: {reason}");
                        }
                        TurnOutcome::MalformedResponse => {
                            warn!("reply has no usable text");
                        }
                    }
                    outcome
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and waits for its outcome.
    ///
    /// Never fails: every error is folded into the returned
    /// [`TurnOutcome`].
    #[inline]
    pub async fn send_request(&self, req: ModelRequest) -> TurnOutcome {
        (self.handler_fn)(req).await
    }
}

#[cfg(test)]
mod tests {
    use leadchat_test_model::{PresetReply, TestModelProvider};

    use super::*;

    #[tokio::test]
    async fn test_send_request() {
        let provider = TestModelProvider::with_replies([
            PresetReply::text("How are you?"),
            PresetReply::ServiceError("quota exceeded".to_owned()),
            PresetReply::Malformed,
            PresetReply::TransportFailure,
            PresetReply::text(" \n"),
        ]);
        let model_client = ModelClient::new(provider);
        let req = ModelRequest::single_turn("Be brief.", "Hi");

        assert_eq!(
            model_client.send_request(req.clone()).await,
            TurnOutcome::Success("How are you?".to_owned())
        );
        assert!(matches!(
            model_client.send_request(req.clone()).await,
            TurnOutcome::ServiceError(reason) if reason.contains("quota")
        ));
        assert_eq!(
            model_client.send_request(req.clone()).await,
            TurnOutcome::MalformedResponse
        );
        assert!(matches!(
            model_client.send_request(req.clone()).await,
            TurnOutcome::TransportFailure(_)
        ));
        // Blank text is as good as no text.
        assert_eq!(
            model_client.send_request(req).await,
            TurnOutcome::MalformedResponse
        );
    }
}
