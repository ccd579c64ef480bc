//! A model provider for the Gemini `generateContent` API.

#[macro_use]
extern crate tracing;

mod config;
mod proto;
mod response;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use leadchat_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use reqwest::{Client, Url, header};

pub use config::{GeminiConfig, GeminiConfigBuilder};

/// Error type for [`GeminiProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// Gemini model provider.
///
/// Each request is a single `generateContent` call, no retries. The API
/// key travels as the `key` query parameter.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: Client,
    config: Arc<GeminiConfig>,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with the given configuration.
    #[inline]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    fn request_url(&self) -> Result<Url, Error> {
        Url::parse_with_params(
            &self.config.endpoint(),
            &[("key", self.config.api_key.as_str())],
        )
        .map_err(|err| {
            Error::new(format!("invalid endpoint: {err}"), ErrorKind::Transport)
        })
    }
}

impl ModelProvider for GeminiProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        let body = proto::create_request(req);
        let resp_fut = self.request_url().map(|url| {
            let mut builder = self
                .client
                .post(url)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::ACCEPT, "application/json")
                .json(&body);
            if let Some(timeout) = self.config.timeout {
                builder = builder.timeout(timeout);
            }
            builder.send()
        });
        let endpoint = self.config.endpoint();

        async move {
            trace!("sending request to {endpoint}");
            let resp = match resp_fut?.await {
                Ok(resp) => resp,
                Err(err) => {
                    // Strip the URL, it carries the API key.
                    let err = err.without_url();
                    return Err(Error::new(
                        format!("{err}"),
                        ErrorKind::Transport,
                    ));
                }
            };

            let status = resp.status();
            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned);
            let body = resp.bytes().await.map_err(|err| {
                Error::new(format!("{}", err.without_url()), ErrorKind::Transport)
            })?;
            trace!("got {status} with {} bytes", body.len());

            response::parse_reply(status, content_type.as_deref(), &body)
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;

    /// Serves exactly one HTTP response on a loopback port. The handle
    /// yields the raw request once it has been answered.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let Some(head_end) =
                    request.windows(4).position(|w| w == b"\r\n\r\n")
                else {
                    continue;
                };
                let head = String::from_utf8_lossy(&request[..head_end])
                    .to_ascii_lowercase();
                let content_length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if request.len() >= head_end + 4 + content_length {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });
        (format!("http://{addr}/v1beta"), server)
    }

    fn provider_for(base_url: String) -> GeminiProvider {
        GeminiProvider::new(
            GeminiConfigBuilder::with_api_key("abc-123")
                .with_base_url(base_url)
                .build(),
        )
    }

    #[tokio::test]
    async fn test_success_over_http() {
        let (base_url, server) = serve_once(
            "200 OK",
            "application/json; charset=UTF-8",
            r#"{"candidates":[{"content":{"parts":[{"text":"Book a call with us!"}]},"finishReason":"STOP"}]}"#,
        )
        .await;
        let req = ModelRequest::single_turn("Be brief.", "Hi");
        let resp = provider_for(base_url).send_request(&req).await.unwrap();
        assert_eq!(resp.text, "Book a call with us!");
        assert_eq!(resp.finish_reason.as_deref(), Some("STOP"));

        let request = server.await.unwrap();
        assert!(request.starts_with(
            "POST /v1beta/models/gemini-2.0-flash:generateContent?key=abc-123 "
        ));
        assert!(request.contains("User: Hi"));
    }

    #[tokio::test]
    async fn test_service_error_over_http() {
        let (base_url, server) = serve_once(
            "400 Bad Request",
            "application/json",
            r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#,
        )
        .await;
        let req = ModelRequest::single_turn("Be brief.", "Hi");
        let err = provider_for(base_url).send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Service);
        assert!(err.message().contains("API key not valid."));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_over_http() {
        let (base_url, server) =
            serve_once("200 OK", "application/json", "{}").await;
        let req = ModelRequest::single_turn("Be brief.", "Hi");
        let err = provider_for(base_url).send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_html_over_http() {
        let (base_url, server) = serve_once(
            "502 Bad Gateway",
            "text/html",
            "<html>Bad Gateway</html>",
        )
        .await;
        let req = ModelRequest::single_turn("Be brief.", "Hi");
        let err = provider_for(base_url).send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        server.await.unwrap();
    }

    #[test]
    fn test_request_url_carries_key() {
        let provider = GeminiProvider::new(
            GeminiConfigBuilder::with_api_key("abc-123")
                .with_base_url("http://localhost:9/v1beta")
                .build(),
        );
        let url = provider.request_url().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent?key=abc-123"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        // Port 9 (discard) is closed on any sane test machine.
        let provider = GeminiProvider::new(
            GeminiConfigBuilder::with_api_key("abc-123")
                .with_base_url("http://127.0.0.1:9/v1beta")
                .build(),
        );
        let req = ModelRequest::single_turn("Be brief.", "Hi");
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.message().contains("abc-123"));
    }

    #[tokio::test]
    async fn test_invalid_endpoint() {
        let provider = GeminiProvider::new(
            GeminiConfigBuilder::with_api_key("abc-123")
                .with_base_url("not a url")
                .build(),
        );
        let req = ModelRequest::single_turn("Be brief.", "Hi");
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
