use leadchat_model::{ErrorKind, ModelResponse};
use mime::Mime;
use reqwest::StatusCode;

use crate::Error;
use crate::proto::GenerateContentResponse;

/// Classifies a raw reply from the endpoint.
///
/// An `error` object in the body wins over everything else, whatever the
/// HTTP status is. A body that is not JSON is treated as a transport
/// failure, since nothing in it can be trusted.
pub fn parse_reply(
    status: StatusCode,
    content_type: Option<&str>,
    body: &[u8],
) -> Result<ModelResponse, Error> {
    if let Some(content_type) = content_type {
        let is_json = content_type
            .parse::<Mime>()
            .map(|m| {
                m.subtype() == mime::JSON
                    || m.suffix().is_some_and(|s| s == mime::JSON)
            })
            .unwrap_or(false);
        if !is_json {
            return Err(Error::new(
                format!("Unexpected content type: {content_type} ({status})"),
                ErrorKind::Transport,
            ));
        }
    }

    let reply = serde_json::from_slice::<GenerateContentResponse>(body)
        .map_err(|err| {
            Error::new(format!("invalid reply body: {err}"), ErrorKind::Transport)
        })?;

    if let Some(api_error) = reply.error {
        let message = api_error.message.as_deref().unwrap_or("unknown error");
        let code = api_error.code.unwrap_or(status.as_u16());
        let label = api_error.status.as_deref().unwrap_or("");
        return Err(Error::new(
            format!("{code} {label}: {message}"),
            ErrorKind::Service,
        ));
    }

    if !status.is_success() {
        return Err(Error::new(
            format!("service answered with {status}"),
            ErrorKind::Service,
        ));
    }

    if let Some(version) = &reply.model_version {
        trace!("reply generated by {version}");
    }

    match reply.first_text() {
        Some(text) if !text.trim().is_empty() => Ok(ModelResponse {
            text: text.to_owned(),
            finish_reason: reply.first_finish_reason().map(ToOwned::to_owned),
        }),
        _ => Err(Error::new(
            "reply has no generated text",
            ErrorKind::MalformedResponse,
        )),
    }
}
