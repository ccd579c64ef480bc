use leadchat_model::{ModelMessage, ModelRequest};
use serde::{Deserialize, Serialize};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiError>,
    pub model_version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ApiError {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}

impl GenerateContentResponse {
    /// The text of the first part of the first candidate.
    #[inline]
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    #[inline]
    pub fn first_finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}

// -------------------------------
// Types shared in both directions
// -------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
}

// -----------
// Conversions
// -----------

/// Flattens the request into the single text part the endpoint receives:
/// the instructions first, then the user input.
#[inline]
pub fn create_request(req: &ModelRequest) -> GenerateContentRequest {
    let text = req
        .messages
        .iter()
        .map(|msg| match msg {
            ModelMessage::System(content) => content.clone(),
            ModelMessage::User(content) => format!("User: {content}"),
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    GenerateContentRequest {
        contents: vec![Content {
            role: None,
            parts: vec![Part { text: Some(text) }],
        }],
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_request() {
        let request = ModelRequest::single_turn(
            "You are a helpful assistant.",
            "How much does it cost?",
        );
        let body = serde_json::to_value(create_request(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [{
                        "text": "You are a helpful assistant.\n\nUser: How much does it cost?"
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_parse_success() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "Book a call with us!" }]
                },
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-2.0-flash"
        }))
        .unwrap();
        assert_eq!(resp.first_text(), Some("Book a call with us!"));
        assert_eq!(resp.first_finish_reason(), Some("STOP"));
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_parse_missing_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert_eq!(resp.first_text(), None);

        let resp: GenerateContentResponse =
            serde_json::from_value(json!({})).unwrap();
        assert_eq!(resp.first_text(), None);
    }
}
