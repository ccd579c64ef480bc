use serde::{Deserialize, Serialize};

/// A complete reply from the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The generated text. Never empty for a successful reply.
    pub text: String,
    /// The reason the model stopped generating, as reported by the
    /// service.
    pub finish_reason: Option<String>,
}

impl ModelResponse {
    /// Creates a response with only the generated text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
        }
    }
}
