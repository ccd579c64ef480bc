use serde::{Deserialize, Serialize};

/// How the fake model answers one request.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// A successful reply with the given text.
    #[serde(rename = "text")]
    Text(String),
    /// A structured error payload from the service.
    #[serde(rename = "service_error")]
    ServiceError(String),
    /// A reply that carries no usable text.
    #[serde(rename = "malformed")]
    Malformed,
    /// The request never completes successfully at the transport level.
    #[serde(rename = "transport_failure")]
    TransportFailure,
}

impl PresetReply {
    /// Creates a successful text reply.
    #[inline]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let script = vec![
            PresetReply::text("Book a call with us!"),
            PresetReply::ServiceError("API key not valid".to_owned()),
            PresetReply::Malformed,
            PresetReply::TransportFailure,
        ];

        let serialized = serde_json::to_value(&script).unwrap();
        assert_eq!(
            serialized,
            json!([
                { "type": "text", "data": "Book a call with us!" },
                { "type": "service_error", "data": "API key not valid" },
                { "type": "malformed" },
                { "type": "transport_failure" },
            ])
        );

        let deserialized: Vec<PresetReply> =
            serde_json::from_value(serialized).unwrap();
        assert_eq!(script, deserialized);
    }
}
