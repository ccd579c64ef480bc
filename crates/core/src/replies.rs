//! Pre-authored assistant messages.

/// The fixed assistant messages the widget shows without asking the model:
/// the greeting that seeds every transcript, and one fallback per failure
/// mode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CannedReplies {
    /// Seeds the transcript when the widget is created.
    pub greeting: String,
    /// Shown when the service answers with an error payload.
    pub service_error: String,
    /// Shown when the service answers without usable text.
    pub malformed_response: String,
    /// Shown when the request could not complete.
    pub transport_failure: String,
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self {
            greeting: "Hi there! I can answer questions about how we \
                generate leads for businesses like yours. What would you \
                like to know?"
                .to_owned(),
            service_error: "Sorry, I can't answer right now. Please contact \
                us directly and our team will get back to you."
                .to_owned(),
            malformed_response: "I'm not sure how to answer that one. The \
                best next step is to book a free discovery call with our \
                team."
                .to_owned(),
            transport_failure: "There seems to be a connection issue on our \
                end. Please try again in a moment."
                .to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks_are_distinct() {
        let replies = CannedReplies::default();
        assert_ne!(replies.service_error, replies.malformed_response);
        assert_ne!(replies.service_error, replies.transport_failure);
        assert_ne!(replies.malformed_response, replies.transport_failure);
        assert!(replies.service_error.contains("contact us directly"));
        assert!(replies.malformed_response.contains("book a free discovery call"));
        assert!(replies.transport_failure.contains("connection issue"));
    }
}
