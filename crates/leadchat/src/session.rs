use leadchat_core::conversation::{ConversationState, Message};
use leadchat_core::{ChatWidget, ChatWidgetBuilder, WidgetDeadError};
use leadchat_model::ModelProvider;
use tokio::sync::watch;

const SYSTEM_PROMPT: &str = include_str!("./system_prompt.md");
const DEFAULT_BUSINESS_NAME: &str = "AcquisitionPro";

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    widget_builder: ChatWidgetBuilder,
    business_name: String,
    persona: Option<String>,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let widget_builder = ChatWidgetBuilder::with_model_provider(provider);
        Self {
            widget_builder,
            business_name: DEFAULT_BUSINESS_NAME.to_owned(),
            persona: None,
        }
    }

    /// Sets the business name the assistant speaks for.
    #[inline]
    pub fn with_business_name<S: Into<String>>(mut self, name: S) -> Self {
        self.business_name = name.into();
        self
    }

    /// Replaces the built-in agency persona. `{{BUSINESS_NAME}}` in the
    /// text is still substituted.
    #[inline]
    pub fn with_persona<S: Into<String>>(mut self, persona: S) -> Self {
        self.persona = Some(persona.into());
        self
    }

    /// Sets the greeting that opens the conversation.
    #[inline]
    pub fn with_greeting<S: Into<String>>(mut self, greeting: S) -> Self {
        self.widget_builder = self.widget_builder.with_greeting(greeting);
        self
    }

    /// Attaches a callback to be invoked when the widget is idle again.
    #[inline]
    pub fn on_idle(
        mut self,
        on_idle: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_idle(on_idle);
        self
    }

    /// Attaches a callback to be invoked when a message is appended.
    #[inline]
    pub fn on_transcript(
        mut self,
        on_transcript: impl Fn(&Message) + Send + Sync + 'static,
    ) -> Self {
        self.widget_builder = self.widget_builder.on_transcript(on_transcript);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        debug!("building session for {}", self.business_name);
        let persona = self
            .persona
            .as_deref()
            .unwrap_or(SYSTEM_PROMPT)
            .replace("{{BUSINESS_NAME}}", &self.business_name);
        let widget = self.widget_builder.with_instructions(persona).build();

        Session { widget }
    }
}

/// A chat session, like the floating window on the landing page that shows
/// messages and has an input box.
///
/// The session holds a fully configured widget that you can use directly,
/// and it is basically a wrapper around [`ChatWidget`].
#[derive(Clone)]
pub struct Session {
    widget: ChatWidget,
}

impl Session {
    /// Sends a message to the session.
    #[inline]
    pub fn send_message(&self, message: &str) -> Result<(), WidgetDeadError> {
        self.widget.submit(message)
    }

    /// Shows or hides the chat window.
    #[inline]
    pub fn toggle_open(&self) -> Result<(), WidgetDeadError> {
        self.widget.toggle_open()
    }

    /// Replaces the unsent input text.
    #[inline]
    pub fn set_draft_input(&self, text: &str) -> Result<(), WidgetDeadError> {
        self.widget.set_draft_input(text)
    }

    /// Returns the current state of the conversation.
    #[inline]
    pub fn state(&self) -> ConversationState {
        self.widget.state()
    }

    /// Returns a receiver notified after every state change.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<ConversationState> {
        self.widget.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use leadchat_model::ModelMessage;
    use leadchat_test_model::{PresetReply, TestModelProvider};
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn test_persona_is_sent() {
        let provider =
            TestModelProvider::with_replies([PresetReply::text("Happy to help!")]);
        let session = SessionBuilder::with_model_provider(provider.clone())
            .with_business_name("Northwind Leads")
            .build();

        session.send_message("Who are you?").unwrap();
        let mut state_rx = session.subscribe();
        timeout(
            Duration::from_secs(5),
            state_rx.wait_for(|s| s.transcript().len() == 3),
        )
        .await
        .unwrap()
        .unwrap();

        let received = provider.received_requests();
        let ModelMessage::System(persona) = &received[0].messages[0] else {
            panic!("instructions should come first");
        };
        assert!(persona.contains("Northwind Leads"));
        assert!(persona.contains("discovery call"));
        assert!(!persona.contains("{{BUSINESS_NAME}}"));
        assert_eq!(
            received[0].messages[1],
            ModelMessage::User("Who are you?".to_owned())
        );
        assert_eq!(
            session.state().latest().unwrap().content(),
            "Happy to help!"
        );
    }

    #[tokio::test]
    async fn test_custom_persona() {
        let provider = TestModelProvider::with_replies([PresetReply::text("ok")]);
        let session = SessionBuilder::with_model_provider(provider.clone())
            .with_persona("Speak for {{BUSINESS_NAME}} only.")
            .with_greeting("Welcome!")
            .build();
        assert_eq!(session.state().transcript()[0].content(), "Welcome!");

        session.send_message("Hi").unwrap();
        let mut state_rx = session.subscribe();
        timeout(
            Duration::from_secs(5),
            state_rx.wait_for(|s| !s.pending() && s.transcript().len() == 3),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(
            provider.received_requests()[0].messages[0],
            ModelMessage::System("Speak for AcquisitionPro only.".to_owned())
        );
    }

    #[tokio::test]
    async fn test_toggle_after_turn_reports_new_state() {
        let provider =
            TestModelProvider::with_replies([PresetReply::text("Hello!")]);
        let session = SessionBuilder::with_model_provider(provider).build();

        let mut state_rx = session.subscribe();
        session.send_message("Hi").unwrap();
        timeout(
            Duration::from_secs(5),
            state_rx.wait_for(|s| !s.pending() && s.transcript().len() == 3),
        )
        .await
        .unwrap()
        .unwrap();

        let was_open = session.state().is_open();
        let mut state_rx = session.subscribe();
        session.toggle_open().unwrap();
        timeout(Duration::from_secs(5), state_rx.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state_rx.borrow().is_open(), !was_open);
        assert!(session.state().is_open());
    }
}
