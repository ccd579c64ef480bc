/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The input messages, in the order they should be presented.
    pub messages: Vec<ModelMessage>,
}

impl ModelRequest {
    /// Creates a single-turn request: the instructions followed by one
    /// user utterance.
    #[inline]
    pub fn single_turn<I, U>(instructions: I, input: U) -> Self
    where
        I: Into<String>,
        U: Into<String>,
    {
        Self {
            messages: vec![
                ModelMessage::System(instructions.into()),
                ModelMessage::User(input.into()),
            ],
        }
    }

    /// Returns the last user input in this request, if any.
    pub fn latest_user_input(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A complete message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelMessage {
    /// The system instructions.
    System(String),
    /// A user input text.
    User(String),
}
