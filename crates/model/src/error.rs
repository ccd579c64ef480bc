use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The service answered with a structured error payload.
    Service,
    /// The service answered, but without any usable generated text.
    MalformedResponse,
    /// The request could not complete, or the answer could not be parsed.
    Transport,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Service => write!(f, "Service error"),
            ErrorKind::MalformedResponse => write!(f, "Malformed response"),
            ErrorKind::Transport => write!(f, "Transport failure"),
        }
    }
}
