//! Core logic of the chat widget: conversation state, the request
//! lifecycle, and fallbacks when the model can't answer.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod conversation;
mod model_client;
pub mod replies;
mod widget;

pub use widget::{ChatWidget, ChatWidgetBuilder, WidgetDeadError};
