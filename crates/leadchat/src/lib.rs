//! An out-of-the-box chat widget for the agency landing page, configured
//! with the agency persona.
//!
//! The crate includes a CLI tool for trying the widget in the terminal.
//! You can also use it as a library to embed the widget in your own front
//! end.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod session;

pub use session::{Session, SessionBuilder};

/// Re-exports of [`leadchat_core`] crate.
pub mod core {
    pub use leadchat_core::*;
}
