//! An abstraction layer over hosted text-generation services.
//!
//! The chat widget talks to its backing model only through the types in
//! this crate, so the remote service can be swapped (or faked in tests)
//! without touching the controller.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
