//! Email messages accepted for dispatch
//!
//! - [`email`]: the immutable [`Message`] entity and its template reference
//! - [`recipients`]: address lists normalized from one-or-many input

pub mod email;
pub mod recipients;

pub use email::{Message, TemplateRef, TemplateSource};
pub use recipients::Recipients;
