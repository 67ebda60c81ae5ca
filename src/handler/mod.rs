//! Request handler module
//!
//! Request routing and the chat endpoint. Handlers return an `Outcome`; the
//! HTTP layer turns it into a response.

pub mod chat;
pub mod outcome;
pub mod router;

// Re-export main entry point
pub use outcome::{ChatOutcome, Outcome};
pub use router::handle_request;
