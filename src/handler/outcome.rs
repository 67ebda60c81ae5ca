//! Request outcomes
//!
//! Every request ends in exactly one of these states. `http::build_response`
//! turns an outcome into the wire response; nothing else picks status codes.

use crate::chat::ChatResult;

/// Terminal state of the chat handler
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    /// CORS preflight (`OPTIONS`)
    Preflight,
    /// Any method other than `POST` or `OPTIONS`
    MethodRejected,
    /// Body could not be read or decoded, or the processor errored
    RequestFailed { details: String },
    /// Processor produced a result, successful or not
    Completed(ChatResult),
}

/// Terminal state of the router
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Routed(ChatOutcome),
    NotFound,
    /// Failure that escaped the chat handler
    InternalError,
}
