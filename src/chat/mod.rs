//! Chat data model
//!
//! Request decoding and the result shape exchanged with the chat processor.

mod request;
mod result;

pub use request::{decode, ChatRequest, DecodeError};
pub use result::ChatResult;
