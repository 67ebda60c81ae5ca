//! HTTP protocol layer module
//!
//! Response construction, decoupled from routing and chat logic.

pub mod response;

// Re-export commonly used items
pub use response::build_response;
