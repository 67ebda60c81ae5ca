//! Chat processor module
//!
//! The processor is the collaborator that actually answers a chat request.
//! The gateway only depends on the `ChatProcessor` trait; `UpstreamProcessor`
//! forwards to an HTTP service.

mod upstream;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::chat::{ChatRequest, ChatResult};

pub use upstream::UpstreamProcessor;

/// Future returned by `ChatProcessor::process`
pub type ProcessFuture = Pin<Box<dyn Future<Output = Result<ChatResult, ProcessorError>> + Send>>;

/// Produces a `ChatResult` for a decoded request
///
/// The returned future must not borrow the processor so it can run on its own task.
pub trait ChatProcessor: Send + Sync {
    fn process(&self, request: ChatRequest) -> ProcessFuture;
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream returned an invalid response (status {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },
}

#[cfg(test)]
pub mod testing {
    //! In-process processors for handler tests

    use super::{ChatProcessor, ProcessFuture, ProcessorError};
    use crate::chat::{ChatRequest, ChatResult};
    use std::sync::{Arc, Mutex};

    /// Returns a fixed result and records the requests it saw
    pub struct FixedProcessor {
        result: ChatResult,
        pub seen: Arc<Mutex<Vec<ChatRequest>>>,
    }

    impl FixedProcessor {
        pub fn new(result: serde_json::Value) -> Self {
            Self {
                result: serde_json::from_value(result).expect("valid chat result"),
                seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl ChatProcessor for FixedProcessor {
        fn process(&self, request: ChatRequest) -> ProcessFuture {
            self.seen.lock().unwrap().push(request);
            let result = self.result.clone();
            Box::pin(async move { Ok::<_, ProcessorError>(result) })
        }
    }

    /// Always fails with a transport error
    pub struct FailingProcessor;

    impl ChatProcessor for FailingProcessor {
        fn process(&self, _request: ChatRequest) -> ProcessFuture {
            Box::pin(async {
                Err::<ChatResult, _>(ProcessorError::Transport("connection refused".to_string()))
            })
        }
    }

    /// Panics while processing
    pub struct PanickingProcessor;

    impl ChatProcessor for PanickingProcessor {
        fn process(&self, _request: ChatRequest) -> ProcessFuture {
            Box::pin(crash())
        }
    }

    async fn crash() -> Result<ChatResult, ProcessorError> {
        panic!("processor crashed")
    }

    /// Panics inside `process` before any future exists
    pub struct EagerPanickingProcessor;

    impl ChatProcessor for EagerPanickingProcessor {
        fn process(&self, _request: ChatRequest) -> ProcessFuture {
            panic!("processor crashed before returning a future")
        }
    }
}
