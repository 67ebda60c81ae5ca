//! Chat handler
//!
//! Method check, body decoding and processor invocation for the chat paths.

use http_body_util::BodyExt;
use hyper::body::Body;
use hyper::{Method, Request};
use std::fmt::Display;
use std::sync::Arc;
use thiserror::Error;

use super::outcome::ChatOutcome;
use crate::chat::{self, ChatRequest, DecodeError};
use crate::logger;
use crate::processor::ChatProcessor;

/// Failure the chat handler cannot turn into a chat outcome
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat processor task failed: {0}")]
    ProcessorTask(#[from] tokio::task::JoinError),
}

/// Handle a request on a chat path
///
/// The processor is invoked on its own task, so a panic while building or
/// polling its future surfaces as `ChatError` instead of tearing down the
/// connection.
pub async fn handle_chat<B>(
    req: Request<B>,
    processor: Arc<dyn ChatProcessor>,
) -> Result<ChatOutcome, ChatError>
where
    B: Body,
    B::Error: Display,
{
    match *req.method() {
        Method::OPTIONS => {
            logger::log_debug("Handling OPTIONS preflight request");
            return Ok(ChatOutcome::Preflight);
        }
        Method::POST => {}
        ref other => {
            logger::log_warning(&format!(
                "Received a {other} request, but only POST is allowed"
            ));
            return Ok(ChatOutcome::MethodRejected);
        }
    }

    logger::log_debug("Decoding request body as JSON...");
    let request = match read_chat_request(req).await {
        Ok(request) => request,
        Err(e) => {
            logger::log_error(&format!("Error handling chat request: {e}"));
            return Ok(ChatOutcome::RequestFailed {
                details: e.to_string(),
            });
        }
    };

    logger::log_debug("Calling chat processor...");
    let processed = tokio::spawn(async move { processor.process(request).await }).await?;

    match processed {
        Ok(result) => {
            if !result.success {
                logger::log_warning(&format!(
                    "Chat processor reported failure: {}",
                    result.error().unwrap_or("no error message")
                ));
            }
            Ok(ChatOutcome::Completed(result))
        }
        Err(e) => {
            logger::log_error(&format!("Error handling chat request: {e}"));
            Ok(ChatOutcome::RequestFailed {
                details: e.to_string(),
            })
        }
    }
}

async fn read_chat_request<B>(req: Request<B>) -> Result<ChatRequest, DecodeError>
where
    B: Body,
    B::Error: Display,
{
    let body = req
        .into_body()
        .collect()
        .await
        .map_err(|e| DecodeError::Body(e.to_string()))?
        .to_bytes();
    chat::decode(&body)
}
