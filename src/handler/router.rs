//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path matching, dispatch to the chat
//! handler, and access logging.

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Request, Response};
use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;

use super::chat;
use super::outcome::Outcome;
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::processor::ChatProcessor;

/// Paths served by the chat handler
pub const CHAT_PATHS: [&str; 2] = ["/", "/chat"];

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Display,
{
    let mut entry = state
        .access_log_enabled()
        .then(|| AccessLogEntry::from_request(&req, remote_addr));

    let outcome = route_request(req, &state.processor).await;
    let response = http::build_response(&outcome);

    if let Some(entry) = entry.as_mut() {
        entry.finish(
            response.status().as_u16(),
            response.body().size_hint().exact().unwrap_or(0),
        );
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request by path and produce its outcome
pub async fn route_request<B>(req: Request<B>, processor: &Arc<dyn ChatProcessor>) -> Outcome
where
    B: Body,
    B::Error: Display,
{
    let path = req.uri().path().to_string();
    logger::log_info(&format!("Received {} request for {path}", req.method()));

    if !is_chat_path(&path) {
        logger::log_warning(&format!("No route matched for {path}. Returning 404."));
        return Outcome::NotFound;
    }

    logger::log_debug("Routing to chat handler...");
    match chat::handle_chat(req, Arc::clone(processor)).await {
        Ok(outcome) => {
            logger::log_debug("Chat handler finished");
            Outcome::Routed(outcome)
        }
        Err(e) => {
            logger::log_error(&format!("Unhandled error while handling {path}: {e}"));
            Outcome::InternalError
        }
    }
}

fn is_chat_path(path: &str) -> bool {
    CHAT_PATHS.contains(&path)
}
