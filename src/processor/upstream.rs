// Upstream processor
// Forwards chat requests to an HTTP service and decodes its JSON reply

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Method, Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::{ChatProcessor, ProcessFuture, ProcessorError};
use crate::chat::{ChatRequest, ChatResult};

/// Processor backed by a plain-HTTP upstream service
///
/// The request is sent as the JSON body of a `POST`. The upstream status code is
/// not interpreted: the reply body must itself be a chat result.
#[derive(Clone)]
pub struct UpstreamProcessor {
    client: Client<HttpConnector, Full<Bytes>>,
    uri: Uri,
}

impl UpstreamProcessor {
    pub fn new(upstream_url: &str) -> Result<Self, ProcessorError> {
        let uri: Uri = upstream_url
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| ProcessorError::InvalidUrl {
                url: upstream_url.to_string(),
                reason: e.to_string(),
            })?;

        if uri.scheme_str() != Some("http") || uri.host().is_none() {
            return Err(ProcessorError::InvalidUrl {
                url: upstream_url.to_string(),
                reason: "expected an absolute http:// URL".to_string(),
            });
        }

        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self { client, uri })
    }

    pub const fn uri(&self) -> &Uri {
        &self.uri
    }
}

impl ChatProcessor for UpstreamProcessor {
    fn process(&self, request: ChatRequest) -> ProcessFuture {
        Box::pin(forward(self.client.clone(), self.uri.clone(), request))
    }
}

async fn forward(
    client: Client<HttpConnector, Full<Bytes>>,
    uri: Uri,
    request: ChatRequest,
) -> Result<ChatResult, ProcessorError> {
    let payload = serde_json::to_vec(&request)?;

    let upstream_request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(ACCEPT, "application/json")
        .body(Full::new(Bytes::from(payload)))
        .map_err(|e| ProcessorError::Transport(e.to_string()))?;

    let response = client
        .request(upstream_request)
        .await
        .map_err(|e| ProcessorError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| ProcessorError::Transport(e.to_string()))?
        .to_bytes();

    serde_json::from_slice(&body).map_err(|e| ProcessorError::InvalidResponse {
        status,
        reason: e.to_string(),
    })
}
