//! REST transport for the toggle endpoint.
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::debug;
use upvotes_shared::types::{ApiResponse, ResourceRef, VoteState};

use crate::errors::ToggleFailure;
use crate::transport::ToggleTransport;

/// Calls `POST {base_url}/api/{posts|comments}/{id}/upvote`.
#[derive(Debug, Clone)]
pub struct HttpToggleClient {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpToggleClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Uses a preconfigured client (cookies, timeouts, TLS).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: HeaderMap::new(),
        }
    }

    /// Adds a header sent with every toggle, e.g. the identity header when
    /// talking to the API without the auth proxy in front.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn toggle_url(&self, resource: ResourceRef) -> String {
        format!(
            "{}/api/{}/{}/upvote",
            self.base_url,
            resource.kind.path_segment(),
            resource.id
        )
    }
}

#[async_trait]
impl ToggleTransport for HttpToggleClient {
    async fn toggle(&self, resource: ResourceRef) -> Result<VoteState, ToggleFailure> {
        let url = self.toggle_url(resource);
        debug!(%url, "Sending toggle request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        decode_toggle_response(resource, status, &body)
    }
}

/// Failure bodies: the board's `{ success: false, message }`, or the bare
/// `{ error }` some middleware answers with.
#[derive(Debug, Deserialize)]
struct FailureBody {
    message: Option<String>,
    error: Option<String>,
}

/// Maps a toggle response to its outcome.
///
/// 404 becomes `NotFound`, 401 `Unauthorized`; any other non-2xx status, or
/// a 2xx whose envelope is not a successful `{ isUpvoted, points }`, becomes
/// `Server`.
pub fn decode_toggle_response(
    resource: ResourceRef,
    status: u16,
    body: &[u8],
) -> Result<VoteState, ToggleFailure> {
    match status {
        200..=299 => {
            let envelope: ApiResponse<VoteState> =
                serde_json::from_slice(body).map_err(|e| ToggleFailure::Server {
                    status,
                    message: format!("Malformed toggle response: {e}"),
                })?;
            if !envelope.success {
                return Err(ToggleFailure::Server {
                    status,
                    message: envelope.message,
                });
            }
            Ok(envelope.data)
        }
        404 => Err(ToggleFailure::NotFound(resource)),
        401 => Err(ToggleFailure::Unauthorized),
        _ => {
            let message = serde_json::from_slice::<FailureBody>(body)
                .ok()
                .and_then(|failure| failure.message.or(failure.error))
                .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
            Err(ToggleFailure::Server { status, message })
        }
    }
}
