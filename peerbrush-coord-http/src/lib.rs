#![deny(missing_docs)]
//! HTTP client for the coordination service.
//!
//! Implements [`peerbrush_core::Coordinator`] over the service's single
//! form-POST endpoint. Two entry points share one request path:
//!
//! - [`HttpCoordinator::try_call`] reports transport and parse failures as
//!   [`CoordError`].
//! - [`HttpCoordinator::call`] never fails; those failures come back as
//!   [`CallResponse`] with `code == -1`, after being logged.

mod error;
mod types;

pub use types::{Action, CallResponse};

use async_trait::async_trait;
use error::{map_http_status, map_reqwest_error};
use peerbrush_core::{BotId, CoordError, Coordinator, PeerId};
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Form field carrying the bot identity.
const IDENTITY_PARAM: &str = "qq";

/// Coordination service client.
///
/// # Example
///
/// ```no_run
/// use peerbrush_coord_http::HttpCoordinator;
/// use std::time::Duration;
///
/// let coord = HttpCoordinator::new("http://coord.example:11111/ccc.php")
///     .with_timeout(Duration::from_secs(10));
/// ```
pub struct HttpCoordinator {
    client: reqwest::Client,
    api_url: String,
    timeout: Duration,
}

impl HttpCoordinator {
    /// Create a client for the endpoint at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reuse an existing HTTP client (connection pool, proxy settings).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Endpoint this client posts to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Issue one request and parse the envelope.
    ///
    /// `action` and every param are sent as form fields, in order.
    pub async fn try_call(
        &self,
        action: u32,
        params: &[(&str, String)],
    ) -> Result<CallResponse, CoordError> {
        let mut form: Vec<(&str, String)> = Vec::with_capacity(params.len() + 1);
        form.push(("action", action.to_string()));
        form.extend(params.iter().cloned());

        tracing::debug!(url = %self.api_url, action, ?params, "peerbrush.coord.request");

        let response = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .form(&form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(map_http_status(status, &body));
        }

        let parsed: CallResponse = serde_json::from_str(&body)
            .map_err(|e| CoordError::InvalidResponse(format!("{e}: {body}")))?;
        tracing::debug!(action, code = parsed.code, data = ?parsed.data, "peerbrush.coord.response");
        Ok(parsed)
    }

    /// Issue one request; any failure becomes `code == -1`.
    pub async fn call(&self, action: u32, params: &[(&str, String)]) -> CallResponse {
        match self.try_call(action, params).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(action, error = %e, "peerbrush.coord.call_failed");
                CallResponse::failed()
            }
        }
    }

    async fn call_for(&self, action: Action, bot: &BotId) -> Result<CallResponse, CoordError> {
        let resp = self
            .try_call(action.code(), &[(IDENTITY_PARAM, bot.to_string())])
            .await?;
        if !resp.is_ok() {
            return Err(CoordError::Rejected {
                action: action.code(),
                code: resp.code,
            });
        }
        Ok(resp)
    }
}

/// Interpret a peer-list payload. Non-array payloads mean nobody is online;
/// entries that are not account numbers are dropped.
fn parse_peers(data: Option<&serde_json::Value>) -> Vec<PeerId> {
    let Some(entries) = data.and_then(|d| d.as_array()) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let peer = PeerId::from_json(entry);
            if peer.is_none() {
                tracing::warn!(?entry, "peerbrush.coord.bad_peer_entry");
            }
            peer
        })
        .collect()
}

#[async_trait]
impl Coordinator for HttpCoordinator {
    async fn publish_online(&self, bot: &BotId) -> Result<(), CoordError> {
        self.call_for(Action::PublishOnline, bot).await.map(|_| ())
    }

    async fn list_online_peers(&self, bot: &BotId) -> Result<Vec<PeerId>, CoordError> {
        let resp = self.call_for(Action::ListOnlinePeers, bot).await?;
        Ok(parse_peers(resp.data.as_ref()))
    }
}
