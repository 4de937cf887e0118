#![deny(missing_docs)]
//! OneBot v11 HTTP action adapter.
//!
//! Implements [`peerbrush_core::ActionDispatch`] by posting JSON to
//! `{base_url}/{action}` on a OneBot-compatible host (NapCat, Lagrange,
//! go-cqhttp). Three actions are used:
//!
//! | Capability | OneBot action |
//! |------------|---------------|
//! | `dispatch_packet` | `send_packet` with `rsp: false` |
//! | `dispatch_message` | `send_private_msg` |
//! | `dispatch_reply` | `send_msg` |

mod error;
pub mod types;

use async_trait::async_trait;
use error::{is_no_data_returned, map_http_status, map_reqwest_error};
use peerbrush_core::{ActionDispatch, DispatchError, PeerId, ReplyScope};
use serde::Serialize;
use std::time::Duration;
use types::{ActionResponse, SendMsg, SendPacket, SendPrivateMsg};

/// Default OneBot HTTP endpoint.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OneBot v11 HTTP client.
pub struct OneBotActions {
    client: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    timeout: Duration,
}

impl OneBotActions {
    /// Create a client for the host at [`DEFAULT_BASE_URL`].
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the host URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Send `Authorization: Bearer <token>` with every action.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Override the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/{action}", self.base_url)
    }

    /// Invoke `action` with `params` and return the parsed envelope.
    ///
    /// An empty body counts as a success with no data; some hosts answer
    /// fire-and-forget actions that way.
    pub async fn call<P: Serialize + Sync>(
        &self,
        action: &str,
        params: &P,
    ) -> Result<ActionResponse, DispatchError> {
        tracing::debug!(action, "peerbrush.onebot.call");

        let mut request = self
            .client
            .post(self.action_url(action))
            .timeout(self.timeout)
            .json(params);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;
        if !status.is_success() {
            return Err(map_http_status(action, status, &body));
        }

        if body.trim().is_empty() {
            return Ok(ActionResponse {
                status: "ok".into(),
                retcode: 0,
                data: None,
                message: None,
                wording: None,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| DispatchError::Transport(format!("invalid response from {action}: {e}")))
    }

    async fn call_checked<P: Serialize + Sync>(
        &self,
        action: &str,
        params: &P,
    ) -> Result<ActionResponse, DispatchError> {
        let resp = self.call(action, params).await?;
        if resp.is_ok() {
            Ok(resp)
        } else {
            Err(DispatchError::Failed {
                action: action.to_string(),
                retcode: resp.retcode,
                message: resp.reason(),
            })
        }
    }
}

impl Default for OneBotActions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionDispatch for OneBotActions {
    async fn dispatch_packet(&self, cmd: &str, hex_payload: &str) -> Result<(), DispatchError> {
        let params = SendPacket {
            cmd,
            data: hex_payload,
            rsp: false,
        };
        match self.call_checked("send_packet", &params).await {
            Ok(_) => Ok(()),
            // Expected: we asked for no reply.
            Err(DispatchError::Failed { message, .. }) if is_no_data_returned(&message) => {
                tracing::debug!(cmd, "peerbrush.onebot.packet_sent_no_reply");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn dispatch_message(&self, target: PeerId, text: &str) -> Result<(), DispatchError> {
        let params = SendPrivateMsg {
            user_id: target.to_string(),
            message: text,
        };
        self.call_checked("send_private_msg", &params).await.map(|_| ())
    }

    async fn dispatch_reply(&self, scope: &ReplyScope, text: &str) -> Result<(), DispatchError> {
        self.call_checked("send_msg", &SendMsg::reply(scope, text))
            .await
            .map(|_| ())
    }
}
