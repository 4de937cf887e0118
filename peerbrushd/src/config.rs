//! Daemon configuration.
//!
//! Read from a JSON file; every field except `coordination_url` has a
//! default. A few environment variables override the file so secrets and
//! endpoints can be injected at deploy time.

use crate::DaemonError;
use peerbrush_driver::{DEFAULT_GREETING, Pacing};
use peerbrush_ledger::RECORD_FILE_NAME;
use peerbrush_scheduler::{DEFAULT_HELP_COMMAND, DEFAULT_HELP_TEXT, ScheduleConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Overrides `coordination_url`.
pub const ENV_COORDINATION_URL: &str = "PEERBRUSH_COORDINATION_URL";
/// Overrides `onebot_url`.
pub const ENV_ONEBOT_URL: &str = "PEERBRUSH_ONEBOT_URL";
/// Overrides `onebot_token`.
pub const ENV_ONEBOT_TOKEN: &str = "PEERBRUSH_ONEBOT_TOKEN";

/// Everything the daemon needs to assemble a scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Coordination service endpoint. Required.
    pub coordination_url: Option<String>,
    /// OneBot HTTP API base URL.
    pub onebot_url: String,
    /// OneBot access token, sent as a bearer token.
    pub onebot_token: Option<String>,
    /// Greeting sent to each peer.
    pub greeting: String,
    /// Text command answered with `help_text`.
    pub help_command: String,
    /// Reply to `help_command`.
    pub help_text: String,
    /// Status refresh period.
    pub refresh_interval_secs: u64,
    /// Interaction cycle period.
    pub cycle_interval_secs: u64,
    /// Pause after each packet.
    pub after_packet_ms: u64,
    /// Pause after each greeting.
    pub after_message_ms: u64,
    /// Per-request HTTP timeout for both remote services.
    pub request_timeout_secs: u64,
    /// Re-arm on heartbeat and message signals. Off means connect only.
    pub rearm_on_fallback_signals: bool,
    /// Ledger file. Relative paths resolve against the config file's
    /// directory. Defaults to `brush_record.json` beside the config file.
    pub ledger_path: Option<PathBuf>,

    #[serde(skip)]
    config_dir: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        let schedule = ScheduleConfig::default();
        let pacing = Pacing::default();
        Self {
            coordination_url: None,
            onebot_url: peerbrush_onebot::DEFAULT_BASE_URL.to_string(),
            onebot_token: None,
            greeting: DEFAULT_GREETING.to_string(),
            help_command: DEFAULT_HELP_COMMAND.to_string(),
            help_text: DEFAULT_HELP_TEXT.to_string(),
            refresh_interval_secs: schedule.refresh_interval.as_secs(),
            cycle_interval_secs: schedule.cycle_interval.as_secs(),
            after_packet_ms: duration_ms(pacing.after_packet),
            after_message_ms: duration_ms(pacing.after_message),
            request_timeout_secs: peerbrush_coord_http::DEFAULT_TIMEOUT.as_secs(),
            rearm_on_fallback_signals: true,
            ledger_path: None,
            config_dir: PathBuf::from("."),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl DaemonConfig {
    /// Load a config file. The file's directory becomes the base for the
    /// ledger path.
    pub fn from_path(path: &Path) -> Result<Self, DaemonError> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&text)?;
        config.config_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(config)
    }

    /// Parse a config document with no associated file.
    pub fn from_json(text: &str) -> Result<Self, DaemonError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_COORDINATION_URL) {
            self.coordination_url = Some(url);
        }
        if let Some(url) = get(ENV_ONEBOT_URL) {
            self.onebot_url = url;
        }
        if let Some(token) = get(ENV_ONEBOT_TOKEN) {
            self.onebot_token = Some(token);
        }
    }

    /// The coordination endpoint, or a config error when unset.
    pub fn coordination_url(&self) -> Result<&str, DaemonError> {
        self.coordination_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                DaemonError::Config(format!(
                    "coordination_url is required (set it in the config file or {ENV_COORDINATION_URL})"
                ))
            })
    }

    /// Where the run ledger lives.
    pub fn ledger_file(&self) -> PathBuf {
        match &self.ledger_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.config_dir.join(path),
            None => self.config_dir.join(RECORD_FILE_NAME),
        }
    }

    /// Per-peer pacing.
    pub fn pacing(&self) -> Pacing {
        Pacing {
            after_packet: Duration::from_millis(self.after_packet_ms),
            after_message: Duration::from_millis(self.after_message_ms),
        }
    }

    /// HTTP timeout for remote calls.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Scheduler settings.
    pub fn schedule_config(&self) -> ScheduleConfig {
        ScheduleConfig {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs.max(1)),
            cycle_interval: Duration::from_secs(self.cycle_interval_secs.max(1)),
            help_command: self.help_command.clone(),
            help_text: self.help_text.clone(),
            rearm_on_fallback_signals: self.rearm_on_fallback_signals,
        }
    }
}
