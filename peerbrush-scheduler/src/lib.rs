#![deny(missing_docs)]
//! Session state machine for one bot.
//!
//! A [`Scheduler`] starts [`SchedulerState::Idle`]. The first runtime
//! signal that names the bot captures its identity and arms the session:
//! one immediate status refresh and cycle, then two recurring timers.
//!
//! | Signal | Idle | Armed |
//! |--------|------|-------|
//! | lifecycle connect | arm | re-arm |
//! | heartbeat with `self_id` | arm | re-arm unless disabled |
//! | message with `self_id` | arm | as heartbeat |
//! | help command message | reply | reply |
//!
//! Turning off [`ScheduleConfig::rearm_on_fallback_signals`] leaves re-arming
//! to connect signals alone.
//!
//! Identity is first-write-wins. A signal naming a different bot than the
//! captured one is ignored with a warning.

mod timers;

use peerbrush_core::{BotId, ReplyScope, RuntimeEvent};
use peerbrush_driver::InteractionDriver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use timers::TimerSet;

/// Text command that triggers the help reply.
pub const DEFAULT_HELP_COMMAND: &str = "#互刷帮助";

/// Reply sent for [`DEFAULT_HELP_COMMAND`].
pub const DEFAULT_HELP_TEXT: &str = "【互刷帮助】
本功能会定时向协调服务上报在线状态，
并与其他在线 bot 互相发送好友请求和问候。
每个账号每天最多执行一次。

命令:
#互刷帮助 - 显示本帮助";

/// Timer periods and command handling for a [`Scheduler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Period of the status refresh timer.
    pub refresh_interval: Duration,
    /// Period of the interaction cycle timer.
    pub cycle_interval: Duration,
    /// Message text answered with [`ScheduleConfig::help_text`].
    pub help_command: String,
    /// Reply to the help command.
    pub help_text: String,
    /// Re-arm on heartbeat and message signals for the captured identity.
    /// When off, only connect re-arms an armed session.
    pub rearm_on_fallback_signals: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10 * 60),
            cycle_interval: Duration::from_secs(12 * 60 * 60),
            help_command: DEFAULT_HELP_COMMAND.to_string(),
            help_text: DEFAULT_HELP_TEXT.to_string(),
            rearm_on_fallback_signals: true,
        }
    }
}

/// Where the session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No identity captured yet.
    Idle,
    /// Identity captured; timers are live or being reinstalled.
    Armed(BotId),
}

/// What [`Scheduler::handle_event`] did with a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    /// The session was armed (or re-armed) for this bot.
    Armed(BotId),
    /// The help command was answered.
    HelpReplied,
    /// The signal named a bot other than the captured identity.
    IdentityConflict {
        /// The captured identity.
        current: BotId,
        /// The identity the signal carried.
        offered: BotId,
    },
    /// Nothing to do.
    Ignored,
}

#[derive(Default)]
struct Session {
    identity: Option<BotId>,
    timers: Option<TimerSet>,
}

struct Inner {
    driver: Arc<InteractionDriver>,
    config: ScheduleConfig,
    session: Mutex<Session>,
}

/// Owns the session identity and its timers.
///
/// Cheap to clone; clones share one session. Dropping the last clone stops
/// the timers.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
}

impl Scheduler {
    /// Create an idle scheduler driving `driver`.
    pub fn new(driver: Arc<InteractionDriver>, config: ScheduleConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                driver,
                config,
                session: Mutex::new(Session::default()),
            }),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        match self.session().identity {
            Some(bot) => SchedulerState::Armed(bot),
            None => SchedulerState::Idle,
        }
    }

    /// The configuration in effect.
    pub fn config(&self) -> &ScheduleConfig {
        &self.inner.config
    }

    /// Capture `bot` (if no identity is set), stop any live timers, run one
    /// refresh and one cycle, then start fresh timers.
    ///
    /// Calling this again for the same bot repeats the whole sequence and
    /// leaves exactly one timer pair live. A cycle already running is not
    /// interrupted.
    pub async fn arm(&self, bot: BotId) -> SignalOutcome {
        {
            let mut session = self.session();
            if let Some(current) = session.identity {
                if current != bot {
                    tracing::warn!(current = %current, offered = %bot, "peerbrush.scheduler.identity_conflict");
                    return SignalOutcome::IdentityConflict {
                        current,
                        offered: bot,
                    };
                }
            }
            session.identity = Some(bot);
            session.timers = None;
        }

        tracing::info!(bot = %bot, "peerbrush.scheduler.arming");
        let driver = &self.inner.driver;
        driver.refresh_status(&bot).await;
        let outcome = driver.run_cycle(&bot).await;
        tracing::debug!(bot = %bot, ?outcome, "peerbrush.scheduler.initial_cycle");

        let timers = TimerSet::start(
            Arc::clone(driver),
            bot,
            self.inner.config.refresh_interval,
            self.inner.config.cycle_interval,
        );
        self.session().timers = Some(timers);
        tracing::info!(
            bot = %bot,
            refresh_secs = self.inner.config.refresh_interval.as_secs(),
            cycle_secs = self.inner.config.cycle_interval.as_secs(),
            "peerbrush.scheduler.armed"
        );
        SignalOutcome::Armed(bot)
    }

    /// React to one runtime signal.
    pub async fn handle_event(&self, event: RuntimeEvent) -> SignalOutcome {
        tracing::debug!(kind = event.kind(), "peerbrush.scheduler.event");
        match event {
            RuntimeEvent::Connected { self_id } => {
                tracing::info!(bot = %self_id, "peerbrush.scheduler.connected");
                self.arm(self_id).await
            }
            RuntimeEvent::Heartbeat {
                self_id: Some(self_id),
            } => self.arm_on_fallback(self_id, "heartbeat").await,
            RuntimeEvent::Message(message) => {
                if message.raw_message == self.inner.config.help_command {
                    return self.reply_help(message.reply_scope).await;
                }
                match message.self_id {
                    Some(self_id) => self.arm_on_fallback(self_id, "message").await,
                    None => SignalOutcome::Ignored,
                }
            }
            _ => SignalOutcome::Ignored,
        }
    }

    async fn arm_on_fallback(&self, bot: BotId, signal: &'static str) -> SignalOutcome {
        let captured = self.session().identity;
        if captured.is_some() && !self.inner.config.rearm_on_fallback_signals {
            return SignalOutcome::Ignored;
        }
        tracing::info!(bot = %bot, signal, "peerbrush.scheduler.identity_from_fallback");
        self.arm(bot).await
    }

    async fn reply_help(&self, scope: Option<ReplyScope>) -> SignalOutcome {
        let Some(scope) = scope else {
            tracing::debug!("peerbrush.scheduler.help_without_scope");
            return SignalOutcome::Ignored;
        };
        if let Err(e) = self
            .inner
            .driver
            .dispatch()
            .dispatch_reply(&scope, &self.inner.config.help_text)
            .await
        {
            tracing::warn!(error = %e, "peerbrush.scheduler.help_reply_failed");
        }
        SignalOutcome::HelpReplied
    }
}
