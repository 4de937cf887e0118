use peerbrush_core::test_utils::{
    DispatchRecord, FixedClock, InMemoryLedgerStore, RecordingDispatch, ScriptedCoordinator,
};
use peerbrush_core::{BotId, MessageEvent, PeerId, ReplyScope, RuntimeEvent};
use peerbrush_driver::{InteractionDriver, Pacing};
use peerbrush_ledger::RunLedger;
use peerbrush_scheduler::{
    DEFAULT_HELP_TEXT, ScheduleConfig, Scheduler, SchedulerState, SignalOutcome,
};
use std::sync::Arc;
use std::time::Duration;

const BOT: BotId = BotId(10001);
const TEN_MINUTES: Duration = Duration::from_secs(600);
const TWELVE_HOURS: Duration = Duration::from_secs(43_200);

struct Harness {
    coord: Arc<ScriptedCoordinator>,
    dispatch: Arc<RecordingDispatch>,
    clock: Arc<FixedClock>,
    scheduler: Scheduler,
}

fn harness_with(peers: &[u64], pacing: Pacing, config: ScheduleConfig) -> Harness {
    let coord = Arc::new(ScriptedCoordinator::with_peers(peers.iter().copied()));
    let dispatch = Arc::new(RecordingDispatch::new());
    let clock = Arc::new(FixedClock::on("2024-03-01"));
    let ledger = Arc::new(
        RunLedger::new(Arc::new(InMemoryLedgerStore::new())).with_clock(clock.clone()),
    );
    let driver = Arc::new(
        InteractionDriver::new(coord.clone(), dispatch.clone(), ledger).with_pacing(pacing),
    );
    Harness {
        coord,
        dispatch,
        clock,
        scheduler: Scheduler::new(driver, config),
    }
}

fn harness(peers: &[u64]) -> Harness {
    harness_with(peers, Pacing::none(), ScheduleConfig::default())
}

fn message(self_id: Option<u64>, text: &str, scope: Option<ReplyScope>) -> RuntimeEvent {
    RuntimeEvent::Message(MessageEvent {
        self_id: self_id.map(BotId),
        raw_message: text.to_string(),
        reply_scope: scope,
    })
}

/// Let tasks spawned by timer ticks finish.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// --- Arming ---

#[tokio::test(start_paused = true)]
async fn connect_arms_and_runs_immediately() {
    let h = harness(&[10002]);
    assert_eq!(h.scheduler.state(), SchedulerState::Idle);

    let outcome = h
        .scheduler
        .handle_event(RuntimeEvent::Connected { self_id: BOT })
        .await;

    assert_eq!(outcome, SignalOutcome::Armed(BOT));
    assert_eq!(h.scheduler.state(), SchedulerState::Armed(BOT));
    assert_eq!(h.dispatch.message_targets(), vec![PeerId(10002)]);
    // One explicit refresh plus the cycle's own refresh.
    assert_eq!(h.coord.publish_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn rearm_twice_leaves_one_timer_pair() {
    let h = harness(&[]);

    h.scheduler.arm(BOT).await;
    h.scheduler.arm(BOT).await;
    assert_eq!(h.coord.publish_count(), 4);
    // Empty discovery never marks the ledger, so each arm lists once.
    assert_eq!(h.coord.list_count(), 2);

    tokio::time::sleep(TEN_MINUTES + Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(h.coord.publish_count(), 5);

    tokio::time::sleep(TEN_MINUTES).await;
    settle().await;
    assert_eq!(h.coord.publish_count(), 6);
}

#[tokio::test(start_paused = true)]
async fn rearm_twice_leaves_one_cycle_timer() {
    let h = harness(&[]);

    h.scheduler.arm(BOT).await;
    h.scheduler.arm(BOT).await;
    assert_eq!(h.coord.list_count(), 2);

    tokio::time::sleep(TWELVE_HOURS + Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(h.coord.list_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn refresh_timer_ticks_every_ten_minutes() {
    let h = harness(&[]);
    h.scheduler.arm(BOT).await;
    let after_arm = h.coord.publish_count();

    tokio::time::sleep(TEN_MINUTES * 3 + Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(h.coord.publish_count(), after_arm + 3);
}

#[tokio::test(start_paused = true)]
async fn cycle_timer_skips_while_ledger_is_current() {
    let h = harness(&[10002]);
    h.scheduler.arm(BOT).await;

    tokio::time::sleep(TWELVE_HOURS + Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(h.dispatch.message_targets(), vec![PeerId(10002)]);
    assert_eq!(h.coord.list_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn cycle_timer_runs_again_on_a_new_day() {
    let h = harness(&[10002]);
    h.scheduler.arm(BOT).await;

    h.clock.advance_days(1);
    tokio::time::sleep(TWELVE_HOURS + Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(
        h.dispatch.message_targets(),
        vec![PeerId(10002), PeerId(10002)]
    );
}

#[tokio::test(start_paused = true)]
async fn cycle_timer_retries_after_empty_discovery() {
    let h = harness(&[]);
    h.scheduler.arm(BOT).await;
    assert!(h.dispatch.records().is_empty());

    h.coord.set_peers([10002]);
    tokio::time::sleep(TWELVE_HOURS + Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(h.dispatch.message_targets(), vec![PeerId(10002)]);
}

#[tokio::test(start_paused = true)]
async fn rearm_does_not_interrupt_running_cycle() {
    let h = harness_with(&[1, 2], Pacing::default(), ScheduleConfig::default());

    let first = {
        let scheduler = h.scheduler.clone();
        tokio::spawn(async move { scheduler.arm(BOT).await })
    };
    tokio::task::yield_now().await;

    // The second arm finds the cycle in flight and returns without waiting.
    assert_eq!(h.scheduler.arm(BOT).await, SignalOutcome::Armed(BOT));
    assert_eq!(first.await.unwrap(), SignalOutcome::Armed(BOT));
    assert_eq!(h.dispatch.message_targets(), vec![PeerId(1), PeerId(2)]);
}

// --- Identity capture ---

#[tokio::test(start_paused = true)]
async fn heartbeat_arms_when_idle() {
    let h = harness(&[]);

    let outcome = h
        .scheduler
        .handle_event(RuntimeEvent::Heartbeat {
            self_id: Some(BOT),
        })
        .await;
    assert_eq!(outcome, SignalOutcome::Armed(BOT));
    assert_eq!(h.scheduler.state(), SchedulerState::Armed(BOT));
}

#[tokio::test(start_paused = true)]
async fn heartbeat_without_identity_is_ignored() {
    let h = harness(&[]);

    let outcome = h
        .scheduler
        .handle_event(RuntimeEvent::Heartbeat { self_id: None })
        .await;
    assert_eq!(outcome, SignalOutcome::Ignored);
    assert_eq!(h.scheduler.state(), SchedulerState::Idle);
    assert!(h.coord.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn heartbeat_rearms_armed_session() {
    let h = harness(&[]);
    h.scheduler.arm(BOT).await;
    assert_eq!(h.coord.publish_count(), 2);

    let outcome = h
        .scheduler
        .handle_event(RuntimeEvent::Heartbeat {
            self_id: Some(BOT),
        })
        .await;
    assert_eq!(outcome, SignalOutcome::Armed(BOT));
    assert_eq!(h.scheduler.state(), SchedulerState::Armed(BOT));
    assert_eq!(h.coord.publish_count(), 4);

    tokio::time::sleep(TEN_MINUTES + Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(h.coord.publish_count(), 5);
}

#[tokio::test(start_paused = true)]
async fn message_rearms_armed_session() {
    let h = harness(&[]);
    h.scheduler.arm(BOT).await;

    let outcome = h
        .scheduler
        .handle_event(message(Some(10001), "hi", None))
        .await;
    assert_eq!(outcome, SignalOutcome::Armed(BOT));
    assert_eq!(h.coord.publish_count(), 4);
    assert_eq!(h.coord.list_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn connect_only_rearm_ignores_fallback_signals() {
    let config = ScheduleConfig {
        rearm_on_fallback_signals: false,
        ..ScheduleConfig::default()
    };
    let h = harness_with(&[], Pacing::none(), config);
    h.scheduler.arm(BOT).await;
    let calls = h.coord.calls().len();

    let heartbeat = RuntimeEvent::Heartbeat {
        self_id: Some(BOT),
    };
    assert_eq!(
        h.scheduler.handle_event(heartbeat).await,
        SignalOutcome::Ignored
    );
    assert_eq!(
        h.scheduler.handle_event(message(Some(10001), "hi", None)).await,
        SignalOutcome::Ignored
    );
    assert_eq!(h.coord.calls().len(), calls);

    // Connect still re-arms.
    let connect = RuntimeEvent::Connected { self_id: BOT };
    assert_eq!(
        h.scheduler.handle_event(connect).await,
        SignalOutcome::Armed(BOT)
    );
    assert_eq!(h.coord.publish_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn idle_session_arms_from_heartbeat_without_rearm() {
    let config = ScheduleConfig {
        rearm_on_fallback_signals: false,
        ..ScheduleConfig::default()
    };
    let h = harness_with(&[], Pacing::none(), config);

    let outcome = h
        .scheduler
        .handle_event(RuntimeEvent::Heartbeat {
            self_id: Some(BOT),
        })
        .await;
    assert_eq!(outcome, SignalOutcome::Armed(BOT));
}

#[tokio::test(start_paused = true)]
async fn message_arms_when_idle() {
    let h = harness(&[]);

    let outcome = h
        .scheduler
        .handle_event(message(Some(10001), "hello", None))
        .await;
    assert_eq!(outcome, SignalOutcome::Armed(BOT));
}

#[tokio::test(start_paused = true)]
async fn different_identity_is_rejected() {
    let h = harness(&[]);
    h.scheduler.arm(BOT).await;
    let calls = h.coord.calls().len();

    let outcome = h
        .scheduler
        .handle_event(RuntimeEvent::Connected {
            self_id: BotId(20002),
        })
        .await;
    assert_eq!(
        outcome,
        SignalOutcome::IdentityConflict {
            current: BOT,
            offered: BotId(20002),
        }
    );
    assert_eq!(h.scheduler.state(), SchedulerState::Armed(BOT));
    assert_eq!(h.coord.calls().len(), calls);
}

#[tokio::test(start_paused = true)]
async fn other_events_are_ignored() {
    let h = harness(&[]);
    assert_eq!(
        h.scheduler.handle_event(RuntimeEvent::Other).await,
        SignalOutcome::Ignored
    );
    assert_eq!(h.scheduler.state(), SchedulerState::Idle);
}

// --- Help command ---

#[tokio::test(start_paused = true)]
async fn help_command_replies_in_group() {
    let h = harness(&[]);

    let outcome = h
        .scheduler
        .handle_event(message(
            Some(10001),
            "#互刷帮助",
            Some(ReplyScope::Group { group_id: 555 }),
        ))
        .await;

    assert_eq!(outcome, SignalOutcome::HelpReplied);
    assert_eq!(
        h.dispatch.records(),
        vec![DispatchRecord::Reply {
            scope: ReplyScope::Group { group_id: 555 },
            text: DEFAULT_HELP_TEXT.to_string(),
        }]
    );
    // The help command does not capture the identity.
    assert_eq!(h.scheduler.state(), SchedulerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn help_command_replies_in_private() {
    let h = harness(&[]);

    h.scheduler
        .handle_event(message(
            None,
            "#互刷帮助",
            Some(ReplyScope::Private { user_id: 42 }),
        ))
        .await;
    assert!(matches!(
        h.dispatch.records().as_slice(),
        [DispatchRecord::Reply {
            scope: ReplyScope::Private { user_id: 42 },
            ..
        }]
    ));
}

#[tokio::test(start_paused = true)]
async fn custom_help_command() {
    let config = ScheduleConfig {
        help_command: "/help".into(),
        help_text: "usage".into(),
        ..ScheduleConfig::default()
    };
    let h = harness_with(&[], Pacing::none(), config);
    let scope = Some(ReplyScope::Private { user_id: 1 });

    assert_eq!(
        h.scheduler
            .handle_event(message(None, "/help", scope))
            .await,
        SignalOutcome::HelpReplied
    );
    assert_eq!(
        h.scheduler
            .handle_event(message(None, "#互刷帮助", scope))
            .await,
        SignalOutcome::Ignored
    );
    assert_eq!(h.dispatch.records().len(), 1);
}
