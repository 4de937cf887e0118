use peerbrush_core::test_utils::{DispatchRecord, RecordingDispatch, ScriptedCoordinator};
use peerbrush_core::{PeerId, ReplyScope};
use peerbrushd::intake::{IntakeStats, run_intake};
use peerbrushd::{DaemonConfig, assemble};
use std::sync::Arc;

const CONNECT: &str = r#"{"post_type":"meta_event","meta_event_type":"lifecycle","sub_type":"connect","self_id":10001,"time":1700000000}"#;
const HEARTBEAT: &str = r#"{"post_type":"meta_event","meta_event_type":"heartbeat","self_id":10001,"interval":5000}"#;
const HELP: &str = r##"{"post_type":"message","message_type":"group","group_id":555,"user_id":42,"self_id":10001,"raw_message":"#互刷帮助"}"##;

fn config_in(dir: &std::path::Path) -> DaemonConfig {
    let mut config = DaemonConfig::from_json(
        r#"{"coordination_url": "http://unused", "after_packet_ms": 0, "after_message_ms": 0}"#,
    )
    .unwrap();
    config.ledger_path = Some(dir.join("brush_record.json"));
    config
}

#[tokio::test]
async fn connect_line_runs_a_cycle_and_writes_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let coord = Arc::new(ScriptedCoordinator::with_peers([10002, 10003]));
    let dispatch = Arc::new(RecordingDispatch::new());
    let scheduler = assemble(&config, coord.clone(), dispatch.clone());

    let input = format!("{CONNECT}\n");
    let stats = run_intake(input.as_bytes(), scheduler).await.unwrap();

    assert_eq!(
        stats,
        IntakeStats {
            accepted: 1,
            rejected: 0
        }
    );
    assert_eq!(
        dispatch.message_targets(),
        vec![PeerId(10002), PeerId(10003)]
    );

    let text = std::fs::read_to_string(dir.path().join("brush_record.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(doc.get("10001").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn malformed_and_blank_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let scheduler = assemble(
        &config,
        Arc::new(ScriptedCoordinator::empty()),
        Arc::new(RecordingDispatch::new()),
    );

    let input = format!("not json\n\n{HEARTBEAT}\n[1,2]\n");
    let stats = run_intake(input.as_bytes(), scheduler.clone()).await.unwrap();

    assert_eq!(stats.accepted, 1);
    assert_eq!(stats.rejected, 2);
    assert_eq!(
        scheduler.state(),
        peerbrush_scheduler::SchedulerState::Armed(peerbrush_core::BotId(10001))
    );
}

#[tokio::test]
async fn help_line_is_answered_in_its_group() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let dispatch = Arc::new(RecordingDispatch::new());
    let scheduler = assemble(
        &config,
        Arc::new(ScriptedCoordinator::empty()),
        dispatch.clone(),
    );

    run_intake(format!("{HELP}\n").as_bytes(), scheduler).await.unwrap();

    assert!(matches!(
        dispatch.records().as_slice(),
        [DispatchRecord::Reply {
            scope: ReplyScope::Group { group_id: 555 },
            ..
        }]
    ));
}

#[tokio::test]
async fn second_day_start_skips_when_ledger_is_current() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let dispatch = Arc::new(RecordingDispatch::new());
    let coord = Arc::new(ScriptedCoordinator::with_peers([10002]));

    // Two daemon runs on the same day share the ledger file.
    for _ in 0..2 {
        let scheduler = assemble(&config, coord.clone(), dispatch.clone());
        run_intake(format!("{CONNECT}\n").as_bytes(), scheduler)
            .await
            .unwrap();
    }

    assert_eq!(dispatch.message_targets(), vec![PeerId(10002)]);
    assert_eq!(coord.list_count(), 1);
}
