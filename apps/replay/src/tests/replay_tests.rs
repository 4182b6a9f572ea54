use super::*;

use client_core::NoopBackend;
use shared::domain::SetupPhase;

const LOG: &str = r#"
# startup
{"event_type": "SetupProgressUpdate", "payload": {"phase": "Core", "is_complete": true, "title": "core"}}
{"event_type": "SetupProgressUpdate", "payload": {"phase": "Node", "is_complete": false, "title": "node"}}
{"event_type": "NewBlockHeight", "payload": {"block_height": 1000}}
{"event_type": "NewBlockHeight", "payload": {"block_height": 998}}
not json at all
{"event_type": "SomeFutureEvent", "payload": {}}
{"event_type": "NewBlockHeight", "payload": {"block_height": 1001}}
"#;

#[test]
fn comments_and_blank_lines_are_skipped() {
    assert!(parse_event_line("").expect("blank").is_none());
    assert!(parse_event_line("   # note").expect("comment").is_none());
    assert!(parse_event_line("{").is_err());

    let event = parse_event_line(r#"{"event_type": "UnlockApp"}"#)
        .expect("parse")
        .expect("event");
    assert_eq!(event.event_type, "UnlockApp");
}

#[tokio::test]
async fn replays_log_into_stores() {
    let stores = AppStores::new();
    let summary = replay(
        LOG.as_bytes(),
        &Settings::default(),
        stores.clone(),
        Arc::new(NoopBackend),
    )
    .await
    .expect("replay");

    assert_eq!(summary.emitted, 6);
    assert_eq!(summary.malformed, 1);
    assert_eq!(summary.dispatch.applied, 4);
    assert_eq!(summary.dispatch.stale, 1);
    assert_eq!(summary.dispatch.unknown, 1);

    assert_eq!(stores.node.get().block_height, Some(1001));
    assert_eq!(stores.setup.get().current_phase(), Some(SetupPhase::Node));
}

#[tokio::test]
async fn custom_channel_name_is_honoured() {
    let settings = Settings {
        channel_name: "mirror_channel".into(),
        ..Settings::default()
    };
    let stores = AppStores::new();
    let summary = replay(
        r#"{"event_type": "NewBlockHeight", "payload": {"block_height": 3}}"#.as_bytes(),
        &settings,
        stores.clone(),
        Arc::new(NoopBackend),
    )
    .await
    .expect("replay");

    assert_eq!(summary.dispatch.applied, 1);
    assert_eq!(stores.node.get().block_height, Some(3));
}
