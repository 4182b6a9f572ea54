//! Log-volume control for noisy diagnostic events.

use std::collections::HashMap;

use serde_json::Value;
use shared::protocol::EventTag;

/// Event types that are logged only when their payload changes.
pub const DIAGNOSTIC_TAGS: [EventTag; 3] = [
    EventTag::WalletAddressUpdate,
    EventTag::CriticalProblem,
    EventTag::MissingApplications,
];

pub fn payloads_equal(a: &Value, b: &Value) -> bool {
    a == b
}

/// Last payload seen per diagnostic tag, scoped to one dispatcher.
#[derive(Debug, Default)]
pub struct DiagnosticDedup {
    last_seen: HashMap<EventTag, Value>,
}

impl DiagnosticDedup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tracks(tag: EventTag) -> bool {
        DIAGNOSTIC_TAGS.contains(&tag)
    }

    /// Returns `true` when `payload` should be logged.
    pub fn observe(&mut self, tag: EventTag, payload: &Value) -> bool {
        if !Self::tracks(tag) {
            return false;
        }
        if let Some(previous) = self.last_seen.get(&tag) {
            if payloads_equal(previous, payload) {
                return false;
            }
        }
        self.last_seen.insert(tag, payload.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deep_equality_ignores_key_order() {
        let a = json!({"title": "x", "nested": {"a": 1, "b": [1, 2]}});
        let b = json!({"nested": {"b": [1, 2], "a": 1}, "title": "x"});
        assert!(payloads_equal(&a, &b));
        assert!(!payloads_equal(&a, &json!({"title": "x"})));
    }

    #[test]
    fn repeated_payload_is_logged_once() {
        let mut dedup = DiagnosticDedup::new();
        let payload = json!({"title": "disk", "description": "full"});

        assert!(dedup.observe(EventTag::CriticalProblem, &payload));
        assert!(!dedup.observe(EventTag::CriticalProblem, &payload));
        assert!(dedup.observe(EventTag::CriticalProblem, &json!({"title": "gpu"})));
        assert!(dedup.observe(EventTag::CriticalProblem, &payload));
    }

    #[test]
    fn tags_are_tracked_independently() {
        let mut dedup = DiagnosticDedup::new();
        let payload = json!(["xmrig"]);
        assert!(dedup.observe(EventTag::MissingApplications, &payload));
        assert!(dedup.observe(EventTag::WalletAddressUpdate, &payload));
        assert!(!dedup.observe(EventTag::MissingApplications, &payload));
    }

    #[test]
    fn untracked_tags_are_never_logged() {
        let mut dedup = DiagnosticDedup::new();
        assert!(!dedup.observe(EventTag::NewBlockHeight, &json!({"block_height": 1})));
    }
}
