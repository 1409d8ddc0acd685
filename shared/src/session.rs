use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::constants::{SYNC_BASE_BACKOFF_MS, SYNC_MAX_BACKOFF_MS};

/// How the current name list reached the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMethod {
    Typed,
    Pasted,
    SharedLink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Desktop,
    Mobile,
    Unknown,
}

impl InputMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typed => "typed",
            Self::Pasted => "pasted",
            Self::SharedLink => "shared_link",
        }
    }
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
            Self::Unknown => "unknown",
        }
    }
}

/// How a winner announcement was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckMethod {
    Click,
    Auto,
}

impl AckMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Auto => "auto",
        }
    }
}

/// One entry in the local-first session history. Everything the UI does is
/// recorded here first; mirroring to the remote store is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    ConfigSaved {
        configuration_id: Uuid,
        names: Vec<String>,
        segment_count: usize,
        timestamp_ms: u64,
    },
    Spin {
        spin_id: Uuid,
        configuration_id: Option<Uuid>,
        winner_label: String,
        is_respin: bool,
        power: f64,
        timestamp_ms: u64,
    },
    Acknowledged {
        spin_id: Uuid,
        method: AckMethod,
        timestamp_ms: u64,
    },
}

/// Append-only event history keyed by a locally generated session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    pub session_id: Uuid,
    pub events: Vec<SessionEvent>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn spin_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Spin { .. }))
            .count()
    }

    pub fn last_spin(&self) -> Option<&SessionEvent> {
        self.events
            .iter()
            .rev()
            .find(|e| matches!(e, SessionEvent::Spin { .. }))
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Delay before retry number `attempt` (1-based) of a failed sync push.
/// Doubles per attempt and is capped; the queue drops the operation once
/// [`crate::constants::SYNC_MAX_ATTEMPTS`] is reached.
pub fn sync_backoff_ms(attempt: u32) -> u64 {
    let shift = attempt.saturating_sub(1).min(16);
    (SYNC_BASE_BACKOFF_MS << shift).min(SYNC_MAX_BACKOFF_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SYNC_MAX_ATTEMPTS;

    #[test]
    fn log_appends_in_order() {
        let mut log = SessionLog::new();
        log.record(SessionEvent::ConfigSaved {
            configuration_id: Uuid::new_v4(),
            names: vec!["A".to_string(), "B".to_string()],
            segment_count: 2,
            timestamp_ms: 1,
        });
        let spin_id = Uuid::new_v4();
        log.record(SessionEvent::Spin {
            spin_id,
            configuration_id: None,
            winner_label: "B".to_string(),
            is_respin: false,
            power: 0.5,
            timestamp_ms: 2,
        });
        log.record(SessionEvent::Acknowledged {
            spin_id,
            method: AckMethod::Click,
            timestamp_ms: 3,
        });

        assert_eq!(log.events.len(), 3);
        assert_eq!(log.spin_count(), 1);
        assert!(matches!(log.last_spin(), Some(SessionEvent::Spin { .. })));
    }

    #[test]
    fn events_round_trip_as_tagged_json() {
        let event = SessionEvent::Spin {
            spin_id: Uuid::new_v4(),
            configuration_id: None,
            winner_label: "RESPIN".to_string(),
            is_respin: true,
            power: 1.0,
            timestamp_ms: 42,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"spin\""));
        assert_eq!(serde_json::from_str::<SessionEvent>(&json).unwrap(), event);
    }

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(sync_backoff_ms(1), SYNC_BASE_BACKOFF_MS);
        assert_eq!(sync_backoff_ms(2), SYNC_BASE_BACKOFF_MS * 2);
        assert_eq!(sync_backoff_ms(3), SYNC_BASE_BACKOFF_MS * 4);
        assert_eq!(sync_backoff_ms(60), SYNC_MAX_BACKOFF_MS);
        // Every retry the queue will actually schedule stays under the cap.
        for attempt in 1..=SYNC_MAX_ATTEMPTS {
            assert!(sync_backoff_ms(attempt) <= SYNC_MAX_BACKOFF_MS);
        }
    }
}
