use shared::session::{SessionEvent, SessionLog};
use uuid::Uuid;
use web_sys::Storage;

const SESSION_LOG_KEY: &str = "wheel_session_log";
const NAMES_KEY: &str = "wheel_names";
const CONFIGURATION_ID_KEY: &str = "wheel_configuration_id";

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Loads the session log, creating and persisting a fresh one on first visit.
pub fn load_session_log() -> SessionLog {
    let existing = local_storage()
        .and_then(|s| s.get_item(SESSION_LOG_KEY).ok().flatten())
        .and_then(|json| serde_json::from_str(&json).ok());

    match existing {
        Some(session_log) => session_log,
        None => {
            let session_log = SessionLog::new();
            save_session_log(&session_log);
            session_log
        }
    }
}

fn save_session_log(session_log: &SessionLog) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(session_log) {
        Ok(json) => {
            if storage.set_item(SESSION_LOG_KEY, &json).is_err() {
                log::warn!("Failed to persist session log");
            }
        }
        Err(e) => log::warn!("Failed to serialize session log: {}", e),
    }
}

pub fn session_id() -> Uuid {
    load_session_log().session_id
}

/// Appends an event to the persisted log and returns the updated log.
pub fn record_event(event: SessionEvent) -> SessionLog {
    let mut session_log = load_session_log();
    session_log.record(event);
    save_session_log(&session_log);
    session_log
}

pub fn save_names(names: &[String]) {
    let Some(storage) = local_storage() else {
        return;
    };
    match serde_json::to_string(names) {
        Ok(json) => {
            if storage.set_item(NAMES_KEY, &json).is_err() {
                log::warn!("Failed to persist name list");
            }
        }
        Err(e) => log::warn!("Failed to serialize name list: {}", e),
    }
}

pub fn load_names() -> Option<Vec<String>> {
    local_storage()
        .and_then(|s| s.get_item(NAMES_KEY).ok().flatten())
        .and_then(|json| serde_json::from_str(&json).ok())
}

pub fn save_configuration_id(configuration_id: Uuid) {
    if let Some(storage) = local_storage() {
        if storage
            .set_item(CONFIGURATION_ID_KEY, &configuration_id.to_string())
            .is_err()
        {
            log::warn!("Failed to persist configuration id");
        }
    }
}

pub fn load_configuration_id() -> Option<Uuid> {
    local_storage()
        .and_then(|s| s.get_item(CONFIGURATION_ID_KEY).ok().flatten())
        .and_then(|raw| raw.parse().ok())
}
