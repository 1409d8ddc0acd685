pub const MAX_SEGMENTS: usize = 100;
pub const MAX_LABEL_LENGTH: usize = 50;
pub const MAX_TEAM_NAME_LENGTH: usize = 50;

// Background sync: drain cadence, retry ceiling, backoff shape.
pub const SYNC_FLUSH_INTERVAL_MS: u32 = 5_000;
pub const SYNC_MAX_ATTEMPTS: u32 = 5;
pub const SYNC_BASE_BACKOFF_MS: u64 = 1_000;
pub const SYNC_MAX_BACKOFF_MS: u64 = 60_000;

pub const NETWORK_ERROR: &str = "Network error. Please try again";
pub const EMPTY_WHEEL_ERROR: &str = "Add at least one name before spinning";
pub const INVALID_NAMES_ERROR: &str = "One or more names are blank or too long";
