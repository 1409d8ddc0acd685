use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const API_WINDOW: Duration = Duration::from_secs(60);
pub const SHARE_WINDOW: Duration = Duration::from_secs(3600);

pub const API_MAX_REQUESTS: u32 = 3000;
pub const SHARE_MAX_REQUESTS: u32 = 30;

pub const API_RATE_LIMIT_ERROR: &str = "Too Many Requests";
pub const SHARE_RATE_LIMIT_ERROR: &str =
    "Too many share links created. Please try again in an hour.";

#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub enum RateLimitType {
    Api,
    Share,
}

impl RateLimitType {
    pub fn get_window(&self) -> Duration {
        match self {
            Self::Api => API_WINDOW,
            Self::Share => SHARE_WINDOW,
        }
    }

    pub fn get_max_attempts(&self) -> u32 {
        match self {
            Self::Api => API_MAX_REQUESTS,
            Self::Share => SHARE_MAX_REQUESTS,
        }
    }

    pub fn get_error_message(&self) -> &'static str {
        match self {
            Self::Api => API_RATE_LIMIT_ERROR,
            Self::Share => SHARE_RATE_LIMIT_ERROR,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateLimitCheck {
    pub current_attempts: u32,
    pub is_locked: bool,
}

impl RateLimitCheck {
    pub fn new(attempts: u32, limit_type: RateLimitType) -> Self {
        Self {
            current_attempts: attempts,
            is_locked: attempts >= limit_type.get_max_attempts(),
        }
    }
}

pub fn get_rate_limit_key(limit_type: RateLimitType, identifier: &str) -> String {
    format!(
        "rate_limit:{}:{}",
        match limit_type {
            RateLimitType::Api => "api",
            RateLimitType::Share => "share",
        },
        identifier
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_engages_at_ceiling() {
        assert!(!RateLimitCheck::new(SHARE_MAX_REQUESTS - 1, RateLimitType::Share).is_locked);
        assert!(RateLimitCheck::new(SHARE_MAX_REQUESTS, RateLimitType::Share).is_locked);
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(
            get_rate_limit_key(RateLimitType::Api, "203.0.113.9"),
            "rate_limit:api:203.0.113.9"
        );
    }
}
