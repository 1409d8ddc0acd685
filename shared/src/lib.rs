pub mod constants;
pub mod profanity;
pub mod rate_limit;
pub mod session;
pub mod slug;
pub mod validation;
pub mod wheel;
pub mod wheel_api;
