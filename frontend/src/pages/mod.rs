pub mod picker;
pub mod shared_config;
