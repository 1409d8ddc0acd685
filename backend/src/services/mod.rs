pub mod session_service;
pub mod configuration_service;
pub mod spin_service;
