pub mod grouping_service;
pub mod projection_service;
pub mod session_service;
