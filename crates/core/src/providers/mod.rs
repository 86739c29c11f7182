pub mod traits;

// Source implementations
pub mod http;
pub mod static_source;
