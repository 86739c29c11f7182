pub mod expansion;
pub mod group;
pub mod holding;
pub mod render;
pub mod session;
pub mod settings;
pub mod table;
