pub mod catalog;
pub mod client;
pub mod config;
pub mod de;
pub mod rating;
pub mod records;
pub mod report;
pub mod select;
pub mod video;

/// Application name for XDG paths
pub const APP_NAME: &str = "chunireport";
