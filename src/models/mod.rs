//! Data models shared by the services and the UI
//!
//! Each model represents the output of a service or API operation.

pub mod history;

// Re-export commonly used types for convenience
pub use history::DailyBar;
