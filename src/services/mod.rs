//! Business logic kept separate from the user interface

pub mod chart_service;
pub mod csv_service;
pub mod download_service;
