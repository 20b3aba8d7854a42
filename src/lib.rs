pub mod api;
pub mod config;
pub mod diff;
pub mod error;
pub mod explain;
pub mod records;
pub mod scoring;
pub mod values;
