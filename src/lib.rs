pub mod calendar;
pub mod config;
pub mod error;
pub mod extract;
