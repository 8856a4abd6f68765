pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Widget logic behind ports, and the adapters that back them
pub mod app;
pub mod infra;
