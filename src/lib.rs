pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod exit;
pub mod packages;
pub mod platform;
pub mod rules;
pub mod scan;
pub mod ui;
