pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod generator;
pub mod telemetry;
pub mod workforce;
