pub mod analyzer;
pub mod cli;
pub mod commands;
pub mod config;
pub mod converters;
pub mod error;
pub mod loader;
pub mod models;
pub mod pending;
pub mod simulation;
pub mod telemetry;
pub mod variable;
pub mod warnings;

pub use error::{ConvertError, Result};
