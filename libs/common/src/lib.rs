//! Common utilities for PanelMap tools
//!
//! - `config`: layered configuration (defaults, file, `PANELMAP_*` env)
//! - `logging`: tracing subscriber setup (console and optional daily file)

pub mod config;
pub mod error;
pub mod logging;

pub use config::{load_config, AppConfig, DatabaseConfig, LoggingConfig};
pub use error::{Error, Result};
