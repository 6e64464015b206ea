//! Burner configuration.
//!
//! This module provides:
//! - TOML-based configuration with one table per concern
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed table is rewritten)
//!
//! # Example
//!
//! ```no_run
//! use subburn_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/subburn.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Grid: {}x{}", config.settings().grid.rows, config.settings().grid.cols);
//!
//! config.settings_mut().style.main_font_size = 56;
//! config.update_section(ConfigSection::Style).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{BurnSettings, ConfigSection, LoggingSettings, ResourceSettings, Settings};
