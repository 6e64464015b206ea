//! Config manager for loading, saving, and atomic updates.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Section-level updates (only the modified table is rewritten)
//! - Missing keys are filled with defaults on load

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loads, saves and updates the burner's TOML settings file.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for `config_path`.
    ///
    /// Does not load the config; call `load()` or `load_or_create()` after.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings. Changes stay in memory until `save()` or
    /// `update_section()`.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load config from file. Returns `NotFound` if the file doesn't exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        tracing::debug!("[Config] Loaded {}", self.config_path.display());
        Ok(())
    }

    /// Load config from file, creating it with defaults if it doesn't exist.
    ///
    /// An existing file with unknown tables or missing keys is rewritten in
    /// full.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let (settings, was_modified) = self.parse_and_check(&content)?;
            self.settings = settings;

            if was_modified {
                tracing::info!(
                    "[Config] Normalizing {} (unknown or missing keys)",
                    self.config_path.display()
                );
                self.save()?;
            }
        } else {
            tracing::info!(
                "[Config] Creating default config at {}",
                self.config_path.display()
            );
            self.settings = Settings::default();
            self.save()?;
        }
        Ok(())
    }

    /// Directory for job logs, created if missing.
    pub fn ensure_logs_folder(&self) -> ConfigResult<PathBuf> {
        let dir = PathBuf::from(&self.settings.logging.logs_folder);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Parse content and report whether it differs from its normalized form.
    fn parse_and_check(&self, content: &str) -> ConfigResult<(Settings, bool)> {
        let doc: DocumentMut = content.parse()?;
        let settings: Settings = toml::from_str(content)?;

        let has_unknown = doc
            .iter()
            .any(|(key, _)| !ConfigSection::ALL.iter().any(|s| s.table_name() == key));

        let missing = ConfigSection::ALL.iter().any(|section| {
            let Some(table) = doc.get(section.table_name()).and_then(Item::as_table) else {
                return true;
            };
            match self.section_keys(*section) {
                Ok(keys) => keys.iter().any(|k| !table.contains_key(k)),
                Err(_) => true,
            }
        });

        Ok((settings, has_unknown || missing))
    }

    /// Keys the serialized form of `section` contains.
    fn section_keys(&self, section: ConfigSection) -> ConfigResult<Vec<String>> {
        let doc: DocumentMut = self.section_toml(section)?.parse()?;
        Ok(doc.iter().map(|(k, _)| k.to_string()).collect())
    }

    fn section_toml(&self, section: ConfigSection) -> ConfigResult<String> {
        let s = &self.settings;
        let content = match section {
            ConfigSection::Logging => toml::to_string_pretty(&s.logging)?,
            ConfigSection::Style => toml::to_string_pretty(&s.style)?,
            ConfigSection::Grid => toml::to_string_pretty(&s.grid)?,
            ConfigSection::Split => toml::to_string_pretty(&s.split)?,
            ConfigSection::Resources => toml::to_string_pretty(&s.resources)?,
            ConfigSection::Encoder => toml::to_string_pretty(&s.encoder)?,
            ConfigSection::Burn => toml::to_string_pretty(&s.burn)?,
        };
        Ok(content)
    }

    /// Save the entire config atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.generate_config_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Rewrite one section atomically.
    ///
    /// Re-reads the file from disk and replaces only the given table, so
    /// other sections (and their comments) are left as they are on disk.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let current_content = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = if current_content.is_empty() {
            DocumentMut::new()
        } else {
            current_content.parse()?
        };

        let section_doc: DocumentMut = self.section_toml(section)?.parse()?;
        let section_table = section_doc.as_table().clone();
        doc[section.table_name()] = Item::Table(section_table);

        self.atomic_write(&doc.to_string())?;
        tracing::debug!("[Config] Updated [{}]", section.table_name());
        Ok(())
    }

    fn generate_config_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();

        output.push_str("# Ruby subtitle burner configuration\n");
        output.push_str(
            "# This file is auto-generated. Comments may be preserved on section updates.\n",
        );

        for section in ConfigSection::ALL {
            output.push('\n');
            output.push_str(&format!("# {}\n", section.description()));
            output.push_str(&format!("[{}]\n", section.table_name()));
            for line in self.section_toml(section)?.lines() {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }

    /// Write to a temp file in the same directory, then rename over the
    /// config file.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.config_path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.config_path)?;
        Ok(())
    }
}
