//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compose::{BurnOptions, GridSpec};
use crate::logging::{LogConfig, LogLevel};
use crate::models::TextStyle;
use crate::split::SplitOptions;
use crate::video::{EncoderSettings, FfmpegTools};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Default style for tracks that do not carry their own.
    #[serde(default)]
    pub style: TextStyle,

    /// Slot grid laid over each frame.
    #[serde(default)]
    pub grid: GridSpec,

    /// Auto-split tunables.
    #[serde(default)]
    pub split: SplitOptions,

    /// Fonts, icon and external tools.
    #[serde(default)]
    pub resources: ResourceSettings,

    /// Output encoding.
    #[serde(default)]
    pub encoder: EncoderSettings,

    /// Burn loop options.
    #[serde(default)]
    pub burn: BurnSettings,
}

impl Settings {
    /// Burn loop options assembled from the `[burn]` and `[split]` sections.
    pub fn burn_options(&self) -> BurnOptions {
        BurnOptions {
            fps_override: (self.burn.fps_override > 0.0).then_some(self.burn.fps_override),
            progress_step: self.burn.progress_step,
            split: self.split.clone(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact job logs.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Job log progress step percentage.
    #[serde(default = "default_log_progress_step")]
    pub progress_step: u32,

    /// Number of recent lines shown after a failure.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Directory for job logs.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_true() -> bool {
    true
}

fn default_log_progress_step() -> u32 {
    20
}

fn default_error_tail() -> u32 {
    20
}

fn default_logs_folder() -> String {
    "logs".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            compact: true,
            progress_step: default_log_progress_step(),
            error_tail: default_error_tail(),
            show_timestamps: true,
            logs_folder: default_logs_folder(),
        }
    }
}

impl LoggingSettings {
    /// Job logger configuration for these settings.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            compact: self.compact,
            progress_step: self.progress_step,
            error_tail: self.error_tail as usize,
            show_timestamps: self.show_timestamps,
        }
    }
}

/// Fonts, icon and tool locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSettings {
    /// Font files in fallback order. The built-in face is used when none load.
    #[serde(default)]
    pub font_paths: Vec<String>,

    /// Speaker icon image (empty for none).
    #[serde(default)]
    pub icon_path: String,

    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ResourceSettings {
    fn default() -> Self {
        Self {
            font_paths: Vec::new(),
            icon_path: String::new(),
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

impl ResourceSettings {
    pub fn tools(&self) -> FfmpegTools {
        FfmpegTools {
            ffmpeg: PathBuf::from(&self.ffmpeg),
            ffprobe: PathBuf::from(&self.ffprobe),
        }
    }

    pub fn icon(&self) -> Option<PathBuf> {
        let trimmed = self.icon_path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    pub fn fonts(&self) -> Vec<PathBuf> {
        self.font_paths.iter().map(PathBuf::from).collect()
    }
}

/// Burn loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnSettings {
    /// Frame rate used for timing; 0 uses the source's rate.
    #[serde(default)]
    pub fps_override: f64,

    /// Progress callback step percentage.
    #[serde(default = "default_burn_progress_step")]
    pub progress_step: u32,
}

fn default_burn_progress_step() -> u32 {
    2
}

impl Default for BurnSettings {
    fn default() -> Self {
        Self {
            fps_override: 0.0,
            progress_step: default_burn_progress_step(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Logging,
    Style,
    Grid,
    Split,
    Resources,
    Encoder,
    Burn,
}

impl ConfigSection {
    /// Every section, in file order.
    pub const ALL: [ConfigSection; 7] = [
        ConfigSection::Logging,
        ConfigSection::Style,
        ConfigSection::Grid,
        ConfigSection::Split,
        ConfigSection::Resources,
        ConfigSection::Encoder,
        ConfigSection::Burn,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Logging => "logging",
            ConfigSection::Style => "style",
            ConfigSection::Grid => "grid",
            ConfigSection::Split => "split",
            ConfigSection::Resources => "resources",
            ConfigSection::Encoder => "encoder",
            ConfigSection::Burn => "burn",
        }
    }

    /// Comment written above the section.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Logging => "Logging configuration",
            ConfigSection::Style => "Default subtitle style",
            ConfigSection::Grid => "Slot grid along the bottom of the frame",
            ConfigSection::Split => "Splitting of segments wider than their slot",
            ConfigSection::Resources => "Fonts, speaker icon and ffmpeg tools",
            ConfigSection::Encoder => "Output encoding",
            ConfigSection::Burn => "Burn loop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let toml = toml::to_string_pretty(&Settings::default()).unwrap();
        for section in ConfigSection::ALL {
            assert!(toml.contains(&format!("[{}]", section.table_name())));
        }
        assert!(toml.contains("main_font_size = 48"));
        assert!(toml.contains("text_color = \"#ffffff\""));
    }

    #[test]
    fn settings_round_trip() {
        let mut settings = Settings::default();
        settings.resources.font_paths = vec!["/fonts/NotoSansJP.otf".to_string()];
        settings.grid.cols = 3;
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.resources.font_paths, settings.resources.font_paths);
        assert_eq!(parsed.grid.cols, 3);
        assert_eq!(parsed.style.stroke_color, settings.style.stroke_color);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[style]\nmain_font_size = 60\n\n[grid]\nrows = 1\n";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.style.main_font_size, 60);
        assert_eq!(parsed.style.ruby_font_size, 24);
        assert_eq!(parsed.grid.rows, 1);
        assert_eq!(parsed.grid.cols, 2);
        assert_eq!(parsed.burn.progress_step, 2);
        assert!(parsed.split.enabled);
    }

    #[test]
    fn burn_options_from_sections() {
        let mut settings = Settings::default();
        assert_eq!(settings.burn_options().fps_override, None);

        settings.burn.fps_override = 23.976;
        settings.split.width_tolerance = 1.0;
        let opts = settings.burn_options();
        assert_eq!(opts.fps_override, Some(23.976));
        assert_eq!(opts.split.width_tolerance, 1.0);
    }

    #[test]
    fn resources_resolve_paths() {
        let mut res = ResourceSettings::default();
        assert_eq!(res.icon(), None);
        res.icon_path = "  icons/speaker.png ".to_string();
        assert_eq!(res.icon(), Some(PathBuf::from("icons/speaker.png")));
        assert_eq!(res.tools().ffprobe, PathBuf::from("ffprobe"));
    }

    #[test]
    fn log_level_is_lowercase_in_toml() {
        let parsed: Settings = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(parsed.logging.level, LogLevel::Debug);
        assert_eq!(parsed.logging.to_log_config().level, LogLevel::Debug);
    }
}
