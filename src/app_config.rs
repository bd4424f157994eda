use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::file_scan::ExtensionSet;
use crate::file_utils::FileManager;
use crate::languages::Language;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. It is the collaborator that
/// owns the video/subtitle extension sets consumed by the folder scanner.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Extensions treated as video candidates
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Extensions treated as subtitle candidates
    #[serde(default = "default_subtitle_extensions")]
    pub subtitle_extensions: Vec<String>,

    /// Whether scans descend into subdirectories by default
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Preferred subtitle languages, stored as three-letter ids
    #[serde(default)]
    pub preferred_languages: Vec<Language>,

    /// Default language assumed for uploads; empty means unknown
    #[serde(default = "Language::generic_unknown")]
    pub upload_language: Language,

    /// Bytes of subtitle content read for language detection; absent reads whole files
    #[serde(default)]
    pub detect_chunk_size: Option<usize>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the log facade
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_video_extensions() -> Vec<String> {
    [
        "asf", "avi", "divx", "flv", "m2ts", "m4v", "mkv", "mov", "mp4", "mpeg", "mpg", "ogv",
        "rm", "rmvb", "ts", "vob", "webm", "wmv",
    ]
    .iter()
    .map(|e| e.to_string())
    .collect()
}

fn default_subtitle_extensions() -> Vec<String> {
    ["srt", "sub", "txt", "ssa", "smi", "ass", "mpl"]
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize configuration")?;
        FileManager::write_to_file(path, &content)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.video_extensions.is_empty() {
            return Err(anyhow!("At least one video extension is required"));
        }
        if self.subtitle_extensions.is_empty() {
            return Err(anyhow!("At least one subtitle extension is required"));
        }
        Ok(())
    }

    /// The video extension set consumed by the scanner
    pub fn video_extension_set(&self) -> ExtensionSet {
        ExtensionSet::new(&self.video_extensions)
    }

    /// The subtitle extension set consumed by the scanner
    pub fn subtitle_extension_set(&self) -> ExtensionSet {
        ExtensionSet::new(&self.subtitle_extensions)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            video_extensions: default_video_extensions(),
            subtitle_extensions: default_subtitle_extensions(),
            recursive: true,
            preferred_languages: Vec::new(),
            upload_language: Language::generic_unknown(),
            detect_chunk_size: None,
            log_level: LogLevel::default(),
        }
    }
}
