/*!
 * Tests for app configuration
 */

use anyhow::Result;
use log::LevelFilter;

use subscout::app_config::{Config, LogLevel};
use subscout::languages::Language;

use crate::common;

/// Test that default configuration is valid and usable by the scanner
#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert!(config.recursive);
    assert!(config.preferred_languages.is_empty());
    assert!(config.upload_language.is_generic());

    let videos = config.video_extension_set();
    assert!(videos.contains("mkv"));
    assert!(videos.contains("MKV"));
    let subtitles = config.subtitle_extension_set();
    assert!(subtitles.contains("srt"));
    assert!(!subtitles.contains("mkv"));
}

/// Test that an empty extension list fails validation
#[test]
fn test_validate_withEmptyExtensionList_shouldFail() {
    let config = Config {
        video_extensions: Vec::new(),
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        subtitle_extensions: Vec::new(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test that configuration round-trips through its JSON file format
#[test]
fn test_config_saveAndLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.preferred_languages = vec![
        Language::from_iso639("fr"),
        Language::from_iso639("en"),
    ];
    config.upload_language = Language::from_language_id("swe");
    config.recursive = false;
    config.detect_chunk_size = Some(4096);

    config.save(&config_path)?;
    let loaded = Config::from_file(&config_path)?;

    assert_eq!(loaded.preferred_languages, config.preferred_languages);
    assert_eq!(loaded.upload_language.language_id(), "swe");
    assert!(!loaded.recursive);
    assert_eq!(loaded.detect_chunk_size, Some(4096));
    assert_eq!(loaded.video_extensions, config.video_extensions);

    Ok(())
}

/// Test that missing fields fall back to defaults when parsing
#[test]
fn test_config_fromPartialJson_shouldApplyDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "partial.json",
        r#"{ "recursive": false }"#,
    )?;

    let config = Config::from_file(&config_path)?;

    assert!(!config.recursive);
    assert!(config.video_extension_set().contains("mkv"));
    assert!(config.subtitle_extension_set().contains("srt"));
    assert_eq!(config.log_level, LogLevel::Info);

    Ok(())
}

/// Test the log level to filter mapping
#[test]
fn test_log_level_filterMapping_shouldMatch() {
    assert_eq!(LogLevel::Error.level_filter(), LevelFilter::Error);
    assert_eq!(LogLevel::Warn.level_filter(), LevelFilter::Warn);
    assert_eq!(LogLevel::Info.level_filter(), LevelFilter::Info);
    assert_eq!(LogLevel::Debug.level_filter(), LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.level_filter(), LevelFilter::Trace);
}
