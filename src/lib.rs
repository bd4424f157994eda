/*!
 * # subscout
 *
 * A Rust library that builds a local inventory of video and subtitle files
 * and enriches it with language metadata, ready to be matched against a
 * remote subtitle catalog.
 *
 * ## Features
 *
 * - Recursive or single-level folder scanning with deterministic order
 * - Video classification through a best-effort metadata probe chain
 *   (ffprobe, mediainfo, or a no-op fallback selected at startup)
 * - Static language catalog with locale / ISO-639 / three-letter id /
 *   display-name resolution
 * - Optional content-based language detection for subtitle files
 * - IMDb id auto-detection from NFO sidecar files
 * - Progress reporting through a caller-owned sink
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `languages`: Language catalog and resolver
 * - `metadata`: Video metadata probe chain
 * - `file_scan`: Folder scanning and classification
 * - `progress`: Progress reporter contract and console implementation
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_scan;
pub mod file_utils;
pub mod languages;
pub mod metadata;
pub mod progress;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, LanguageError, ScanError};
pub use file_scan::{
    ExtensionSet, ScanOptions, ScanResult, SubtitleFile, VideoFile, auto_detect_nfo, scan_folder,
    scan_subtitles_folder,
};
pub use languages::{Language, LookupSystems, all_languages, legal_languages};
pub use metadata::{MetadataProbe, VideoMetadata, VideoMetadataTrack};
pub use progress::{ConsoleProgress, NullProgress, ProgressReporter};
