// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use subscout::app_config::{Config, LogLevel};
use subscout::errors::LanguageError;
use subscout::file_scan::{self, ScanOptions};
use subscout::languages::{self, Language};
use subscout::metadata;
use subscout::progress::ConsoleProgress;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan a folder for video and subtitle files (default command)
    Scan(ScanArgs),

    /// List the supported languages
    Languages,

    /// Detect the language of a subtitle file from its content
    Detect {
        /// Subtitle file to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Read at most this many bytes of content
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Look for an IMDb title id in NFO sidecar files
    Nfo {
        /// Directory containing the video and its sidecar files
        #[arg(value_name = "DIRECTORY")]
        directory: PathBuf,
    },

    /// Generate shell completions for subscout
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Folder to scan for video and subtitle files
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Only scan the top level of the folder
    #[arg(short = '1', long)]
    single_level: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subscout - local video and subtitle inventory scanner
///
/// Scans folders for playable videos and subtitle files, classifies them with
/// a metadata probe chain, and enriches subtitles with language metadata.
#[derive(Parser, Debug)]
#[command(name = "subscout")]
#[command(version = "0.1.0")]
#[command(about = "Local video and subtitle inventory scanner")]
#[command(long_about = "subscout builds a local inventory of video and subtitle files and
classifies them with language metadata.

EXAMPLES:
    subscout /movies                      # Scan a folder recursively
    subscout scan -1 /movies              # Scan only the top level
    subscout languages                    # List supported languages
    subscout detect episode.srt           # Guess the language of a subtitle
    subscout nfo /movies/Inception        # Read the IMDb id from NFO sidecars
    subscout completions bash             # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config-path. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Folder to scan for video and subtitle files
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Only scan the top level of the folder
    #[arg(short = '1', long)]
    single_level: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    /// Create a new logger with the specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    /// Initialize the global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    /// ANSI color for a log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[0m",
            Level::Debug => "\x1B[1;34m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());
            eprintln!(
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subscout", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Scan(args)) => run_scan(args),
        Some(Commands::Languages) => run_languages(),
        Some(Commands::Detect { file, chunk_size }) => run_detect(&file, chunk_size),
        Some(Commands::Nfo { directory }) => run_nfo(&directory),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            run_scan(ScanArgs {
                input_path,
                single_level: cli.single_level,
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
        }
    }
}

/// Load the configuration, creating a default file when none exists
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::from_file(config_path)
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .save(config_path)
            .context("Failed to write default config file")?;
        Ok(config)
    }
}

fn run_scan(args: ScanArgs) -> Result<()> {
    let config = load_or_create_config(&args.config_path)?;

    // A log level from the command line wins over the configured one
    let log_level = args
        .log_level
        .map(LogLevel::from)
        .unwrap_or_else(|| config.log_level.clone());
    log::set_max_level(log_level.level_filter());

    let recursive = !args.single_level && config.recursive;
    let video_extensions = config.video_extension_set();
    let subtitle_extensions = config.subtitle_extension_set();
    let options = ScanOptions::new(&video_extensions, &subtitle_extensions, recursive);

    info!("Using {} metadata backend", metadata::active_backend());
    let probe = metadata::default_probe();
    let mut reporter = ConsoleProgress::new();

    let result = file_scan::scan_folder(&args.input_path, &options, probe, &mut reporter)?;

    info!(
        "Found {} video file(s) and {} subtitle file(s)",
        result.videos.len(),
        result.subtitles.len()
    );

    if let Some(imdb_id) = file_scan::auto_detect_nfo(&args.input_path) {
        info!("IMDb id from NFO sidecar: tt{}", imdb_id);
    }

    for video in &result.videos {
        println!("video: {} ({} bytes)", video.path().display(), video.size());
        if let Some(probed) = video.metadata() {
            for track in probed.tracks() {
                println!(
                    "    track: {:.3} s at {:.3} fps",
                    track.duration_ms as f64 / 1000.0,
                    track.framerate
                );
            }
        }
    }

    for subtitle in &result.subtitles {
        let Some(path) = subtitle.path() else { continue };
        let language = if Language::can_detect_from_file() {
            Language::from_file(path, config.detect_chunk_size)
                .unwrap_or_else(|_| Language::generic_unknown())
        } else {
            Language::generic_unknown()
        };
        println!("subtitle: {} [{}]", path.display(), language.name());
    }

    Ok(())
}

fn run_languages() -> Result<()> {
    for language in languages::all_languages() {
        println!(
            "{:8} {:8} {}",
            language.language_id(),
            language.iso639(),
            language.generic_name()
        );
    }
    if !Language::can_detect_from_file() {
        info!("Content-based language detection is not available in this build");
    }
    Ok(())
}

fn run_detect(file: &Path, chunk_size: Option<usize>) -> Result<()> {
    match Language::from_file(file, chunk_size) {
        Ok(language) => {
            println!("{} ({})", language.name(), language.language_id());
            Ok(())
        }
        Err(LanguageError::DetectionUnsupported(reason)) => {
            // Degrade visibly instead of surfacing a generic failure
            warn!("Language detection is unavailable: {}", reason);
            Ok(())
        }
        Err(LanguageError::NotALanguage(value)) => {
            println!("{} ({})", Language::generic_unknown().name(), value);
            Ok(())
        }
    }
}

fn run_nfo(directory: &Path) -> Result<()> {
    match file_scan::auto_detect_nfo(directory) {
        Some(imdb_id) => println!("tt{}", imdb_id),
        None => println!("no IMDb id found"),
    }
    Ok(())
}
