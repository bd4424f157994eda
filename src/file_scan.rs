/*!
 * Folder scanning and video/subtitle classification.
 *
 * A scan walks a directory tree, partitions files into video and subtitle
 * candidates by extension, and promotes a video candidate to a [`VideoFile`]
 * only when the metadata probe confirms at least one playable video track.
 * Candidates failing that gate are dropped silently: a video-extension file
 * that is not actually playable is an expected, non-exceptional case.
 *
 * Each scan invocation runs synchronously on the calling thread, owns its own
 * accumulators, and drives the caller-supplied [`ProgressReporter`] through a
 * fixed cadence: a reset to zero, one update per probed candidate over the
 * 0..=100 range, a reset between the video and subtitle phases, and exactly
 * one terminal `finish`.
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::errors::ScanError;
use crate::metadata::{self, MetadataProbe, VideoMetadata};
use crate::progress::ProgressReporter;

/// Case-insensitive extension membership set.
///
/// The scanner never defines which extensions count as video or subtitle
/// material; it only tests membership against sets supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtensionSet {
    extensions: Vec<String>,
}

impl ExtensionSet {
    /// Build a set from extension strings, with or without a leading dot
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
            .collect();
        Self { extensions }
    }

    /// Case-insensitive membership test
    pub fn contains(&self, extension: &str) -> bool {
        let folded = extension.trim_start_matches('.').to_lowercase();
        self.extensions.iter().any(|e| *e == folded)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }
}

/// A file that probed as a playable video
#[derive(Debug, Clone)]
pub struct VideoFile {
    path: PathBuf,
    size: u64,
    extension: String,
    metadata: Option<VideoMetadata>,
}

impl VideoFile {
    /// Build a video file entry, reading its size from the filesystem
    pub fn new(path: &Path, metadata: Option<VideoMetadata>) -> Result<Self> {
        let size = fs::metadata(path)
            .with_context(|| format!("Failed to stat video file: {:?}", path))?
            .len();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            size,
            extension,
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes, as passed to the remote matching collaborator
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lower-cased file extension without the dot
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Probed track metadata, when a probe backend produced any
    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }
}

/// A subtitle either present on disk or known only by a remote catalog id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleFile {
    /// A subtitle file found by a local scan
    Local { path: PathBuf },
    /// A subtitle offered by the remote catalog
    Remote { id: String },
}

impl SubtitleFile {
    pub fn local(path: PathBuf) -> Self {
        SubtitleFile::Local { path }
    }

    pub fn remote(id: String) -> Self {
        SubtitleFile::Remote { id }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, SubtitleFile::Remote { .. })
    }

    /// Local path, when this subtitle exists on disk
    pub fn path(&self) -> Option<&Path> {
        match self {
            SubtitleFile::Local { path } => Some(path),
            SubtitleFile::Remote { .. } => None,
        }
    }
}

/// Result of a folder scan, in traversal order
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub videos: Vec<VideoFile>,
    pub subtitles: Vec<SubtitleFile>,
}

/// Per-scan inputs. Extension sets are owned by the caller; the recursion
/// flags for the video and subtitle phases are independent, though callers
/// typically set both equal.
#[derive(Debug, Clone)]
pub struct ScanOptions<'a> {
    pub video_extensions: &'a ExtensionSet,
    pub subtitle_extensions: &'a ExtensionSet,
    pub recursive_videos: bool,
    pub recursive_subtitles: bool,
}

impl<'a> ScanOptions<'a> {
    /// Options with a single recursion flag for both phases
    pub fn new(
        video_extensions: &'a ExtensionSet,
        subtitle_extensions: &'a ExtensionSet,
        recursive: bool,
    ) -> Self {
        Self {
            video_extensions,
            subtitle_extensions,
            recursive_videos: recursive,
            recursive_subtitles: recursive,
        }
    }
}

/// Scan a folder for video and subtitle files.
///
/// Fails only on invalid-argument class errors, and only before any reporter
/// activity. Per-file I/O issues are logged at debug level and skipped.
pub fn scan_folder(
    root: &Path,
    options: &ScanOptions<'_>,
    probe: &dyn MetadataProbe,
    reporter: &mut dyn ProgressReporter,
) -> Result<ScanResult, ScanError> {
    debug!(
        "scan_folder(root={:?}, recursive_videos={}, recursive_subtitles={})",
        root, options.recursive_videos, options.recursive_subtitles
    );
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let candidates = list_files(root, options.video_extensions, options.recursive_videos);

    reporter.set_range(0, 100);
    reporter.update(0);

    let mut videos = Vec::new();
    let total = candidates.len();
    for (index, path) in candidates.iter().enumerate() {
        debug!("Probing {:?} ...", path);
        let probed = metadata::parse(probe, path);
        if probed.has_video() {
            match VideoFile::new(path, Some(probed)) {
                Ok(video) => videos.push(video),
                Err(e) => debug!("Skipping {:?}: {}", path, e),
            }
        } else {
            debug!("Skipping {:?}: no video tracks", path);
        }
        reporter.update(((index + 1) * 100 / total) as i64);
    }

    // Reset before the subtitle phase.
    reporter.update(0);

    let found = list_files(root, options.subtitle_extensions, options.recursive_subtitles);
    let mut subtitles = Vec::new();
    if !found.is_empty() {
        reporter.set_range(0, found.len() as i64);
        for (index, path) in found.into_iter().enumerate() {
            subtitles.push(SubtitleFile::local(path));
            reporter.update(index as i64);
        }
    }
    reporter.finish();

    Ok(ScanResult { videos, subtitles })
}

/// Scan a folder for subtitle files only.
///
/// Same traversal and reporter rules as the subtitle phase of [`scan_folder`].
pub fn scan_subtitles_folder(
    root: &Path,
    extensions: &ExtensionSet,
    recursive: bool,
    reporter: &mut dyn ProgressReporter,
) -> Result<Vec<SubtitleFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    reporter.update(0);
    let found = list_files(root, extensions, recursive);
    reporter.set_range(0, found.len() as i64);

    let mut subtitles = Vec::new();
    for (index, path) in found.into_iter().enumerate() {
        subtitles.push(SubtitleFile::local(path));
        reporter.update(index as i64);
    }
    reporter.finish();

    Ok(subtitles)
}

/// List files under `root` whose extension is in `extensions`.
///
/// Enumeration order is deterministic for a fixed filesystem state: entries
/// are visited in file-name order. Unreadable entries are skipped.
fn list_files(root: &Path, extensions: &ExtensionSet, recursive: bool) -> Vec<PathBuf> {
    let mut walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(extension) = entry.path().extension() else {
            continue;
        };
        if extensions.contains(&extension.to_string_lossy()) {
            files.push(entry.into_path());
        }
    }
    files
}

static IMDB_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"imdb\.\w+/title/tt(\d+)").expect("valid imdb regex"));

/// Look for an IMDb title id in an NFO sidecar file.
///
/// Scans the directory for `.nfo` files in name order and returns the first
/// IMDb id found in their lower-cased content. Used to pre-seed a movie
/// identity without contacting the remote service; absence of a match is not
/// an error.
pub fn auto_detect_nfo(directory: &Path) -> Option<String> {
    if !directory.is_dir() {
        return None;
    }

    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("Cannot read directory {:?}: {}", directory, e);
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("nfo"))
        })
        .collect();
    candidates.sort();

    for path in candidates {
        let content = match fs::read(&path) {
            Ok(data) => String::from_utf8_lossy(&data).to_lowercase(),
            Err(e) => {
                debug!("Cannot read NFO file {:?}: {}", path, e);
                continue;
            }
        };
        if let Some(captures) = IMDB_ID.captures(&content) {
            let imdb_id = captures[1].to_string();
            debug!("Found IMDb id {} in NFO file {:?}", imdb_id, path);
            return Some(imdb_id);
        }
    }
    None
}
