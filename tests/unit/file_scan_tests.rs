/*!
 * Tests for folder scanning and classification
 */

use std::fs;

use anyhow::Result;

use subscout::errors::ScanError;
use subscout::file_scan::{
    ExtensionSet, ScanOptions, SubtitleFile, auto_detect_nfo, scan_folder, scan_subtitles_folder,
};

use crate::common::{self, BrokenProbe, ProgressEvent, RecordingProgress, StubProbe};

fn video_extensions() -> ExtensionSet {
    ExtensionSet::new(["mkv", "avi", "mp4"])
}

fn subtitle_extensions() -> ExtensionSet {
    ExtensionSet::new(["srt", "sub"])
}

/// Membership testing is case-insensitive and tolerates leading dots
#[test]
fn test_extension_set_withMixedCase_shouldMatch() {
    let set = ExtensionSet::new([".MKV", "srt"]);
    assert!(set.contains("mkv"));
    assert!(set.contains("MKV"));
    assert!(set.contains(".mkv"));
    assert!(set.contains("SRT"));
    assert!(!set.contains("txt"));
    assert_eq!(set.len(), 2);
    assert!(!set.is_empty());
}

/// Remote catalog entries carry an id instead of a path and report online
#[test]
fn test_subtitle_file_remote_shouldBeOnline() {
    let remote = SubtitleFile::remote("4503769".to_string());
    assert!(remote.is_online());
    assert_eq!(remote.path(), None);

    let local = SubtitleFile::local("movie.srt".into());
    assert!(!local.is_online());
    assert!(local.path().is_some());
}

/// A probe-positive video is returned; unrelated files are ignored
#[test]
fn test_scan_folder_withOneVideo_shouldClassifyIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "movie.mkv", "not really a video")?;
    common::create_test_file(temp_dir.path(), "readme.txt", "hello")?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let options = ScanOptions::new(&videos, &subtitles, true);
    let probe = StubProbe::recognizing(["movie.mkv"]);
    let mut reporter = RecordingProgress::new();

    let result = scan_folder(temp_dir.path(), &options, &probe, &mut reporter)?;

    assert_eq!(result.videos.len(), 1);
    assert!(result.subtitles.is_empty());
    assert_eq!(reporter.finish_count(), 1);

    let video = &result.videos[0];
    assert_eq!(video.extension(), "mkv");
    assert_eq!(video.size(), "not really a video".len() as u64);
    let metadata = video.metadata().expect("classified video carries metadata");
    assert_eq!(metadata.track_count(), 1);
    assert_eq!(metadata.tracks()[0].duration_ms, 120_000);

    Ok(())
}

/// A video-extension file whose probe yields zero tracks is silently dropped
#[test]
fn test_scan_folder_withUnplayableVideo_shouldDropIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "truncated.mkv", "")?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let options = ScanOptions::new(&videos, &subtitles, true);
    let probe = StubProbe::recognizing(Vec::<String>::new());
    let mut reporter = RecordingProgress::new();

    let result = scan_folder(temp_dir.path(), &options, &probe, &mut reporter)?;

    assert!(result.videos.is_empty());
    assert_eq!(reporter.finish_count(), 1);

    Ok(())
}

/// A probe backend failure is absorbed, never surfaced by the scan
#[test]
fn test_scan_folder_withFailingProbe_shouldAbsorbErrors() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "movie.mkv", "x")?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let options = ScanOptions::new(&videos, &subtitles, true);
    let mut reporter = RecordingProgress::new();

    let result = scan_folder(temp_dir.path(), &options, &BrokenProbe, &mut reporter)?;

    assert!(result.videos.is_empty());
    assert_eq!(reporter.finish_count(), 1);

    Ok(())
}

/// Subtitle candidates match case-insensitively and come back offline
#[test]
fn test_scan_folder_withSubtitles_shouldCollectThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "b.srt")?;
    common::create_test_file(temp_dir.path(), "a.SUB", "subtitle data")?;
    common::create_test_file(temp_dir.path(), "notes.md", "skip me")?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let options = ScanOptions::new(&videos, &subtitles, true);
    let probe = StubProbe::recognizing(Vec::<String>::new());
    let mut reporter = RecordingProgress::new();

    let result = scan_folder(temp_dir.path(), &options, &probe, &mut reporter)?;

    assert_eq!(result.subtitles.len(), 2);
    assert!(result.subtitles.iter().all(|s| !s.is_online()));
    // Deterministic traversal: file-name order
    let names: Vec<String> = result
        .subtitles
        .iter()
        .filter_map(|s| s.path())
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.SUB", "b.srt"]);

    Ok(())
}

/// An empty folder still drives the reporter through a full cycle
#[test]
fn test_scan_folder_withEmptyFolder_shouldStillFinishReporter() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let options = ScanOptions::new(&videos, &subtitles, true);
    let probe = StubProbe::recognizing(Vec::<String>::new());
    let mut reporter = RecordingProgress::new();

    let result = scan_folder(temp_dir.path(), &options, &probe, &mut reporter)?;

    assert!(result.videos.is_empty());
    assert!(result.subtitles.is_empty());
    assert!(reporter.range_count() >= 1);
    assert!(!reporter.update_values().is_empty());
    assert_eq!(reporter.finish_count(), 1);
    assert_eq!(reporter.events.last(), Some(&ProgressEvent::Finish));

    Ok(())
}

/// Progress updates are evenly spaced over 0..=100, one per probed candidate
#[test]
fn test_scan_folder_progressCadence_shouldUpdatePerCandidate() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "one.mkv", "x")?;
    common::create_test_file(temp_dir.path(), "two.mkv", "y")?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let options = ScanOptions::new(&videos, &subtitles, true);
    let probe = StubProbe::recognizing(["one.mkv", "two.mkv"]);
    let mut reporter = RecordingProgress::new();

    scan_folder(temp_dir.path(), &options, &probe, &mut reporter)?;

    // Range declared before any update, then a reset to zero
    assert_eq!(reporter.events[0], ProgressEvent::Range(0, 100));
    assert_eq!(reporter.events[1], ProgressEvent::Update(0));
    // One update per candidate: 50% then 100%, then the inter-phase reset
    assert_eq!(reporter.update_values(), vec![0, 50, 100, 0]);
    assert_eq!(reporter.finish_count(), 1);

    Ok(())
}

/// The video and subtitle recursion flags operate independently
#[test]
fn test_scan_folder_withSingleLevel_shouldNotDescend() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    fs::create_dir(&nested)?;
    common::create_test_file(&nested, "episode.mkv", "x")?;
    common::create_test_subtitle(&nested, "episode.srt")?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let probe = StubProbe::recognizing(["episode.mkv"]);

    let options = ScanOptions::new(&videos, &subtitles, false);
    let mut reporter = RecordingProgress::new();
    let flat = scan_folder(temp_dir.path(), &options, &probe, &mut reporter)?;
    assert!(flat.videos.is_empty());
    assert!(flat.subtitles.is_empty());

    let options = ScanOptions {
        video_extensions: &videos,
        subtitle_extensions: &subtitles,
        recursive_videos: true,
        recursive_subtitles: false,
    };
    let mut reporter = RecordingProgress::new();
    let mixed = scan_folder(temp_dir.path(), &options, &probe, &mut reporter)?;
    assert_eq!(mixed.videos.len(), 1);
    assert!(mixed.subtitles.is_empty());

    Ok(())
}

/// A root that is not a directory fails before any reporter activity
#[test]
fn test_scan_folder_withFileRoot_shouldFailBeforeReporting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "movie.mkv", "x")?;

    let videos = video_extensions();
    let subtitles = subtitle_extensions();
    let options = ScanOptions::new(&videos, &subtitles, true);
    let probe = StubProbe::recognizing(["movie.mkv"]);
    let mut reporter = RecordingProgress::new();

    let result = scan_folder(&file, &options, &probe, &mut reporter);

    assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    assert!(reporter.events.is_empty());

    Ok(())
}

/// Subtitle-only scans share the traversal and reporter rules
#[test]
fn test_scan_subtitles_folder_shouldCollectAndFinish() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "movie.srt")?;

    let subtitles = subtitle_extensions();
    let mut reporter = RecordingProgress::new();

    let found = scan_subtitles_folder(temp_dir.path(), &subtitles, true, &mut reporter)?;

    assert_eq!(found.len(), 1);
    assert!(matches!(&found[0], SubtitleFile::Local { .. }));
    assert_eq!(reporter.finish_count(), 1);

    Ok(())
}

/// NFO sidecar files yield the first IMDb title id they contain
#[test]
fn test_auto_detect_nfo_withImdbLink_shouldReturnId() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        temp_dir.path(),
        "movie.nfo",
        "Scraped from https://www.imdb.com/title/tt1234567/ yesterday",
    )?;

    assert_eq!(
        auto_detect_nfo(temp_dir.path()),
        Some("1234567".to_string())
    );

    Ok(())
}

/// Matching is performed on lower-cased content
#[test]
fn test_auto_detect_nfo_withUpperCaseContent_shouldStillMatch() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(
        temp_dir.path(),
        "MOVIE.NFO",
        "SEE WWW.IMDB.COM/TITLE/TT0111161 FOR DETAILS",
    )?;

    assert_eq!(
        auto_detect_nfo(temp_dir.path()),
        Some("0111161".to_string())
    );

    Ok(())
}

/// Absence of a sidecar or of a link inside it is not an error
#[test]
fn test_auto_detect_nfo_withoutMatch_shouldReturnNone() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert_eq!(auto_detect_nfo(temp_dir.path()), None);

    common::create_test_file(temp_dir.path(), "movie.nfo", "no link in here")?;
    assert_eq!(auto_detect_nfo(temp_dir.path()), None);

    common::create_test_file(temp_dir.path(), "movie.txt", "imdb.com/title/tt7654321")?;
    assert_eq!(auto_detect_nfo(temp_dir.path()), None);

    Ok(())
}
