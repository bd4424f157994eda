/*!
 * Tests for the metadata probe chain
 */

use std::path::Path;

use subscout::metadata::{
    self, MetadataProbe, NullProbe, VideoMetadata, VideoMetadataTrack, active_backend,
};

use crate::common::{BrokenProbe, StubProbe};

/// The no-op backend is always available and yields zero tracks
#[test]
fn test_null_probe_shouldAlwaysYieldEmptyMetadata() {
    assert!(NullProbe.is_available());
    let metadata = NullProbe.probe(Path::new("whatever.mkv")).unwrap();
    assert!(!metadata.has_video());
    assert_eq!(metadata.track_count(), 0);
}

/// parse absorbs backend failures into an empty track list
#[test]
fn test_parse_withFailingBackend_shouldYieldEmptyMetadata() {
    let metadata = metadata::parse(&BrokenProbe, Path::new("corrupt.mkv"));
    assert!(!metadata.has_video());
}

/// parse passes through whatever the backend extracted
#[test]
fn test_parse_withRecognizedFile_shouldYieldTracks() {
    let probe = StubProbe::recognizing(["movie.mkv"]);
    let metadata = metadata::parse(&probe, Path::new("movie.mkv"));
    assert!(metadata.has_video());
    assert_eq!(metadata.tracks()[0].framerate, 25.0);

    let metadata = metadata::parse(&probe, Path::new("other.mkv"));
    assert!(!metadata.has_video());
}

/// Track metadata is a plain value type
#[test]
fn test_video_metadata_fromTracks_shouldExposeTracks() {
    let tracks = vec![
        VideoMetadataTrack {
            duration_ms: 1_000,
            framerate: 24.0,
        },
        VideoMetadataTrack {
            duration_ms: 2_000,
            framerate: 30.0,
        },
    ];
    let metadata = VideoMetadata::from_tracks(tracks.clone());
    assert_eq!(metadata.track_count(), 2);
    assert_eq!(metadata.tracks(), &tracks[..]);
    assert!(metadata.has_video());

    assert!(!VideoMetadata::default().has_video());
}

/// Backend selection settles on one of the known backends and stays stable
#[test]
fn test_backend_selection_shouldBeStable() {
    let first = active_backend();
    assert!(["ffprobe", "mediainfo", "null"].contains(&first));
    // Selection happens once; repeated queries see the same backend
    assert_eq!(active_backend(), first);
    assert_eq!(metadata::default_probe().name(), first);
}
