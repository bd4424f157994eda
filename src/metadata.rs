/*!
 * Best-effort video metadata probing.
 *
 * A probe backend extracts track-level metadata (duration, framerate) from a
 * video file. The backend is selected once at process start by ordered
 * availability probing: the full ffprobe introspection tool first, the leaner
 * mediainfo tool second, and a no-op backend as the final fallback. Selection
 * never aborts the process; with the no-op backend every probe yields zero
 * tracks and no file classifies as a video.
 *
 * Probing is an oracle, not a verifier: extraction failures of any kind
 * (corrupt container, unsupported codec, I/O) surface as an empty track list,
 * never as an error to the caller.
 */

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde_json::Value;

/// Metadata of a single video track
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadataTrack {
    /// Duration of the track in milliseconds
    pub duration_ms: u64,
    /// Frame rate of the track in frames per second, always positive
    pub framerate: f64,
}

/// Metadata of all video tracks of a file.
///
/// Usually zero or one track; more than one indicates a multi-track container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoMetadata {
    tracks: Vec<VideoMetadataTrack>,
}

impl VideoMetadata {
    /// Build metadata from an already extracted track list
    pub fn from_tracks(tracks: Vec<VideoMetadataTrack>) -> Self {
        Self { tracks }
    }

    fn add_track(&mut self, track: VideoMetadataTrack) {
        self.tracks.push(track);
    }

    /// All probed video tracks, in container order
    pub fn tracks(&self) -> &[VideoMetadataTrack] {
        &self.tracks
    }

    /// Number of probed video tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// True when at least one video track was probed
    pub fn has_video(&self) -> bool {
        !self.tracks.is_empty()
    }
}

/// A metadata extraction backend.
///
/// Implementations are stateless functions from path to track sequence (aside
/// from the I/O they perform) and safe for concurrent invocation.
pub trait MetadataProbe: Send + Sync {
    /// Short backend identifier for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Whether the backend can run on this system; checked once at startup
    fn is_available(&self) -> bool;

    /// Extract video track metadata from the file at `path`.
    ///
    /// Errors are absorbed by [`parse`]; implementations may fail freely.
    fn probe(&self, path: &Path) -> Result<VideoMetadata>;
}

/// Backend built on the ffprobe command line tool
pub struct FfprobeProbe;

impl FfprobeProbe {
    fn parse_output(output: &str) -> Result<VideoMetadata> {
        let json: Value =
            serde_json::from_str(output).context("Failed to parse ffprobe JSON output")?;

        // Container duration, used when a stream does not carry its own.
        let format_duration = json
            .get("format")
            .and_then(|f| f.get("duration"))
            .and_then(|d| d.as_str())
            .and_then(|d| d.parse::<f64>().ok());

        let mut metadata = VideoMetadata::default();
        if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
            for stream in streams {
                let codec_type = stream
                    .get("codec_type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                if codec_type != "video" {
                    continue;
                }

                let framerate = stream
                    .get("avg_frame_rate")
                    .and_then(|v| v.as_str())
                    .and_then(parse_frame_rate)
                    .or_else(|| {
                        stream
                            .get("r_frame_rate")
                            .and_then(|v| v.as_str())
                            .and_then(parse_frame_rate)
                    });
                // Attached pictures report a video codec type but no usable
                // frame rate; they are not playable tracks.
                let Some(framerate) = framerate else {
                    continue;
                };

                let duration_s = stream
                    .get("duration")
                    .and_then(|v| v.as_str())
                    .and_then(|d| d.parse::<f64>().ok())
                    .or(format_duration)
                    .unwrap_or(0.0);

                metadata.add_track(VideoMetadataTrack {
                    duration_ms: (duration_s * 1000.0).max(0.0) as u64,
                    framerate,
                });
            }
        }
        Ok(metadata)
    }
}

impl MetadataProbe for FfprobeProbe {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn is_available(&self) -> bool {
        check_tool("ffprobe", "-version")
    }

    fn probe(&self, path: &Path) -> Result<VideoMetadata> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .context("Failed to execute ffprobe command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Self::parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Backend built on the mediainfo command line tool
pub struct MediainfoProbe;

impl MediainfoProbe {
    fn parse_output(output: &str) -> Result<VideoMetadata> {
        let json: Value =
            serde_json::from_str(output).context("Failed to parse mediainfo JSON output")?;

        let mut metadata = VideoMetadata::default();
        let tracks = json
            .get("media")
            .and_then(|m| m.get("track"))
            .and_then(|t| t.as_array());
        if let Some(tracks) = tracks {
            for track in tracks {
                let track_type = track.get("@type").and_then(|v| v.as_str()).unwrap_or("");
                if track_type != "Video" {
                    continue;
                }

                let framerate = track
                    .get("FrameRate")
                    .and_then(|v| v.as_str())
                    .and_then(parse_frame_rate);
                let Some(framerate) = framerate else {
                    continue;
                };

                let duration_s = track
                    .get("Duration")
                    .and_then(|v| v.as_str())
                    .and_then(|d| d.parse::<f64>().ok())
                    .unwrap_or(0.0);

                metadata.add_track(VideoMetadataTrack {
                    duration_ms: (duration_s * 1000.0).max(0.0) as u64,
                    framerate,
                });
            }
        }
        Ok(metadata)
    }
}

impl MetadataProbe for MediainfoProbe {
    fn name(&self) -> &'static str {
        "mediainfo"
    }

    fn is_available(&self) -> bool {
        check_tool("mediainfo", "--Version")
    }

    fn probe(&self, path: &Path) -> Result<VideoMetadata> {
        let output = Command::new("mediainfo")
            .arg("--Output=JSON")
            .arg(path)
            .output()
            .context("Failed to execute mediainfo command")?;

        if !output.status.success() {
            return Err(anyhow!(
                "mediainfo failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        Self::parse_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Fallback backend that always yields zero tracks
pub struct NullProbe;

impl MetadataProbe for NullProbe {
    fn name(&self) -> &'static str {
        "null"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn probe(&self, _path: &Path) -> Result<VideoMetadata> {
        Ok(VideoMetadata::default())
    }
}

/// Check that an external tool runs at all
fn check_tool(tool: &str, version_arg: &str) -> bool {
    match Command::new(tool).arg(version_arg).output() {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

static ACTIVE_PROBE: Lazy<Box<dyn MetadataProbe>> = Lazy::new(select_backend);

fn select_backend() -> Box<dyn MetadataProbe> {
    let candidates: [Box<dyn MetadataProbe>; 2] =
        [Box::new(FfprobeProbe), Box::new(MediainfoProbe)];
    for candidate in candidates {
        if candidate.is_available() {
            debug!("Using {} metadata backend", candidate.name());
            return candidate;
        }
    }
    warn!("Failed to find a metadata backend (tried ffprobe, mediainfo).");
    warn!("Video files cannot be classified or enriched with track metadata.");
    Box::new(NullProbe)
}

/// The process-wide probe backend, selected on first use and fixed thereafter
pub fn default_probe() -> &'static dyn MetadataProbe {
    ACTIVE_PROBE.as_ref()
}

/// Name of the selected backend
pub fn active_backend() -> &'static str {
    default_probe().name()
}

/// Probe the file at `path`, absorbing every extraction failure.
///
/// A corrupt container, an unsupported codec or an I/O failure all yield an
/// empty track list.
pub fn parse(probe: &dyn MetadataProbe, path: &Path) -> VideoMetadata {
    match probe.probe(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Probing {:?} with {} failed: {}", path, probe.name(), e);
            VideoMetadata::default()
        }
    }
}

/// Parse a frame rate in fraction (`24000/1001`) or decimal (`23.976`) notation
fn parse_frame_rate(value: &str) -> Option<f64> {
    let rate = match value.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => value.trim().parse::<f64>().ok()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}
