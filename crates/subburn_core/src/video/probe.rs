//! Stream property detection with ffprobe.

use std::path::Path;
use std::process::Command;

use super::{FrameError, VideoInfo};

/// Parse an ffprobe rate such as `30000/1001` or `25`.
pub fn parse_fps_fraction(s: &str) -> Option<f64> {
    let fps = match s.split_once('/') {
        Some((num, denom)) => {
            let num: f64 = num.trim().parse().ok()?;
            let denom: f64 = denom.trim().parse().ok()?;
            if denom == 0.0 {
                return None;
            }
            num / denom
        }
        None => s.trim().parse().ok()?,
    };
    (fps.is_finite() && fps > 0.0).then_some(fps)
}

/// Read a numeric ffprobe field that may be a string, a number or `N/A`.
fn field_f64(value: Option<&serde_json::Value>) -> Option<f64> {
    match value? {
        serde_json::Value::String(s) if s != "N/A" => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Parse `ffprobe -of json` output for the first video stream.
pub fn parse_probe_json(json: &str) -> Result<VideoInfo, FrameError> {
    let data: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| FrameError::ProbeFailed(format!("Failed to parse ffprobe JSON: {}", e)))?;

    let stream = data
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|s| s.first())
        .ok_or_else(|| FrameError::ProbeFailed("No video streams found".to_string()))?;

    let width = stream.get("width").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let height = stream.get("height").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    if width == 0 || height == 0 {
        return Err(FrameError::ProbeFailed(
            "Video stream has no dimensions".to_string(),
        ));
    }

    // r_frame_rate is more reliable than avg_frame_rate for constant-rate video
    let fps = ["r_frame_rate", "avg_frame_rate"]
        .iter()
        .filter_map(|key| stream.get(*key).and_then(|v| v.as_str()))
        .find_map(parse_fps_fraction)
        .ok_or_else(|| FrameError::ProbeFailed("Video stream has no frame rate".to_string()))?;

    let mut info = VideoInfo::new(width, height, fps);

    if let Some(count) = field_f64(stream.get("nb_frames")) {
        if count > 0.0 {
            info.frame_count = Some(count as u64);
        }
    }

    // Estimate from duration (MKV often only reports the format duration)
    if info.frame_count.is_none() {
        let duration = field_f64(stream.get("duration"))
            .or_else(|| field_f64(data.get("format").and_then(|f| f.get("duration"))));
        if let Some(duration) = duration.filter(|d| *d > 0.0) {
            info.frame_count = Some((duration * fps) as u64);
        }
    }

    Ok(info)
}

/// Detect stream properties of a video file.
///
/// # Logging
/// Logs detection with the `[Probe]` prefix.
pub fn probe_video(ffprobe: &Path, path: &Path) -> Result<VideoInfo, FrameError> {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    tracing::info!("[Probe] Detecting properties for: {}", filename);

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames,duration",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|_| FrameError::ToolNotFound(ffprobe.display().to_string()))?;

    if !output.status.success() {
        return Err(FrameError::open(path, "ffprobe could not read the file"));
    }

    let info = parse_probe_json(&String::from_utf8_lossy(&output.stdout))?;

    tracing::info!(
        "[Probe] {}x{} @ {:.3} fps, {} frames",
        info.width,
        info.height,
        info.fps,
        info.frame_count
            .map(|c| c.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );

    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_fractions() {
        assert!((parse_fps_fraction("30000/1001").unwrap() - 29.97).abs() < 0.01);
        assert_eq!(parse_fps_fraction("25"), Some(25.0));
        assert_eq!(parse_fps_fraction("0/0"), None);
        assert_eq!(parse_fps_fraction("abc"), None);
    }

    #[test]
    fn parses_stream_properties() {
        let json = r#"{
            "streams": [{"width": 1920, "height": 1080, "r_frame_rate": "24000/1001", "nb_frames": "2400"}],
            "format": {"duration": "100.1"}
        }"#;
        let info = parse_probe_json(json).unwrap();
        assert_eq!((info.width, info.height), (1920, 1080));
        assert!((info.fps - 23.976).abs() < 0.001);
        assert_eq!(info.frame_count, Some(2400));
    }

    #[test]
    fn estimates_frame_count_from_format_duration() {
        let json = r#"{
            "streams": [{"width": 640, "height": 360, "r_frame_rate": "25/1", "nb_frames": "N/A"}],
            "format": {"duration": "10.0"}
        }"#;
        let info = parse_probe_json(json).unwrap();
        assert_eq!(info.frame_count, Some(250));
    }

    #[test]
    fn rejects_missing_stream() {
        assert!(matches!(
            parse_probe_json(r#"{"streams": []}"#),
            Err(FrameError::ProbeFailed(_))
        ));
        assert!(parse_probe_json("not json").is_err());
    }
}
