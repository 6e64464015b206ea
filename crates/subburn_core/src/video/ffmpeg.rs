//! FFmpeg subprocess frame source and sink.
//!
//! Frames travel as packed RGB24 over stdin/stdout pipes, so any container
//! and codec ffmpeg understands can be burned without linking codec
//! libraries.

use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::probe::probe_video;
use super::{FrameError, FrameSink, FrameSource, VideoInfo};

/// Locations of the ffmpeg executables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FfmpegTools {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: PathBuf,

    #[serde(default = "default_ffprobe")]
    pub ffprobe: PathBuf,
}

fn default_ffmpeg() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe() -> PathBuf {
    PathBuf::from("ffprobe")
}

impl Default for FfmpegTools {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

impl FfmpegTools {
    /// Check if ffmpeg is available.
    pub fn is_available(&self) -> bool {
        Command::new(&self.ffmpeg)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// Output encoding options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Video codec passed to `-c:v`.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Constant rate factor.
    #[serde(default = "default_crf")]
    pub crf: u32,

    /// Encoder preset.
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Output pixel format.
    #[serde(default = "default_pixel_format")]
    pub pixel_format: String,

    /// Copy audio streams from the source file, if it has any.
    #[serde(default = "default_true")]
    pub copy_audio: bool,
}

fn default_codec() -> String {
    "libx264".to_string()
}

fn default_crf() -> u32 {
    18
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_pixel_format() -> String {
    "yuv420p".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            crf: default_crf(),
            preset: default_preset(),
            pixel_format: default_pixel_format(),
            copy_audio: true,
        }
    }
}

/// Decodes a video file to RGB frames through an ffmpeg pipe.
pub struct FfmpegSource {
    path: PathBuf,
    info: VideoInfo,
    child: Child,
    stdout: ChildStdout,
    index: u64,
}

impl FfmpegSource {
    /// Probe and open a video file.
    pub fn open(tools: &FfmpegTools, path: &Path) -> Result<Self, FrameError> {
        if !path.exists() {
            return Err(FrameError::open(path, "File does not exist"));
        }

        let info = probe_video(&tools.ffprobe, path)?;

        let mut child = Command::new(&tools.ffmpeg)
            .args(["-v", "error", "-nostdin", "-i"])
            .arg(path)
            .args(["-map", "0:v:0", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|_| FrameError::ToolNotFound(tools.ffmpeg.display().to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FrameError::open(path, "ffmpeg stdout unavailable"))?;

        tracing::debug!(
            "[FFmpeg] Decoding {} as {}x{} rgb24",
            path.display(),
            info.width,
            info.height
        );

        Ok(Self {
            path: path.to_path_buf(),
            info,
            child,
            stdout,
            index: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for FfmpegSource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameError> {
        let len = self.info.frame_len();
        let mut buf = vec![0u8; len];
        let mut filled = 0;

        while filled < len {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(FrameError::read(self.index, e.to_string())),
            }
        }

        if filled == 0 {
            return Ok(None);
        }
        if filled < len {
            return Err(FrameError::read(
                self.index,
                format!("truncated frame ({} of {} bytes)", filled, len),
            ));
        }

        let frame = RgbImage::from_raw(self.info.width, self.info.height, buf)
            .ok_or_else(|| FrameError::read(self.index, "buffer size mismatch"))?;
        self.index += 1;
        Ok(Some(frame))
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Encodes RGB frames to a video file through an ffmpeg pipe.
pub struct FfmpegSink {
    output: PathBuf,
    width: u32,
    height: u32,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    index: u64,
}

impl FfmpegSink {
    /// Start an encoder for frames of `info`'s size and rate.
    ///
    /// With `audio_from` set and `copy_audio` enabled, audio streams of that
    /// file are copied into the output.
    pub fn create(
        tools: &FfmpegTools,
        output: &Path,
        info: &VideoInfo,
        encoder: &EncoderSettings,
        audio_from: Option<&Path>,
    ) -> Result<Self, FrameError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FrameError::open(output, e.to_string()))?;
        }

        let mut cmd = Command::new(&tools.ffmpeg);
        cmd.args(["-v", "error", "-y", "-f", "rawvideo", "-pix_fmt", "rgb24"])
            .args(["-s", &format!("{}x{}", info.width, info.height)])
            .args(["-r", &format!("{}", info.fps)])
            .args(["-i", "-"]);

        let audio = audio_from.filter(|_| encoder.copy_audio);
        if let Some(source) = audio {
            cmd.arg("-i")
                .arg(source)
                .args(["-map", "0:v:0", "-map", "1:a?", "-c:a", "copy"]);
        }

        cmd.args(["-c:v", &encoder.codec])
            .args(["-preset", &encoder.preset])
            .args(["-crf", &encoder.crf.to_string()])
            .args(["-pix_fmt", &encoder.pixel_format])
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        tracing::info!("[FFmpeg] $ {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|_| FrameError::ToolNotFound(tools.ffmpeg.display().to_string()))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| FrameError::open(output, "ffmpeg stdin unavailable"))?;

        Ok(Self {
            output: output.to_path_buf(),
            width: info.width,
            height: info.height,
            child: Some(child),
            stdin: Some(stdin),
            index: 0,
        })
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl FrameSink for FfmpegSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), FrameError> {
        if frame.dimensions() != (self.width, self.height) {
            return Err(FrameError::size_mismatch(
                (self.width, self.height),
                frame.dimensions(),
            ));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| FrameError::write(self.index, "encoder already finished"))?;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| FrameError::write(self.index, e.to_string()))?;
        self.index += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FrameError> {
        // Closing stdin signals end of stream to the encoder
        drop(self.stdin.take());

        if let Some(mut child) = self.child.take() {
            let status = child
                .wait()
                .map_err(|e| FrameError::write(self.index, e.to_string()))?;
            if !status.success() {
                return Err(FrameError::ProcessFailed {
                    tool: "ffmpeg".to_string(),
                    status: status.to_string(),
                });
            }
            tracing::info!(
                "[FFmpeg] Wrote {} frames to {}",
                self.index,
                self.output.display()
            );
        }
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoder_defaults() {
        let enc = EncoderSettings::default();
        assert_eq!(enc.codec, "libx264");
        assert_eq!(enc.crf, 18);
        assert!(enc.copy_audio);
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = FfmpegSource::open(&FfmpegTools::default(), &dir.path().join("nope.mp4"));
        assert!(matches!(result, Err(FrameError::OpenFailed { .. })));
    }

    #[test]
    fn missing_tool_is_reported() {
        let tools = FfmpegTools {
            ffmpeg: PathBuf::from("/nonexistent/ffmpeg"),
            ffprobe: PathBuf::from("/nonexistent/ffprobe"),
        };
        assert!(!tools.is_available());

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.mp4");
        std::fs::write(&input, b"").unwrap();
        let result = FfmpegSource::open(&tools, &input);
        assert!(matches!(result, Err(FrameError::ToolNotFound(_))));
    }
}
