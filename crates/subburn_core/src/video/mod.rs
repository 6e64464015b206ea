//! Frame input and output.
//!
//! The compositor consumes frames through `FrameSource` and emits them
//! through `FrameSink`. Two implementations are provided:
//! - `ffmpeg`: decode/encode through ffmpeg subprocesses with raw RGB pipes
//! - `memory`: in-memory frame lists

mod error;
pub mod ffmpeg;
mod memory;
mod probe;

pub use error::FrameError;
pub use ffmpeg::{EncoderSettings, FfmpegSink, FfmpegSource, FfmpegTools};
pub use memory::{MemorySink, MemorySource};
pub use probe::{parse_fps_fraction, parse_probe_json, probe_video};

use image::RgbImage;

/// Stream properties of a frame source.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Frames per second.
    pub fps: f64,
    /// Total frame count, when the container reports or implies one.
    pub frame_count: Option<u64>,
}

impl VideoInfo {
    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            width,
            height,
            fps,
            frame_count: None,
        }
    }

    /// Builder: set the frame count.
    pub fn with_frame_count(mut self, count: u64) -> Self {
        self.frame_count = Some(count);
        self
    }

    /// Byte length of one packed RGB24 frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Ordered sequence of equally sized RGB frames.
pub trait FrameSource {
    fn info(&self) -> &VideoInfo;

    /// Next frame, or None at end of stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameError>;
}

/// Consumer of frames in source order and dimensions.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), FrameError>;

    /// Flush and close the output.
    fn finish(&mut self) -> Result<(), FrameError>;
}
