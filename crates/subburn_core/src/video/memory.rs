//! In-memory frame source and sink.

use std::collections::VecDeque;

use image::RgbImage;

use super::{FrameError, FrameSink, FrameSource, VideoInfo};

/// Frame source backed by a list of images.
pub struct MemorySource {
    info: VideoInfo,
    frames: VecDeque<RgbImage>,
}

impl MemorySource {
    /// Create a source from frames that all share the first frame's size.
    ///
    /// The frame count is known and reported.
    pub fn new(frames: Vec<RgbImage>, fps: f64) -> Self {
        let (width, height) = frames.first().map(|f| f.dimensions()).unwrap_or((0, 0));
        let info = VideoInfo::new(width, height, fps).with_frame_count(frames.len() as u64);
        Self {
            info,
            frames: frames.into(),
        }
    }

    /// `count` copies of a blank frame.
    pub fn blank(width: u32, height: u32, count: usize, fps: f64) -> Self {
        Self::new(vec![RgbImage::new(width, height); count], fps)
    }

    /// Builder: hide the frame count, as a live or unindexed stream would.
    pub fn without_frame_count(mut self) -> Self {
        self.info.frame_count = None;
        self
    }
}

impl FrameSource for MemorySource {
    fn info(&self) -> &VideoInfo {
        &self.info
    }

    fn next_frame(&mut self) -> Result<Option<RgbImage>, FrameError> {
        Ok(self.frames.pop_front())
    }
}

/// Frame sink that keeps every frame.
#[derive(Default)]
pub struct MemorySink {
    frames: Vec<RgbImage>,
    finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[RgbImage] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<RgbImage> {
        self.frames
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for MemorySink {
    fn write_frame(&mut self, frame: &RgbImage) -> Result<(), FrameError> {
        if let Some(first) = self.frames.first() {
            if first.dimensions() != frame.dimensions() {
                return Err(FrameError::size_mismatch(
                    first.dimensions(),
                    frame.dimensions(),
                ));
            }
        }
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FrameError> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_yields_frames_then_none() {
        let mut source = MemorySource::blank(4, 2, 2, 25.0);
        assert_eq!(source.info().frame_count, Some(2));
        assert_eq!(source.info().frame_len(), 24);
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_some());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn sink_rejects_size_change() {
        let mut sink = MemorySink::new();
        sink.write_frame(&RgbImage::new(4, 4)).unwrap();
        let err = sink.write_frame(&RgbImage::new(2, 2)).unwrap_err();
        assert!(matches!(err, FrameError::SizeMismatch { .. }));
        sink.finish().unwrap();
        assert!(sink.is_finished());
        assert_eq!(sink.frames().len(), 1);
    }
}
