//! Frame-by-frame burn loop.
//!
//! Builds one `Track` per slot assignment (auto-splitting its segments to
//! the slot), then for every source frame at `t = i / fps` asks each track
//! for its active bitmap and blends it into the frame before handing the
//! frame to the sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::{RgbImage, RgbaImage};

use super::blend::overlay_in_slot;
use super::error::BurnError;
use crate::logging::JobLogger;
use crate::models::{SlotAssignment, SlotLayout};
use crate::split::{split_for_slot, SplitOptions};
use crate::text::{FontBook, RubyRenderer};
use crate::track::Track;
use crate::video::{FrameSink, FrameSource};

/// Callback receiving progress in whole percent.
pub type ProgressCallback = Box<dyn Fn(u32) + Send + Sync>;

/// Options for one burn run.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnOptions {
    /// Frame rate used for timing instead of the source's.
    pub fps_override: Option<f64>,
    /// Report progress only at multiples of this percentage (and at 100).
    pub progress_step: u32,
    /// Auto-split tunables.
    pub split: SplitOptions,
}

impl Default for BurnOptions {
    fn default() -> Self {
        Self {
            fps_override: None,
            progress_step: 2,
            split: SplitOptions::default(),
        }
    }
}

/// Handle for cancelling a running burn.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel the burn.
    ///
    /// The loop stops before composing the next frame.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Per-track outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSummary {
    pub label: String,
    pub slot_id: u32,
    /// Segments after auto-splitting.
    pub segments: usize,
    /// Distinct bitmaps rendered.
    pub rendered: usize,
}

/// Result of a burn run.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnReport {
    pub frames_written: u64,
    pub cancelled: bool,
    pub tracks: Vec<TrackSummary>,
}

/// Composites subtitle tracks onto a frame stream.
pub struct Burner {
    tracks: Vec<Track>,
    options: BurnOptions,
    cancelled: Arc<AtomicBool>,
    progress_callback: Option<ProgressCallback>,
    logger: Option<Arc<JobLogger>>,
}

impl Burner {
    /// Resolve assignments against the layout and prepare their tracks.
    ///
    /// Assignments naming an unknown slot, or with no segments, are skipped
    /// with a warning. An empty layout is an error.
    pub fn new(
        layout: &SlotLayout,
        assignments: Vec<SlotAssignment>,
        fonts: Arc<FontBook>,
        icon: Option<&RgbaImage>,
        options: BurnOptions,
    ) -> Result<Self, BurnError> {
        if layout.is_empty() {
            return Err(BurnError::NoSlots);
        }

        let mut tracks = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let Some(slot) = layout.get(assignment.slot_id) else {
                tracing::warn!(
                    "[Burner] Track '{}' targets unknown slot {}, skipping",
                    assignment.label,
                    assignment.slot_id
                );
                continue;
            };
            if assignment.segments.is_empty() {
                tracing::warn!(
                    "[Burner] Track '{}' has no segments, skipping",
                    assignment.label
                );
                continue;
            }

            let renderer = RubyRenderer::new(assignment.style, Arc::clone(&fonts)).with_icon(icon);
            let segments = split_for_slot(&assignment.segments, slot, &renderer, &options.split);

            tracing::info!(
                "[Burner] Track '{}' -> slot {} ({}x{} at {},{}): {} segments",
                assignment.label,
                slot.id,
                slot.width,
                slot.height,
                slot.x,
                slot.y,
                segments.len()
            );

            tracks.push(Track::new(assignment.label, *slot, renderer, segments));
        }

        Ok(Self {
            tracks,
            options,
            cancelled: Arc::new(AtomicBool::new(false)),
            progress_callback: None,
            logger: None,
        })
    }

    /// Builder: report progress through `callback`.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Builder: mirror phases and progress to a job log.
    pub fn with_job_logger(mut self, logger: Arc<JobLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Get a cancellation handle.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Draw every track's active segment at `t` onto `frame`.
    ///
    /// Returns the number of overlays drawn.
    pub fn compose_frame(&mut self, frame: &mut RgbImage, t: f64) -> usize {
        let mut drawn = 0;
        for track in &mut self.tracks {
            if let Some(overlay) = track.overlay_at(t) {
                if overlay_in_slot(frame, &overlay, track.slot()) {
                    drawn += 1;
                }
            }
        }
        drawn
    }

    fn report_progress(&self, percent: u32) {
        if let Some(ref callback) = self.progress_callback {
            callback(percent);
        }
        if let Some(ref logger) = self.logger {
            logger.progress(percent);
        }
    }

    /// Burn every frame of `source` into `sink`.
    ///
    /// The sink is finished even when the run is cancelled, so frames
    /// written so far are kept.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        sink: &mut dyn FrameSink,
    ) -> Result<BurnReport, BurnError> {
        let info = source.info().clone();
        let fps = self.options.fps_override.unwrap_or(info.fps);
        if !fps.is_finite() || fps <= 0.0 {
            return Err(BurnError::InvalidFrameRate(fps));
        }

        if let Some(ref logger) = self.logger {
            logger.phase("Burn");
            logger.info(&format!(
                "{}x{} @ {:.3} fps, {} tracks",
                info.width,
                info.height,
                fps,
                self.tracks.len()
            ));
        }

        for track in &mut self.tracks {
            track.reset();
        }

        let total = info.frame_count.filter(|n| *n > 0);
        let step = self.options.progress_step.max(1);
        let mut last_reported: Option<u32> = None;
        if total.is_some() {
            self.report_progress(0);
            last_reported = Some(0);
        }

        let mut index: u64 = 0;
        let mut cancelled = false;

        loop {
            if self.cancelled.load(Ordering::SeqCst) {
                tracing::info!("[Burner] Cancelled after {} frames", index);
                cancelled = true;
                break;
            }

            let Some(mut frame) = source.next_frame()? else {
                break;
            };

            let t = index as f64 / fps;
            self.compose_frame(&mut frame, t);
            sink.write_frame(&frame)?;
            index += 1;

            if let Some(total) = total {
                let percent = ((index * 100) / total).min(100) as u32;
                let due = percent == 100 || percent % step == 0;
                if due && last_reported != Some(percent) {
                    self.report_progress(percent);
                    last_reported = Some(percent);
                }
            }
        }

        sink.finish()?;

        let tracks = self
            .tracks
            .iter()
            .map(|t| TrackSummary {
                label: t.label().to_string(),
                slot_id: t.slot().id,
                segments: t.segments().len(),
                rendered: t.cached_renders(),
            })
            .collect();

        if let Some(ref logger) = self.logger {
            if cancelled {
                logger.warn(&format!("Cancelled after {} frames", index));
            } else {
                logger.success(&format!("Burned {} frames", index));
            }
        }
        tracing::info!("[Burner] Wrote {} frames", index);

        Ok(BurnReport {
            frames_written: index,
            cancelled,
            tracks,
        })
    }
}
