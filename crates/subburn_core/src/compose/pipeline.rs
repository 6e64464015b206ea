//! File-to-file burn using the configured resources and ffmpeg.

use std::path::PathBuf;
use std::sync::Arc;

use super::burner::{BurnReport, Burner, ProgressCallback};
use super::error::BurnError;
use super::grid::build_grid_layout;
use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::SlotAssignment;
use crate::text::{load_icon, FontBook};
use crate::video::{FfmpegSink, FfmpegSource, FrameSource, VideoInfo};

/// One input video, one output video and the tracks to burn into it.
#[derive(Debug, Clone)]
pub struct BurnJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub assignments: Vec<SlotAssignment>,
}

impl BurnJob {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        assignments: Vec<SlotAssignment>,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            assignments,
        }
    }
}

/// Decode `job.input`, burn its tracks into a grid sized to the video, and
/// encode to `job.output` (copying audio when the encoder settings ask).
pub fn burn_file(
    settings: &Settings,
    job: BurnJob,
    progress: Option<ProgressCallback>,
    logger: Option<Arc<JobLogger>>,
) -> Result<BurnReport, BurnError> {
    let result = run_job(settings, job, progress, logger.clone());

    if let (Err(e), Some(logger)) = (&result, &logger) {
        logger.error(&e.to_string());
        logger.show_tail("burn");
    }
    result
}

fn run_job(
    settings: &Settings,
    job: BurnJob,
    progress: Option<ProgressCallback>,
    logger: Option<Arc<JobLogger>>,
) -> Result<BurnReport, BurnError> {
    let tools = settings.resources.tools();
    let options = settings.burn_options();

    if let Some(ref logger) = logger {
        logger.phase("Prepare");
        logger.info(&format!("Input: {}", job.input.display()));
        logger.info(&format!("Output: {}", job.output.display()));
    }

    let mut source = FfmpegSource::open(&tools, &job.input)?;
    let info = source.info().clone();
    let layout = build_grid_layout(info.width, info.height, &settings.grid)?;

    let fonts = Arc::new(FontBook::load(&settings.resources.fonts()));
    let icon = settings.resources.icon().and_then(|p| load_icon(&p));
    tracing::info!(
        "[Burner] {} font face(s), icon {}",
        fonts.len(),
        if icon.is_some() { "loaded" } else { "not set" }
    );

    if let Some(ref logger) = logger {
        logger.json("Grid", &settings.grid);
        for assignment in &job.assignments {
            logger.info(&format!(
                "Track '{}' -> slot {} ({} segments)",
                assignment.label,
                assignment.slot_id,
                assignment.segments.len()
            ));
        }
    }

    let mut burner = Burner::new(&layout, job.assignments, fonts, icon.as_ref(), options.clone())?;
    if let Some(callback) = progress {
        burner = burner.with_progress_callback(callback);
    }
    if let Some(ref logger) = logger {
        burner = burner.with_job_logger(Arc::clone(logger));
    }

    let out_info = VideoInfo {
        fps: options.fps_override.unwrap_or(info.fps),
        ..info
    };
    let mut sink = FfmpegSink::create(
        &tools,
        &job.output,
        &out_info,
        &settings.encoder,
        Some(&job.input),
    )?;
    if let Some(ref logger) = logger {
        logger.command(&format!(
            "{} ... -c:v {} -crf {} {}",
            tools.ffmpeg.display(),
            settings.encoder.codec,
            settings.encoder.crf,
            job.output.display()
        ));
    }

    burner.run(&mut source, &mut sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogConfig;
    use crate::video::FrameError;

    #[test]
    fn missing_input_fails_before_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let job = BurnJob::new(dir.path().join("in.mp4"), dir.path().join("out.mp4"), Vec::new());

        let result = burn_file(&Settings::default(), job, None, None);
        assert!(matches!(
            result,
            Err(BurnError::Frame(FrameError::OpenFailed { .. }))
        ));
        assert!(!dir.path().join("out.mp4").exists());
    }

    #[test]
    fn failure_is_written_to_job_log() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Arc::new(JobLogger::new("job", dir.path(), LogConfig::default(), None).unwrap());
        let job = BurnJob::new(dir.path().join("in.mp4"), dir.path().join("out.mp4"), Vec::new());

        assert!(burn_file(&Settings::default(), job, None, Some(Arc::clone(&logger))).is_err());
        logger.flush();

        let content = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("=== Prepare ==="));
        assert!(content.contains("[ERROR]"));
        assert!(content.contains("[burn/tail]"));
    }
}
