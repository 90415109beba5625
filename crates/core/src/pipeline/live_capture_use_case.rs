use std::time::{Duration, Instant};

use crate::capture::domain::frame_source::{FrameSource, SourceInfo};
use crate::detection::domain::face_detector::FaceDetector;
use crate::display::domain::display_surface::DisplaySurface;
use crate::rendering::domain::detection_renderer::DetectionRenderer;
use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

use super::live_capture_config::LiveCaptureConfig;
use super::pipeline_logger::{NullPipelineLogger, PipelineLogger};

/// Why a capture session ended normally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    QuitRequested,
    EndOfStream,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped(StopReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub frames_processed: usize,
    pub detections_rendered: usize,
    pub stop_reason: StopReason,
}

/// Exclusive owner of the capture source and display for one run.
///
/// Both are released exactly once when the guard drops, whichever way the
/// run ends: quit, end of stream, error return or unwinding panic.
struct SessionGuard {
    source: Box<dyn FrameSource>,
    display: Box<dyn DisplaySurface>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.source.close();
        self.display.close();
        log::debug!("Capture session released");
    }
}

/// Runs the read → detect → render → show → poll loop until the user
/// quits or the source runs dry.
///
/// Single-use: `execute` consumes the owned components, so a second call
/// fails without touching any device.
pub struct LiveCaptureUseCase {
    source: Option<Box<dyn FrameSource>>,
    detector: Option<Box<dyn FaceDetector>>,
    renderer: Option<Box<dyn DetectionRenderer>>,
    display: Option<Box<dyn DisplaySurface>>,
    logger: Box<dyn PipelineLogger>,
    window_title: String,
    quit_key: char,
    poll_interval: Duration,
}

#[derive(Default)]
struct Counters {
    frames: usize,
    detections: usize,
}

impl LiveCaptureUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        renderer: Box<dyn DetectionRenderer>,
        display: Box<dyn DisplaySurface>,
        config: &LiveCaptureConfig,
        logger: Option<Box<dyn PipelineLogger>>,
    ) -> Self {
        Self {
            source: Some(source),
            detector: Some(detector),
            renderer: Some(renderer),
            display: Some(display),
            logger: logger.unwrap_or_else(|| Box::new(NullPipelineLogger)),
            window_title: config.window_title.clone(),
            quit_key: config.quit_key,
            poll_interval: config.poll_interval,
        }
    }

    pub fn execute(&mut self) -> Result<SessionSummary, Box<dyn std::error::Error>> {
        const USED: &str = "Capture session already executed";
        let source = self.source.take().ok_or(USED)?;
        let display = self.display.take().ok_or(USED)?;
        let mut detector = self.detector.take().ok_or(USED)?;
        let renderer = self.renderer.take().ok_or(USED)?;

        let mut session = SessionGuard { source, display };
        let info: SourceInfo = match session.source.open() {
            Ok(info) => info,
            Err(e) => {
                log::warn!("Capture source unavailable, stopping: {e}");
                return Ok(SessionSummary {
                    frames_processed: 0,
                    detections_rendered: 0,
                    stop_reason: StopReason::EndOfStream,
                });
            }
        };
        self.logger.info(&format!(
            "Capture started: {}x{} @ {:.1} fps, press '{}' to quit",
            info.width, info.height, info.fps, self.quit_key
        ));
        session.display.open(&self.window_title)?;

        let mut counters = Counters::default();
        let stop_reason = loop {
            let state = self.step(&mut session, &mut *detector, &*renderer, &mut counters)?;
            if let LoopState::Stopped(reason) = state {
                break reason;
            }
        };
        drop(session);

        self.logger.info(&format!(
            "Capture stopped ({stop_reason:?}) after {} frames",
            counters.frames
        ));
        self.logger.summary();

        Ok(SessionSummary {
            frames_processed: counters.frames,
            detections_rendered: counters.detections,
            stop_reason,
        })
    }

    /// One iteration of the loop.
    fn step(
        &mut self,
        session: &mut SessionGuard,
        detector: &mut dyn FaceDetector,
        renderer: &dyn DetectionRenderer,
        counters: &mut Counters,
    ) -> Result<LoopState, Box<dyn std::error::Error>> {
        let mut frame = match session.source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                log::info!("Capture source has no more frames");
                return Ok(LoopState::Stopped(StopReason::EndOfStream));
            }
            Err(e) => {
                log::warn!("Frame read failed, stopping: {e}");
                return Ok(LoopState::Stopped(StopReason::EndOfStream));
            }
        };

        let t = Instant::now();
        let detections = detect_in_order(detector, &frame)?;
        self.logger.timing("detect", elapsed_ms(t));

        let t = Instant::now();
        for detection in &detections {
            renderer.draw(&mut frame, detection)?;
        }
        self.logger.timing("render", elapsed_ms(t));

        let t = Instant::now();
        session.display.show(&frame)?;
        self.logger.timing("show", elapsed_ms(t));

        counters.frames += 1;
        counters.detections += detections.len();
        self.logger.metric("faces", detections.len() as f64);
        self.logger.frame_processed(frame.index(), detections.len());

        match session.display.poll_key(self.poll_interval)? {
            Some(key) if key == self.quit_key => {
                log::info!("Quit key '{key}' pressed");
                Ok(LoopState::Stopped(StopReason::QuitRequested))
            }
            _ => Ok(LoopState::Running),
        }
    }
}

/// Runs the detector on a copy of `frame` in the channel order it expects,
/// leaving the original for rendering and display.
fn detect_in_order(
    detector: &mut dyn FaceDetector,
    frame: &Frame,
) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
    let order = detector.required_channel_order();
    if frame.channel_order() == order {
        detector.detect(frame)
    } else {
        detector.detect(&frame.to_channel_order(order))
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
