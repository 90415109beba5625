use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for capture-loop events.
///
/// Keeps the loop free of any particular output mechanism; the binary logs
/// through the `log` crate while tests discard everything.
pub trait PipelineLogger: Send {
    /// A frame went through detect → render → show.
    fn frame_processed(&mut self, frame_index: usize, detections: usize);

    /// How long a named stage took for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A point-in-time metric.
    fn metric(&mut self, name: &str, value: f64);

    fn info(&mut self, message: &str);

    /// End-of-session report. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn frame_processed(&mut self, _frame_index: usize, _detections: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Running totals for one stage or metric.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stat {
    pub count: usize,
    pub total: f64,
    pub max: f64,
}

impl Stat {
    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total += value;
        if value > self.max {
            self.max = value;
        }
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Logs through the `log` crate and keeps per-stage statistics for the
/// end-of-session summary.
///
/// A live feed has no known length, so progress is reported every
/// `throttle_frames` frames instead of as a percentage.
pub struct StdoutPipelineLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Stat>,
    metrics: BTreeMap<String, Stat>,
    start_time: Instant,
    frames: usize,
    detections: usize,
}

impl StdoutPipelineLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames: 0,
            detections: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn timing_stat(&self, stage: &str) -> Option<&Stat> {
        self.timings.get(stage)
    }

    pub fn metric_stat(&self, name: &str) -> Option<&Stat> {
        self.metrics.get(name)
    }

    /// Returns the formatted summary, or `None` if nothing was processed.
    pub fn summary_string(&self) -> Option<String> {
        if self.frames == 0 && self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Session summary ({} frames, {} faces, {elapsed_s:.1}s):",
            self.frames, self.detections
        )];

        for (stage, stat) in &self.timings {
            lines.push(format!(
                "  {stage:8}: avg {:6.1}ms  max {:6.1}ms",
                stat.mean(),
                stat.max
            ));
        }
        for (name, stat) in &self.metrics {
            lines.push(format!("  {name}: avg {:.1}  max {:.1}", stat.mean(), stat.max));
        }
        if self.frames > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.frames as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for StdoutPipelineLogger {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn frame_processed(&mut self, frame_index: usize, detections: usize) {
        self.frames += 1;
        self.detections += detections;
        if self.frames % self.throttle_frames == 0 {
            log::info!(
                "Processed {} frames (last #{frame_index}, {detections} faces)",
                self.frames
            );
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}
