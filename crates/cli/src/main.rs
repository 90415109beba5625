use std::path::PathBuf;
use std::process;

use clap::Parser;

use facewatch_core::capture::infrastructure::opencv_camera::OpencvCamera;
use facewatch_core::detection::domain::face_detector::FaceDetector;
use facewatch_core::detection::domain::model_variant::ModelVariant;
use facewatch_core::detection::infrastructure::model_resolver::{self, ModelLocations};
use facewatch_core::detection::infrastructure::onnx_blazeface_detector::OnnxBlazefaceDetector;
use facewatch_core::display::infrastructure::highgui_window::HighguiWindow;
use facewatch_core::pipeline::live_capture_config::LiveCaptureConfig;
use facewatch_core::pipeline::live_capture_use_case::LiveCaptureUseCase;
use facewatch_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use facewatch_core::rendering::infrastructure::overlay_renderer::OverlayRenderer;
use facewatch_core::shared::constants::{DEFAULT_CAMERA_INDEX, DEFAULT_CONFIDENCE, MODEL_DIR_ENV};

/// Live face detection on a local camera. Press 'q' in the window to quit.
#[derive(Parser)]
#[command(name = "facewatch")]
struct Cli {
    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: i32,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Detection model: short-range (fast, faces within ~2m) or full-range.
    #[arg(long, default_value_t = ModelVariant::ShortRange)]
    model_variant: ModelVariant,

    /// Path to the BlazeFace ONNX model (defaults to the model cache).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Download the model from this URL when it is not cached.
    #[arg(long)]
    model_url: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = session_config(&cli);
    config.validate()?;

    let detector = build_detector(&cli, &config)?;

    let mut use_case = LiveCaptureUseCase::new(
        Box::new(OpencvCamera::new(config.camera_index)),
        detector,
        Box::new(OverlayRenderer::default()),
        Box::new(HighguiWindow::new()),
        &config,
        Some(Box::new(StdoutPipelineLogger::default())),
    );
    let summary = use_case.execute()?;
    log::info!(
        "Stopped ({:?}): {} frames, {} faces drawn",
        summary.stop_reason,
        summary.frames_processed,
        summary.detections_rendered
    );
    Ok(())
}

fn session_config(cli: &Cli) -> LiveCaptureConfig {
    LiveCaptureConfig {
        camera_index: cli.camera,
        confidence: cli.confidence,
        model_variant: cli.model_variant,
        ..Default::default()
    }
}

fn build_detector(
    cli: &Cli,
    config: &LiveCaptureConfig,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    let name = config.model_variant.model_name();
    log::info!("Resolving model: {name}");

    let bundled_dir = std::env::var_os(MODEL_DIR_ENV).map(PathBuf::from);
    let downloading = cli.model.is_none() && cli.model_url.is_some();
    let model_path = model_resolver::resolve(
        name,
        ModelLocations {
            explicit: cli.model.as_deref(),
            bundled_dir: bundled_dir.as_deref(),
            url: cli.model_url.as_deref(),
            ..Default::default()
        },
        Some(Box::new(download_progress)),
    )?;
    if downloading {
        eprintln!();
    }

    Ok(Box::new(OnnxBlazefaceDetector::new(
        &model_path,
        config.model_variant,
        config.confidence,
    )?))
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["facewatch"]).unwrap();
        assert_eq!(cli.camera, 0);
        assert!((cli.confidence - 0.6).abs() < f64::EPSILON);
        assert_eq!(cli.model_variant, ModelVariant::ShortRange);
        assert!(cli.model.is_none());
    }

    #[test]
    fn test_parses_overrides() {
        let cli = Cli::try_parse_from([
            "facewatch",
            "--camera",
            "2",
            "--confidence",
            "0.8",
            "--model-variant",
            "full-range",
        ])
        .unwrap();
        assert_eq!(cli.camera, 2);
        assert_eq!(cli.model_variant, ModelVariant::FullRange);
    }

    #[test]
    fn test_session_config_keeps_fixed_defaults() {
        let cli = Cli::try_parse_from(["facewatch", "--camera", "1"]).unwrap();
        let config = session_config(&cli);
        let defaults = LiveCaptureConfig::default();
        assert_eq!(config.camera_index, 1);
        assert_eq!(config.window_title, defaults.window_title);
        assert_eq!(config.quit_key, defaults.quit_key);
        assert_eq!(config.poll_interval, defaults.poll_interval);
    }

    #[test]
    fn test_rejects_unknown_variant() {
        assert!(Cli::try_parse_from(["facewatch", "--model-variant", "tiny"]).is_err());
    }
}
