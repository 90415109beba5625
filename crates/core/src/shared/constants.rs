use std::time::Duration;

pub const SHORT_RANGE_MODEL_NAME: &str = "face_detection_short_range.onnx";
pub const FULL_RANGE_MODEL_NAME: &str = "face_detection_full_range.onnx";

/// Environment variable naming a directory of pre-packaged models.
pub const MODEL_DIR_ENV: &str = "FACEWATCH_MODEL_DIR";

pub const DEFAULT_CAMERA_INDEX: i32 = 0;
pub const DEFAULT_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_WINDOW_TITLE: &str = "Face Detection";
pub const DEFAULT_QUIT_KEY: char = 'q';
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);
