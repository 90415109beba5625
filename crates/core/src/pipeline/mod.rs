pub mod live_capture_config;
pub mod live_capture_use_case;
pub mod pipeline_logger;
