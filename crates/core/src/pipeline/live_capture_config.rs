use std::time::Duration;

use crate::detection::domain::model_variant::ModelVariant;
use crate::shared::constants::{
    DEFAULT_CAMERA_INDEX, DEFAULT_CONFIDENCE, DEFAULT_POLL_INTERVAL, DEFAULT_QUIT_KEY,
    DEFAULT_WINDOW_TITLE,
};

/// Settings for one live capture session.
///
/// `camera_index`, `confidence` and `model_variant` are consumed when the
/// capture source and detector are built; the loop itself reads the
/// window title, quit key and poll interval.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveCaptureConfig {
    pub camera_index: i32,
    pub confidence: f64,
    pub model_variant: ModelVariant,
    pub window_title: String,
    pub quit_key: char,
    pub poll_interval: Duration,
}

impl Default for LiveCaptureConfig {
    fn default() -> Self {
        Self {
            camera_index: DEFAULT_CAMERA_INDEX,
            confidence: DEFAULT_CONFIDENCE,
            model_variant: ModelVariant::default(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            quit_key: DEFAULT_QUIT_KEY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl LiveCaptureConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.camera_index < 0 {
            return Err(format!(
                "Camera index must be non-negative, got {}",
                self.camera_index
            ));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            ));
        }
        if self.poll_interval.is_zero() {
            return Err("Poll interval must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = LiveCaptureConfig::default();
        assert_eq!(config.camera_index, 0);
        assert_relative_eq!(config.confidence, 0.6);
        assert_eq!(config.model_variant, ModelVariant::ShortRange);
        assert_eq!(config.quit_key, 'q');
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::negative_camera(LiveCaptureConfig { camera_index: -1, ..Default::default() })]
    #[case::confidence_too_high(LiveCaptureConfig { confidence: 1.5, ..Default::default() })]
    #[case::confidence_negative(LiveCaptureConfig { confidence: -0.1, ..Default::default() })]
    #[case::zero_poll(LiveCaptureConfig { poll_interval: Duration::ZERO, ..Default::default() })]
    fn test_validate_rejects(#[case] config: LiveCaptureConfig) {
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    fn test_validate_accepts_confidence_bounds(#[case] confidence: f64) {
        let config = LiveCaptureConfig {
            confidence,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
