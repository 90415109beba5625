use crate::shared::detection::Detection;
use crate::shared::frame::Frame;

/// Domain interface for drawing a detection overlay onto a frame.
///
/// Implementations modify the frame in-place (`&mut Frame`).
pub trait DetectionRenderer: Send {
    fn draw(&self, frame: &mut Frame, detection: &Detection)
        -> Result<(), Box<dyn std::error::Error>>;
}
