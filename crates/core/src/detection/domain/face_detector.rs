use crate::shared::detection::Detection;
use crate::shared::frame::{ChannelOrder, Frame};

/// Domain interface for face detection.
///
/// Implementations may hold inference sessions or scratch buffers,
/// hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;

    /// Channel order the detector expects its input frames in.
    fn required_channel_order(&self) -> ChannelOrder {
        ChannelOrder::Rgb
    }
}
