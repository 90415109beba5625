use crate::shared::frame::{ChannelOrder, Frame};

/// Properties of an opened capture source.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    /// Nominal frame rate; 0.0 when the backend does not report one.
    pub fps: f64,
    pub channel_order: ChannelOrder,
}

/// Pulls frames from a camera or video stream.
///
/// Implementations handle device and backend details while the loop works
/// with the abstract `Frame` type.
pub trait FrameSource: Send {
    /// Opens the underlying device and returns its properties.
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>>;

    /// Blocks until the next frame is available.
    ///
    /// `Ok(None)` signals that no more frames will arrive.
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device.
    fn close(&mut self);
}
