use std::time::Duration;

use crate::shared::frame::Frame;

/// A window that presents frames and reports key presses.
pub trait DisplaySurface: Send {
    fn open(&mut self, title: &str) -> Result<(), Box<dyn std::error::Error>>;

    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Waits at most `wait` for a key press.
    fn poll_key(&mut self, wait: Duration) -> Result<Option<char>, Box<dyn std::error::Error>>;

    fn close(&mut self);
}
