use std::time::Duration;

use opencv::core::{Mat, Scalar, CV_8UC3};
use opencv::highgui;
use opencv::prelude::*;

use crate::display::domain::display_surface::DisplaySurface;
use crate::shared::frame::{ChannelOrder, Frame};

/// OpenCV `highgui` window.
///
/// `highgui` expects BGR, so RGB frames are converted before display.
#[derive(Default)]
pub struct HighguiWindow {
    title: Option<String>,
}

impl HighguiWindow {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for HighguiWindow {
    fn open(&mut self, title: &str) -> Result<(), Box<dyn std::error::Error>> {
        highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;
        self.title = Some(title.to_string());
        Ok(())
    }

    fn show(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let title = self.title.as_deref().ok_or("Window is not open")?;
        if frame.channels() != 3 {
            return Err(format!("Cannot display {}-channel frame", frame.channels()).into());
        }
        let bgr = frame.to_channel_order(ChannelOrder::Bgr);
        let mut mat = Mat::new_rows_cols_with_default(
            frame.height() as i32,
            frame.width() as i32,
            CV_8UC3,
            Scalar::all(0.0),
        )?;
        mat.data_bytes_mut()?.copy_from_slice(bgr.data());
        highgui::imshow(title, &mat)?;
        Ok(())
    }

    fn poll_key(&mut self, wait: Duration) -> Result<Option<char>, Box<dyn std::error::Error>> {
        let delay = (wait.as_millis() as i32).max(1);
        let key = highgui::wait_key(delay)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(Some(char::from((key & 0xFF) as u8)))
    }

    fn close(&mut self) {
        if self.title.take().is_some() {
            if let Err(e) = highgui::destroy_all_windows() {
                log::warn!("Failed to close display window: {e}");
            }
        }
    }
}

impl Drop for HighguiWindow {
    fn drop(&mut self) {
        self.close();
    }
}
