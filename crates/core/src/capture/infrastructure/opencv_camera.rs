use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use thiserror::Error;

use crate::capture::domain::frame_source::{FrameSource, SourceInfo};
use crate::shared::frame::{ChannelOrder, Frame};

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("could not open camera #{index}")]
    Open { index: i32 },
    #[error("camera is not open")]
    NotOpen,
    #[error("unsupported frame layout: {channels} channels")]
    Layout { channels: i32 },
    #[error(transparent)]
    Backend(#[from] opencv::Error),
}

/// Reads BGR frames from a local camera through OpenCV's `videoio`.
pub struct OpencvCamera {
    index: i32,
    capture: Option<VideoCapture>,
    buffer: Mat,
    next_frame: usize,
}

impl OpencvCamera {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            capture: None,
            buffer: Mat::default(),
            next_frame: 0,
        }
    }

    fn open_capture(&self) -> Result<VideoCapture, CaptureError> {
        let capture = VideoCapture::new(self.index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(CaptureError::Open { index: self.index });
        }
        Ok(capture)
    }
}

impl FrameSource for OpencvCamera {
    fn open(&mut self) -> Result<SourceInfo, Box<dyn std::error::Error>> {
        let capture = self.open_capture()?;
        let info = SourceInfo {
            width: capture.get(videoio::CAP_PROP_FRAME_WIDTH)?.max(0.0) as u32,
            height: capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?.max(0.0) as u32,
            fps: capture.get(videoio::CAP_PROP_FPS)?.max(0.0),
            channel_order: ChannelOrder::Bgr,
        };
        log::info!(
            "Opened camera #{} ({}x{} @ {:.1} fps)",
            self.index,
            info.width,
            info.height,
            info.fps
        );
        self.capture = Some(capture);
        self.next_frame = 0;
        Ok(info)
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let capture = self.capture.as_mut().ok_or(CaptureError::NotOpen)?;
        if !capture.read(&mut self.buffer)? || self.buffer.empty() {
            return Ok(None);
        }

        let channels = self.buffer.channels();
        if channels != 3 {
            return Err(CaptureError::Layout { channels }.into());
        }
        let width = self.buffer.cols() as u32;
        let height = self.buffer.rows() as u32;
        let data = if self.buffer.is_continuous() {
            self.buffer.data_bytes()?.to_vec()
        } else {
            self.buffer.try_clone()?.data_bytes()?.to_vec()
        };

        let frame = Frame::new(data, width, height, 3, ChannelOrder::Bgr, self.next_frame);
        self.next_frame += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                log::warn!("Failed to release camera #{}: {e}", self.index);
            }
            log::debug!("Released camera #{}", self.index);
        }
    }
}

impl Drop for OpencvCamera {
    fn drop(&mut self) {
        self.close();
    }
}
