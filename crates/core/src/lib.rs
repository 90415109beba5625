//! Live face detection on a camera feed.
//!
//! Domain traits for the capture source, face detector, overlay renderer
//! and display window, plus the loop that drives them. OpenCV-backed
//! camera and window implementations are behind the `opencv` feature.

pub mod capture;
pub mod detection;
pub mod display;
pub mod pipeline;
pub mod rendering;
pub mod shared;
