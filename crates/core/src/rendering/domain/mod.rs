pub mod detection_renderer;
