pub mod highgui_window;
