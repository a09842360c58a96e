pub mod context;
pub mod log_capture;
