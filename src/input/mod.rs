//! Input processing module
//! Handles document kind detection, text extraction, and file loading

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use file_detector::{DocumentKind, RawDocument};
pub use manager::InputManager;
