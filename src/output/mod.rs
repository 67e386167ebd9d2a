//! Output formatting and report saving

pub mod formatter;

pub use formatter::{OutputFormatter, ReportGenerator};
