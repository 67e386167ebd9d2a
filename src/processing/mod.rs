//! Text processing and match scoring

pub mod document;
pub mod engine;
pub mod profile;
pub mod scoring;
pub mod similarity;
pub mod taxonomy;
pub mod text_processor;

pub use engine::MatchEngine;
