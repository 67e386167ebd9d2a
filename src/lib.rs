//! Resume-to-job match scoring library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{ErrorKind, ErrorResponse, RemtchError, Result};
pub use input::{DocumentKind, RawDocument};
pub use processing::document::{CandidateProfile, MatchResult, SkillSet};
pub use processing::taxonomy::{SkillEntry, SkillTaxonomy};
pub use processing::MatchEngine;
