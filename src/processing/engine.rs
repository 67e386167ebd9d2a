//! Match engine coordinating extraction, profiling, similarity and fusion

use crate::config::Config;
use crate::error::{Result, RemtchError};
use crate::input::file_detector::{DocumentKind, RawDocument};
use crate::input::text_extractor::extract_text;
use crate::processing::document::{CandidateProfile, MatchResult, SkillSet};
use crate::processing::profile::ProfileExtractor;
use crate::processing::scoring;
use crate::processing::similarity::semantic_similarity;
use crate::processing::taxonomy::SkillTaxonomy;
use crate::processing::text_processor::{NormalizedText, TextProcessor};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Stateless scoring pipeline. Cloning is cheap and clones share the taxonomy.
#[derive(Clone)]
pub struct MatchEngine {
    taxonomy: Arc<SkillTaxonomy>,
    profile: Arc<ProfileExtractor>,
    processor: Arc<TextProcessor>,
    max_payload_bytes: usize,
}

impl MatchEngine {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self {
            taxonomy,
            profile: Arc::new(ProfileExtractor::default()),
            processor: Arc::new(TextProcessor::new()),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    /// Build the engine and its taxonomy from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let taxonomy = SkillTaxonomy::with_custom_skills(config.taxonomy.custom_skills.clone())?;
        info!(
            "Loaded skill taxonomy {} ({} skills)",
            taxonomy.version(),
            taxonomy.skill_count()
        );

        Ok(Self::new(Arc::new(taxonomy))
            .with_max_payload_bytes(config.extraction.max_payload_bytes)
            .with_name_max_tokens(config.profile.name_max_tokens))
    }

    pub fn with_max_payload_bytes(mut self, limit: usize) -> Self {
        self.max_payload_bytes = limit;
        self
    }

    pub fn with_name_max_tokens(mut self, max_tokens: usize) -> Self {
        self.profile = Arc::new(ProfileExtractor::new(max_tokens));
        self
    }

    pub fn taxonomy(&self) -> &SkillTaxonomy {
        &self.taxonomy
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// Score one resume against one job description.
    pub fn match_document(&self, resume: &RawDocument, job_description: &str) -> Result<MatchResult> {
        if job_description.trim().is_empty() {
            return Err(RemtchError::EmptyJobDescription);
        }

        let start_time = Instant::now();

        let resume_text = self.normalize_document(resume)?;
        let profile = self.profile.extract(&resume_text, &self.taxonomy);

        let job_text = self.processor.normalize(job_description);
        let job_skills = self.taxonomy.extract(job_text.folded());
        debug!(
            "Resume skills: {}, job skills: {}",
            profile.skills.len(),
            job_skills.len()
        );

        let semantic = semantic_similarity(&self.processor, &resume_text, &job_text);
        let result = scoring::fuse(profile, &job_skills, semantic);

        info!(
            "Match scored {:.2} (skills {:.2}%, similarity {:.2}) in {}ms",
            result.match_score,
            result.skill_match_percentage,
            result.semantic_similarity,
            start_time.elapsed().as_millis()
        );

        Ok(result)
    }

    /// Extract the candidate profile without scoring.
    pub fn parse_document(&self, resume: &RawDocument) -> Result<CandidateProfile> {
        let text = self.normalize_document(resume)?;
        Ok(self.profile.extract(&text, &self.taxonomy))
    }

    /// Skill set required by a job description.
    pub fn job_skills(&self, job_description: &str) -> Result<SkillSet> {
        if job_description.trim().is_empty() {
            return Err(RemtchError::EmptyJobDescription);
        }
        let job_text = self.processor.normalize(job_description);
        Ok(self.taxonomy.extract(job_text.folded()))
    }

    fn normalize_document(&self, document: &RawDocument) -> Result<NormalizedText> {
        let kind = document.kind()?;

        if document.len() > self.max_payload_bytes {
            return Err(RemtchError::PayloadTooLarge {
                size: document.len(),
                limit: self.max_payload_bytes,
            });
        }

        let mut raw = extract_text(kind, document.bytes())?;
        if kind == DocumentKind::Pdf {
            raw = self.processor.strip_pdf_artifacts(&raw);
        }
        debug!("Extracted {} characters from {} document", raw.chars().count(), kind);

        Ok(self.processor.normalize(&raw))
    }
}
