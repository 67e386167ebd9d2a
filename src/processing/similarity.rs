//! TF-IDF cosine similarity between a resume and a job description

use crate::processing::text_processor::{NormalizedText, TextProcessor};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Number of documents in the per-request corpus.
const CORPUS_SIZE: f64 = 2.0;

/// Vocabulary and weight vectors for one resume/job pair.
///
/// Built fresh for every comparison and dropped afterwards.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    vocabulary: BTreeMap<String, usize>,
    resume: Vec<f64>,
    job: Vec<f64>,
}

impl VectorSpace {
    pub fn build(resume_tokens: &[String], job_tokens: &[String]) -> Self {
        let resume_counts = term_counts(resume_tokens);
        let job_counts = term_counts(job_tokens);

        let terms: BTreeSet<&str> = resume_counts.keys().chain(job_counts.keys()).copied().collect();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let mut resume = vec![0.0; vocabulary.len()];
        let mut job = vec![0.0; vocabulary.len()];

        for (term, &idx) in &vocabulary {
            let in_resume = resume_counts.get(term.as_str()).copied().unwrap_or(0);
            let in_job = job_counts.get(term.as_str()).copied().unwrap_or(0);
            let df = (in_resume > 0) as usize + (in_job > 0) as usize;
            let idf = ((1.0 + CORPUS_SIZE) / (1.0 + df as f64)).ln() + 1.0;

            resume[idx] = in_resume as f64 * idf;
            job[idx] = in_job as f64 * idf;
        }

        Self { vocabulary, resume, job }
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine of the two vectors; 0 when either is all zeros.
    pub fn cosine(&self) -> f64 {
        cosine_similarity(&self.resume, &self.job)
    }
}

/// Semantic similarity in [0, 100].
pub fn semantic_similarity(
    processor: &TextProcessor,
    resume: &NormalizedText,
    job: &NormalizedText,
) -> f64 {
    let resume_tokens = processor.tokenize(resume.folded());
    let job_tokens = processor.tokenize(job.folded());
    let space = VectorSpace::build(&resume_tokens, &job_tokens);

    log::debug!("TF-IDF vocabulary size: {}", space.dimension());
    (space.cosine() * 100.0).clamp(0.0, 100.0)
}

pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn term_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}
