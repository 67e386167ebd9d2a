//! Score fusion and skill diff

use crate::processing::document::{CandidateProfile, MatchResult, SkillSet};

/// Weight of the skill overlap in the final score.
pub const SKILL_WEIGHT: f64 = 0.7;
/// Weight of the TF-IDF similarity in the final score.
pub const SEMANTIC_WEIGHT: f64 = 0.3;

/// Percentage of job skills the resume covers; 100 when the job lists none.
pub fn skill_match_percentage(matched: usize, required: usize) -> f64 {
    if required == 0 {
        return 100.0;
    }
    (100.0 * matched as f64 / required as f64).clamp(0.0, 100.0)
}

pub fn combined_score(skill_percentage: f64, semantic_similarity: f64) -> f64 {
    (SKILL_WEIGHT * skill_percentage + SEMANTIC_WEIGHT * semantic_similarity).clamp(0.0, 100.0)
}

/// Round to two decimals for output.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Combine the profile, the job skill set and the similarity into the result.
pub fn fuse(profile: CandidateProfile, job_skills: &SkillSet, semantic_similarity: f64) -> MatchResult {
    let matched_skills = job_skills.intersection(&profile.skills);
    let missing_skills = job_skills.difference(&profile.skills);

    let skill_percentage = skill_match_percentage(matched_skills.len(), job_skills.len());
    let semantic = semantic_similarity.clamp(0.0, 100.0);
    let match_score = combined_score(skill_percentage, semantic);

    MatchResult {
        candidate_profile: profile,
        match_score: round2(match_score),
        skill_match_percentage: round2(skill_percentage),
        semantic_similarity: round2(semantic),
        matched_skills,
        missing_skills,
    }
}
