//! Value types produced by one match request

use serde::{Deserialize, Serialize};

/// Structured fields pulled from a resume. Missing scalars serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: SkillSet,
    pub education: Vec<String>,
    pub experience: Vec<String>,
    pub certifications: Vec<String>,
}

/// Canonical skill identifiers in first-occurrence order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillSet {
    skills: Vec<String>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from identifiers in document order; later repeats are dropped.
    pub fn from_ordered<I>(skills: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut set = Self::new();
        for skill in skills {
            set.insert(skill);
        }
        set
    }

    /// Returns false if the identifier was already present.
    pub fn insert(&mut self, skill: String) -> bool {
        if self.contains(&skill) {
            return false;
        }
        self.skills.push(skill);
        true
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.skills.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.skills
    }

    /// Identifiers present in both sets, sorted.
    pub fn intersection(&self, other: &SkillSet) -> Vec<String> {
        let mut shared: Vec<String> = self
            .skills
            .iter()
            .filter(|s| other.contains(s))
            .cloned()
            .collect();
        shared.sort();
        shared
    }

    /// Identifiers in `self` but not in `other`, sorted.
    pub fn difference(&self, other: &SkillSet) -> Vec<String> {
        let mut remaining: Vec<String> = self
            .skills
            .iter()
            .filter(|s| !other.contains(s))
            .cloned()
            .collect();
        remaining.sort();
        remaining
    }
}

impl FromIterator<String> for SkillSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self::from_ordered(iter)
    }
}

/// Response for one resume/job-description pair.
///
/// Field names are part of the external contract; consumers read these keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_profile: CandidateProfile,
    pub match_score: f64,
    pub skill_match_percentage: f64,
    pub semantic_similarity: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}
