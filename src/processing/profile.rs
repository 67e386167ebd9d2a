//! Candidate profile extraction from resume text

use crate::processing::document::CandidateProfile;
use crate::processing::taxonomy::SkillTaxonomy;
use crate::processing::text_processor::NormalizedText;
use regex::Regex;

/// Number of leading non-empty lines searched for the candidate name.
const NAME_SEARCH_LINES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Education,
    Experience,
    Certifications,
    Skills,
    Summary,
    Projects,
    Other,
}

const SECTION_HEADERS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Education,
        &[
            "education",
            "education and training",
            "educational background",
            "academic background",
            "academic history",
            "academics",
            "qualifications",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "employment",
            "employment history",
            "work history",
            "career history",
        ],
    ),
    (
        SectionKind::Certifications,
        &[
            "certifications",
            "certification",
            "certificates",
            "licenses",
            "licenses and certifications",
            "licenses & certifications",
            "certifications and licenses",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "key skills",
            "core competencies",
            "expertise",
            "areas of expertise",
            "technologies",
        ],
    ),
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "profile",
            "objective",
            "career objective",
            "about",
            "about me",
            "overview",
        ],
    ),
    (
        SectionKind::Projects,
        &["projects", "personal projects", "notable projects", "portfolio"],
    ),
    (
        SectionKind::Other,
        &[
            "contact",
            "contact information",
            "references",
            "awards",
            "achievements",
            "honors",
            "publications",
            "languages",
            "interests",
            "hobbies",
            "volunteer",
            "volunteering",
            "activities",
            "leadership",
        ],
    ),
];

const DOCUMENT_TITLES: &[&str] = &["resume", "résumé", "curriculum vitae", "cv"];

const BULLETS: &[char] = &['•', '◦', '▪', '‣', '●', '○', '■', '·', '-', '*', '>'];

/// A recognized section header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    pub kind: SectionKind,
    pub inline: Option<String>,
}

/// Pattern and section heuristics over the original-case resume text.
pub struct ProfileExtractor {
    email_regex: Regex,
    phone_regex: Regex,
    date_range_regex: Regex,
    leading_date_regex: Regex,
    name_max_tokens: usize,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ProfileExtractor {
    pub fn new(name_max_tokens: usize) -> Self {
        Self {
            email_regex: Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
                .expect("Invalid email regex"),
            phone_regex: Regex::new(r"\+?\(?\d[\d\-. ()]{5,}\d").expect("Invalid phone regex"),
            // 2019 - 2021, 01.2019 - 12.2021, 3/2018-11/2020
            date_range_regex: Regex::new(
                r"^(?:\d{1,2}[./-])?(?:19|20)\d{2}\s*-\s*(?:\d{1,2}[./-])?(?:19|20)\d{2}$",
            )
            .expect("Invalid date range regex"),
            leading_date_regex: Regex::new(
                r"^(?:\d{1,2}[./-])?(?:19|20)\d{2}(?:\s*-\s*(?:\d{1,2}[./-])?(?:19|20)\d{2})?\s+",
            )
            .expect("Invalid leading date regex"),
            name_max_tokens: name_max_tokens.max(2),
        }
    }

    /// Build the candidate profile. Skills come from the taxonomy over the
    /// folded text; every other field from the original-case lines.
    pub fn extract(&self, text: &NormalizedText, taxonomy: &SkillTaxonomy) -> CandidateProfile {
        let original = text.original();
        let (education, experience, certifications) = self.extract_sections(original);

        CandidateProfile {
            name: self.extract_name(original),
            email: self.extract_email(original),
            phone: self.extract_phone(original),
            skills: taxonomy.extract(text.folded()),
            education,
            experience,
            certifications,
        }
    }

    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';', ':', '-'])
                .to_string()
        })
    }

    /// First phone-like run with 7-15 digits that is not glued to other
    /// alphanumerics and is not a date range. A year or date range directly
    /// in front of the number is cut off.
    pub fn extract_phone(&self, text: &str) -> Option<String> {
        for line in text.lines() {
            for candidate in self.phone_regex.find_iter(line) {
                let before = line[..candidate.start()].chars().next_back();
                let after = line[candidate.end()..].chars().next();
                if before.is_some_and(|c| c.is_alphanumeric()) || after.is_some_and(|c| c.is_alphanumeric()) {
                    continue;
                }

                let mut raw = candidate.as_str().trim();
                if self.date_range_regex.is_match(raw) {
                    continue;
                }
                if let Some(date) = self.leading_date_regex.find(raw) {
                    raw = &raw[date.end()..];
                    if !raw.starts_with(|c: char| c.is_ascii_digit() || c == '+' || c == '(') {
                        continue;
                    }
                }

                let digits = raw.chars().filter(|c| c.is_ascii_digit()).count();
                if !(7..=15).contains(&digits) {
                    continue;
                }
                return Some(raw.to_string());
            }
        }
        None
    }

    /// The name sits above the first section header, within the leading lines.
    pub fn extract_name(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(NAME_SEARCH_LINES)
            .take_while(|line| detect_header(line).is_none())
            .find(|line| self.looks_like_name(line))
            .map(str::to_string)
    }

    fn looks_like_name(&self, line: &str) -> bool {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 || tokens.len() > self.name_max_tokens {
            return false;
        }
        if line.starts_with(|c: char| BULLETS.contains(&c) || c == '#') {
            return false;
        }
        if line.ends_with(':') || line.contains('@') || line.chars().any(|c| c.is_ascii_digit()) {
            return false;
        }
        if DOCUMENT_TITLES.contains(&line.to_lowercase().as_str()) || detect_header(line).is_some() {
            return false;
        }
        let wordlike = tokens.iter().all(|token| {
            token
                .chars()
                .all(|c| c.is_alphabetic() || matches!(c, '-' | '\'' | '.' | ','))
        });
        let capitalized = tokens
            .iter()
            .any(|token| token.chars().next().is_some_and(|c| c.is_uppercase()));

        wordlike && capitalized
    }

    /// Collect education, experience and certification entries. A section
    /// runs until the next header of any kind.
    pub fn extract_sections(&self, text: &str) -> (Vec<String>, Vec<String>, Vec<String>) {
        let mut education = Vec::new();
        let mut experience = Vec::new();
        let mut certifications = Vec::new();
        let mut current: Option<SectionKind> = None;

        for line in text.lines() {
            let entry = match detect_header(line) {
                Some(header) => {
                    current = Some(header.kind);
                    header.inline
                }
                None => {
                    let trimmed = strip_bullets(line);
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                }
            };

            let Some(entry) = entry else { continue };
            match current {
                Some(SectionKind::Education) => education.push(entry),
                Some(SectionKind::Experience) => experience.push(entry),
                Some(SectionKind::Certifications) => certifications.push(entry),
                _ => {}
            }
        }

        (education, experience, certifications)
    }
}

/// Recognize a section header line, case-insensitively.
pub fn detect_header(line: &str) -> Option<SectionHeader> {
    let stripped = strip_bullets(line);
    if stripped.is_empty() {
        return None;
    }

    let ends_with_colon = stripped.ends_with(':');
    let body = stripped.trim_end_matches(':').trim();
    let lower = body.to_lowercase();

    if let Some(kind) = header_kind(&lower) {
        return Some(SectionHeader { kind, inline: None });
    }

    // "Education: BSc Computer Science"
    if let Some((head, tail)) = stripped.split_once(':') {
        let tail = strip_bullets(tail);
        if let Some(kind) = header_kind(&head.trim().to_lowercase()) {
            if !tail.is_empty() {
                return Some(SectionHeader {
                    kind,
                    inline: Some(tail.to_string()),
                });
            }
        }
    }

    let has_letters = body.chars().any(|c| c.is_alphabetic());
    let all_upper = has_letters && !body.chars().any(|c| c.is_lowercase());
    if (all_upper || ends_with_colon) && body.split_whitespace().count() <= 6 {
        return header_prefix_kind(&lower).map(|kind| SectionHeader { kind, inline: None });
    }

    None
}

fn header_kind(lower: &str) -> Option<SectionKind> {
    SECTION_HEADERS
        .iter()
        .find(|(_, phrases)| phrases.contains(&lower))
        .map(|(kind, _)| *kind)
}

// Longest phrase the line starts with, on a word boundary.
fn header_prefix_kind(lower: &str) -> Option<SectionKind> {
    SECTION_HEADERS
        .iter()
        .flat_map(|(kind, phrases)| phrases.iter().map(move |phrase| (*kind, *phrase)))
        .filter(|(_, phrase)| {
            lower.starts_with(phrase)
                && !lower[phrase.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_alphanumeric())
        })
        .max_by_key(|(_, phrase)| phrase.len())
        .map(|(kind, _)| kind)
}

fn strip_bullets(line: &str) -> &str {
    line.trim()
        .trim_start_matches(|c: char| BULLETS.contains(&c) || c.is_whitespace())
        .trim()
}
