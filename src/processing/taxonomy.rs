//! Skill taxonomy: canonical skills, their aliases, and the phrase matcher

use crate::error::{Result, RemtchError};
use crate::processing::document::SkillSet;
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Version of the built-in skill table.
pub const TAXONOMY_VERSION: &str = "2025.1";

/// One canonical skill and the surface forms that resolve to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Immutable skill vocabulary shared by every request.
pub struct SkillTaxonomy {
    matcher: AhoCorasick,
    patterns: Vec<String>,
    pattern_entry: Vec<usize>,
    entries: Vec<SkillEntry>,
    canonical_ids: HashSet<String>,
    marker_regex: Regex,
    separator_regex: Regex,
    version: String,
}

impl SkillTaxonomy {
    /// Create the taxonomy from the built-in table
    pub fn new() -> Result<Self> {
        Self::with_custom_skills(Vec::new())
    }

    /// Create the taxonomy with additional entries. An entry whose canonical id
    /// already exists contributes its aliases to that skill.
    pub fn with_custom_skills(custom: Vec<SkillEntry>) -> Result<Self> {
        let mut entries: Vec<SkillEntry> = DEFAULT_SKILLS
            .iter()
            .map(|(canonical, aliases)| SkillEntry {
                canonical: canonical.to_string(),
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();

        let has_custom = !custom.is_empty();
        for entry in custom {
            let canonical = normalize_skill(&entry.canonical);
            if canonical.is_empty() {
                return Err(RemtchError::Taxonomy(
                    "custom skill has an empty canonical id".to_string(),
                ));
            }
            let mut aliases: Vec<String> = entry.aliases.iter().map(|a| normalize_skill(a)).collect();
            aliases.push(canonical.clone());

            match entries.iter_mut().find(|e| e.canonical == canonical) {
                Some(existing) => existing.aliases.extend(aliases),
                None => entries.push(SkillEntry { canonical, aliases }),
            }
        }

        let mut patterns = Vec::new();
        let mut pattern_entry = Vec::new();
        let mut owners: HashMap<String, usize> = HashMap::new();

        for (idx, entry) in entries.iter().enumerate() {
            for alias in &entry.aliases {
                let alias = normalize_skill(alias);
                if alias.is_empty() {
                    continue;
                }
                match owners.get(&alias) {
                    Some(&owner) if owner == idx => continue,
                    Some(&owner) => {
                        return Err(RemtchError::Taxonomy(format!(
                            "alias '{}' maps to both '{}' and '{}'",
                            alias, entries[owner].canonical, entry.canonical
                        )));
                    }
                    None => {
                        owners.insert(alias.clone(), idx);
                        patterns.push(alias);
                        pattern_entry.push(idx);
                    }
                }
            }
        }

        // Leftmost-longest lets "machine learning" win over "machine".
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| RemtchError::Taxonomy(format!("Failed to build skill matcher: {}", e)))?;

        let canonical_ids = entries.iter().map(|e| e.canonical.clone()).collect();

        let marker_regex = Regex::new(
            r"\b(?:proficient (?:in|with)|proficiency (?:in|with)|experience with|experienced (?:in|with)|knowledge of|familiar with|familiarity with|expertise in|skilled in|competent in|(?:technical )?skills\s*:|tools\s*:|technologies\s*:|tech stack\s*:)\s*((?:[^.;:!?]|\.\S)+)",
        )
        .map_err(|e| RemtchError::Taxonomy(format!("Invalid skill marker pattern: {}", e)))?;

        let separator_regex = Regex::new(r"\s*(?:,|;|/|\||&|\band\b|\bor\b)\s*")
            .map_err(|e| RemtchError::Taxonomy(format!("Invalid separator pattern: {}", e)))?;

        let version = if has_custom {
            format!("{}+custom", TAXONOMY_VERSION)
        } else {
            TAXONOMY_VERSION.to_string()
        };

        debug!(
            "Skill taxonomy {} built: {} skills, {} aliases",
            version,
            entries.len(),
            patterns.len()
        );

        Ok(Self {
            matcher,
            patterns,
            pattern_entry,
            entries,
            canonical_ids,
            marker_regex,
            separator_regex,
            version,
        })
    }

    /// Extract the skill set of a text, in first-occurrence order.
    pub fn extract(&self, text: &str) -> SkillSet {
        let folded = text.to_lowercase();

        let mut found: Vec<(usize, String)> = Vec::new();
        let mut matched_spans: Vec<Range<usize>> = Vec::new();

        for mat in self.matcher.find_iter(&folded) {
            if !on_word_boundary(&folded, mat.start(), mat.end()) {
                continue;
            }
            let entry = &self.entries[self.pattern_entry[mat.pattern().as_usize()]];
            found.push((mat.start(), entry.canonical.clone()));
            matched_spans.push(mat.start()..mat.end());
        }

        found.extend(self.find_literal_skills(&folded, &matched_spans));
        found.sort_by_key(|(position, _)| *position);

        SkillSet::from_ordered(found.into_iter().map(|(_, skill)| skill))
    }

    /// Skill-like fragments after markers such as "proficient in" that the
    /// table does not know. Fragments overlapping a table match are skipped.
    fn find_literal_skills(&self, folded: &str, matched_spans: &[Range<usize>]) -> Vec<(usize, String)> {
        let mut literals = Vec::new();

        for caps in self.marker_regex.captures_iter(folded) {
            let Some(list) = caps.get(1) else { continue };
            let base = list.start();
            let list_text = list.as_str();

            let mut fragments = Vec::new();
            let mut last = 0;
            for sep in self.separator_regex.find_iter(list_text) {
                fragments.push(last..sep.start());
                last = sep.end();
            }
            fragments.push(last..list_text.len());

            for fragment in fragments {
                let absolute = (base + fragment.start)..(base + fragment.end);
                if matched_spans.iter().any(|span| span.start < absolute.end && absolute.start < span.end) {
                    continue;
                }
                if let Some(literal) = self.literal_from_fragment(&list_text[fragment]) {
                    literals.push((absolute.start, literal));
                }
            }
        }

        literals
    }

    fn literal_from_fragment(&self, fragment: &str) -> Option<String> {
        let trimmed = fragment
            .trim()
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#');
        let words: Vec<&str> = trimmed.split_whitespace().collect();

        if words.is_empty() || words.len() > 3 {
            return None;
        }
        let length = trimmed.chars().count();
        if !(2..=30).contains(&length) {
            return None;
        }
        let first = words[0];
        let last = words[words.len() - 1];
        if !first.chars().any(|c| c.is_alphabetic()) {
            return None;
        }
        if FILLER_WORDS.contains(&first) || FILLER_WORDS.contains(&last) {
            return None;
        }
        if !is_skill_like(&words) {
            return None;
        }

        let literal = words.join(" ");
        if self.contains_canonical(&literal) {
            return None;
        }
        Some(literal)
    }

    /// Resolve a single surface form to its canonical id.
    pub fn canonicalize(&self, surface: &str) -> Option<&str> {
        let alias = normalize_skill(surface);
        self.patterns
            .iter()
            .position(|p| *p == alias)
            .map(|idx| self.entries[self.pattern_entry[idx]].canonical.as_str())
    }

    pub fn contains_canonical(&self, id: &str) -> bool {
        self.canonical_ids.contains(id)
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn skill_count(&self) -> usize {
        self.entries.len()
    }

    pub fn alias_count(&self) -> usize {
        self.patterns.len()
    }
}

/// Lowercase, trim and collapse inner whitespace.
pub fn normalize_skill(skill: &str) -> String {
    skill
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}

// A skill names a tool or field; "building scalable systems" is an activity.
fn is_skill_like(words: &[&str]) -> bool {
    if words.len() > 1 {
        let first = words[0];
        let gerund = first.len() >= 5 && first.ends_with("ing") && !ING_NOUNS.contains(&first);
        if gerund || ACTION_VERBS.contains(&first) {
            return false;
        }
    }
    !words.iter().any(|word| PROSE_WORDS.contains(word))
}

const ING_NOUNS: &[&str] = &["spring", "string", "bing", "ping", "ring"];

const ACTION_VERBS: &[&str] = &[
    "build", "builds", "built", "write", "writes", "wrote", "develop", "develops", "developed",
    "design", "designs", "designed", "create", "creates", "created", "manage", "manages",
    "managed", "lead", "leads", "led", "work", "works", "worked", "deliver", "delivers",
    "delivered", "maintain", "maintains", "maintained", "implement", "implements",
    "implemented", "improve", "improves", "improved", "drive", "drives", "own", "owns",
    "ship", "ships", "shipped", "scale", "solve", "solves", "collaborate", "communicate",
    "mentor", "support", "ensure", "help", "make", "deploy", "deployed",
];

const PROSE_WORDS: &[&str] = &[
    "scalable", "clean", "robust", "reliable", "efficient", "maintainable", "high-quality",
    "complex", "large", "large-scale", "distributed", "fast-paced", "cross-functional",
    "best", "practices", "principles", "systems", "system", "code", "solutions", "solution",
    "applications", "products", "product", "problems", "problem", "environment",
    "environments", "stakeholders", "communication", "projects", "processes", "things",
    "software", "features", "requirements", "customers", "people", "written", "verbal",
];

const FILLER_WORDS: &[&str] = &[
    "a", "an", "the", "of", "in", "on", "at", "to", "for", "with", "by", "as", "is", "are",
    "be", "and", "or", "our", "your", "their", "my", "its", "this", "that", "these", "those",
    "etc", "e.g", "i.e", "such", "like", "including", "include", "includes", "other", "others",
    "various", "related", "relevant", "similar", "many", "multiple", "several", "some", "all",
    "years", "year", "months", "experience", "knowledge", "skills", "skill", "tools", "tool",
    "technologies", "technology", "strong", "good", "great", "excellent", "solid", "proven",
    "deep", "basic", "advanced", "working", "hands-on", "modern", "plus", "required",
    "preferred", "candidate", "candidates", "ability", "team", "teams", "using", "use",
];

/// Built-in table: canonical id and every alias matched on word boundaries.
/// Short English words (go, r, rest, less, express) only match through
/// unambiguous aliases.
const DEFAULT_SKILLS: &[(&str, &[&str])] = &[
    // Programming languages
    ("python", &["python", "python3"]),
    ("java", &["java"]),
    ("javascript", &["javascript", "js", "java script", "ecmascript", "es6"]),
    ("typescript", &["typescript"]),
    ("c++", &["c++", "cpp"]),
    ("c#", &["c#", "csharp", "c sharp"]),
    ("go", &["golang", "go lang"]),
    ("rust", &["rust", "rustlang"]),
    ("sql", &["sql"]),
    ("html", &["html", "html5"]),
    ("css", &["css", "css3"]),
    ("php", &["php"]),
    ("ruby", &["ruby"]),
    ("swift", &["swift"]),
    ("kotlin", &["kotlin"]),
    ("scala", &["scala"]),
    ("r", &["r programming", "r language", "rstudio"]),
    ("matlab", &["matlab"]),
    ("bash", &["bash"]),
    ("shell scripting", &["shell", "shell scripting"]),
    ("powershell", &["powershell"]),
    // Frameworks & libraries
    ("react", &["react", "react.js", "reactjs"]),
    ("node.js", &["node.js", "nodejs", "node"]),
    ("django", &["django"]),
    ("flask", &["flask"]),
    ("fastapi", &["fastapi"]),
    ("spring", &["spring", "spring framework"]),
    ("spring boot", &["spring boot", "springboot"]),
    ("express", &["express.js", "expressjs"]),
    ("vue", &["vue", "vue.js", "vuejs"]),
    ("angular", &["angular", "angularjs"]),
    ("jquery", &["jquery"]),
    ("bootstrap", &["bootstrap"]),
    ("tailwind", &["tailwind", "tailwindcss", "tailwind css"]),
    ("sass", &["sass", "scss"]),
    ("less", &["less css"]),
    ("rails", &["rails", "ruby on rails"]),
    ("next.js", &["next.js", "nextjs"]),
    // Data & ML
    ("pandas", &["pandas"]),
    ("numpy", &["numpy"]),
    ("scikit-learn", &["scikit-learn", "scikit learn", "sklearn"]),
    ("tensorflow", &["tensorflow"]),
    ("pytorch", &["pytorch"]),
    ("keras", &["keras"]),
    ("machine learning", &["machine learning", "ml"]),
    ("deep learning", &["deep learning"]),
    ("natural language processing", &["natural language processing", "nlp"]),
    ("computer vision", &["computer vision"]),
    ("opencv", &["opencv"]),
    ("data analysis", &["data analysis", "data analytics"]),
    ("data engineering", &["data engineering"]),
    ("big data", &["big data"]),
    ("hadoop", &["hadoop"]),
    ("spark", &["spark", "apache spark", "pyspark"]),
    ("kafka", &["kafka", "apache kafka"]),
    ("airflow", &["airflow", "apache airflow"]),
    // DevOps & cloud
    ("docker", &["docker"]),
    ("kubernetes", &["kubernetes", "k8s"]),
    ("aws", &["aws", "amazon web services"]),
    ("azure", &["azure", "microsoft azure"]),
    ("gcp", &["gcp", "google cloud", "google cloud platform"]),
    ("ci/cd", &["ci/cd", "cicd", "ci cd", "continuous integration"]),
    ("jenkins", &["jenkins"]),
    ("gitlab ci", &["gitlab ci"]),
    ("github actions", &["github actions"]),
    ("terraform", &["terraform"]),
    ("ansible", &["ansible"]),
    ("puppet", &["puppet"]),
    ("chef", &["chef"]),
    ("nginx", &["nginx"]),
    // Databases
    ("mysql", &["mysql"]),
    ("postgresql", &["postgresql", "postgres"]),
    ("mongodb", &["mongodb", "mongo"]),
    ("redis", &["redis"]),
    ("elasticsearch", &["elasticsearch", "elastic search"]),
    ("oracle", &["oracle"]),
    ("sqlite", &["sqlite"]),
    ("cassandra", &["cassandra"]),
    ("dynamodb", &["dynamodb"]),
    // Tools & platforms
    ("git", &["git"]),
    ("github", &["github"]),
    ("gitlab", &["gitlab"]),
    ("bitbucket", &["bitbucket"]),
    ("jira", &["jira"]),
    ("confluence", &["confluence"]),
    ("slack", &["slack"]),
    ("trello", &["trello"]),
    ("figma", &["figma"]),
    ("adobe xd", &["adobe xd"]),
    ("postman", &["postman"]),
    ("swagger", &["swagger", "openapi"]),
    ("linux", &["linux"]),
    ("windows", &["windows"]),
    ("macos", &["macos", "mac os"]),
    // Other technical
    ("api", &["api", "apis"]),
    ("rest", &["restful", "rest api", "rest apis"]),
    ("graphql", &["graphql"]),
    ("grpc", &["grpc"]),
    ("json", &["json"]),
    ("xml", &["xml"]),
    ("yaml", &["yaml"]),
    ("microservices", &["microservices", "microservice"]),
    ("serverless", &["serverless"]),
    ("blockchain", &["blockchain"]),
    ("iot", &["iot", "internet of things"]),
    // Practices
    ("agile", &["agile"]),
    ("scrum", &["scrum"]),
    ("unit testing", &["unit testing", "unit tests"]),
    ("project management", &["project management"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_creation() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        assert!(taxonomy.skill_count() > 50);
        assert!(taxonomy.alias_count() >= taxonomy.skill_count());
        assert_eq!(taxonomy.version(), TAXONOMY_VERSION);
    }

    #[test]
    fn test_aliases_resolve_to_canonical() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract("Built SPAs in JS and ReactJS, deployed on K8s with Postgres.");

        assert_eq!(
            skills.as_slice(),
            &["javascript", "react", "kubernetes", "postgresql"]
        );
    }

    #[test]
    fn test_multi_word_alias_wins() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract("machine learning and java script");

        assert!(skills.contains("machine learning"));
        assert!(skills.contains("javascript"));
        assert!(!skills.contains("java"));
    }

    #[test]
    fn test_word_boundaries() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract("mysql administration, javascript, html");

        assert!(skills.contains("mysql"));
        assert!(!skills.contains("sql"));
        assert!(!skills.contains("java"));
        assert!(!skills.contains("machine learning"));
    }

    #[test]
    fn test_duplicates_counted_once() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract("Python, python3 and more PYTHON");
        assert_eq!(skills.as_slice(), &["python"]);
    }

    #[test]
    fn test_ambiguous_words_need_explicit_alias() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract("ready to go, the rest is less important");
        assert!(skills.is_empty());

        let skills = taxonomy.extract("services in golang exposing restful endpoints");
        assert_eq!(skills.as_slice(), &["go", "rest"]);
    }

    #[test]
    fn test_literal_skills_after_markers() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract("proficient in python, haskell and solidity. experience with ci/cd.");

        assert_eq!(skills.as_slice(), &["python", "haskell", "solidity", "ci/cd"]);
    }

    #[test]
    fn test_literals_reject_prose() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract(
            "experience with building scalable systems. proficient in rust and python. \
             knowledge of writing clean code. familiar with distributed systems.",
        );
        assert_eq!(skills.as_slice(), &["rust", "python"]);

        let skills = taxonomy.extract("experience with haskell, elixir and debugging.");
        assert_eq!(skills.as_slice(), &["haskell", "elixir", "debugging"]);
    }

    #[test]
    fn test_literals_skip_filler() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        let skills = taxonomy.extract("experience with the team and 5 years");
        assert!(skills.is_empty());
    }

    #[test]
    fn test_custom_skills_extend_table() {
        let custom = vec![
            SkillEntry {
                canonical: "Solidity".to_string(),
                aliases: vec!["sol".to_string()],
            },
            SkillEntry {
                canonical: "rust".to_string(),
                aliases: vec!["ferris lang".to_string()],
            },
        ];
        let taxonomy = SkillTaxonomy::with_custom_skills(custom).unwrap();

        assert!(taxonomy.version().ends_with("+custom"));
        assert_eq!(taxonomy.canonicalize("SOL"), Some("solidity"));
        assert_eq!(taxonomy.canonicalize("ferris lang"), Some("rust"));
        assert!(taxonomy.contains_canonical("solidity"));
    }

    #[test]
    fn test_conflicting_alias_is_rejected() {
        let custom = vec![SkillEntry {
            canonical: "jscript".to_string(),
            aliases: vec!["js".to_string()],
        }];
        let result = SkillTaxonomy::with_custom_skills(custom);
        assert!(matches!(result, Err(RemtchError::Taxonomy(_))));
    }

    #[test]
    fn test_builtin_table_has_no_conflicts() {
        let taxonomy = SkillTaxonomy::new().unwrap();
        for entry in taxonomy.entries() {
            for alias in &entry.aliases {
                assert_eq!(taxonomy.canonicalize(alias), Some(entry.canonical.as_str()));
            }
        }
    }
}
