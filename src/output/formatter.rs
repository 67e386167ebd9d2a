//! Output formatters for match results and parsed profiles

use crate::config::OutputFormat;
use crate::error::{Result, RemtchError};
use crate::processing::document::{CandidateProfile, MatchResult};
use colored::{Color, Colorize};
use std::path::Path;

/// Renders engine results in one output format
pub trait OutputFormatter {
    fn format_match(&self, result: &MatchResult) -> Result<String>;
    fn format_profile(&self, profile: &CandidateProfile) -> Result<String>;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON with the external field names
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter;

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "░",
        };
        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = score_band(score);
        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_profile_body(&self, profile: &CandidateProfile) -> String {
        let mut output = String::new();
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

        output.push_str(&format!("Name:  {}\n", self.colorize(&field(&profile.name), Color::Cyan)));
        output.push_str(&format!("Email: {}\n", field(&profile.email)));
        output.push_str(&format!("Phone: {}\n", field(&profile.phone)));

        if profile.skills.is_empty() {
            output.push_str("Skills: none detected\n");
        } else {
            let skills: Vec<&str> = profile.skills.iter().map(String::as_str).collect();
            output.push_str(&format!("Skills: {}\n", skills.join(", ")));
        }

        for (title, entries) in [
            ("Education", &profile.education),
            ("Experience", &profile.experience),
            ("Certifications", &profile.certifications),
        ] {
            if entries.is_empty() {
                continue;
            }
            output.push_str(&self.format_header(title, 3));
            for entry in entries {
                output.push_str(&format!("  • {}\n", entry));
            }
        }

        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_match(&self, result: &MatchResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("MATCH REPORT", 1));
        output.push_str(&format!(
            "Match Score: {:.2} {}\n",
            result.match_score,
            self.format_score_badge(result.match_score)
        ));
        output.push_str(&format!(
            "🎯 Skill match: {:.2}%\n🔍 Semantic similarity: {:.2}\n",
            result.skill_match_percentage, result.semantic_similarity
        ));

        output.push_str(&self.format_header("Skills", 2));
        if result.matched_skills.is_empty() {
            output.push_str("Matched: none\n");
        } else {
            output.push_str(&format!(
                "Matched: {}\n",
                self.colorize(&result.matched_skills.join(", "), Color::Green)
            ));
        }
        if result.missing_skills.is_empty() {
            output.push_str("Missing: none\n");
        } else {
            output.push_str(&format!(
                "Missing: {}\n",
                self.colorize(&result.missing_skills.join(", "), Color::Red)
            ));
        }

        output.push_str(&self.format_header("Candidate", 2));
        output.push_str(&self.format_profile_body(&result.candidate_profile));

        Ok(output)
    }

    fn format_profile(&self, profile: &CandidateProfile) -> Result<String> {
        let mut output = self.format_header("CANDIDATE PROFILE", 1);
        output.push_str(&self.format_profile_body(profile));
        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_match(&self, result: &MatchResult) -> Result<String> {
        self.render(result)
    }

    fn format_profile(&self, profile: &CandidateProfile) -> Result<String> {
        self.render(profile)
    }
}

impl MarkdownFormatter {
    fn markdown_score_badge(score: f64) -> &'static str {
        match score_band(score).0 {
            "EXCELLENT" => "🟢 Excellent",
            "GOOD" => "🟡 Good",
            "FAIR" => "🟠 Fair",
            _ => "🔴 Weak",
        }
    }

    fn profile_section(profile: &CandidateProfile) -> String {
        let mut output = String::new();
        let field = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| format!("`{}`", v))
                .unwrap_or_else(|| "_not found_".to_string())
        };

        output.push_str("| Field | Value |\n");
        output.push_str("|-------|-------|\n");
        output.push_str(&format!("| Name | {} |\n", field(&profile.name)));
        output.push_str(&format!("| Email | {} |\n", field(&profile.email)));
        output.push_str(&format!("| Phone | {} |\n\n", field(&profile.phone)));

        if !profile.skills.is_empty() {
            let skills: Vec<String> = profile.skills.iter().map(|s| format!("`{}`", s)).collect();
            output.push_str(&format!("**Skills:** {}\n\n", skills.join(", ")));
        }

        for (title, entries) in [
            ("Education", &profile.education),
            ("Experience", &profile.experience),
            ("Certifications", &profile.certifications),
        ] {
            if entries.is_empty() {
                continue;
            }
            output.push_str(&format!("### {}\n\n", title));
            for entry in entries {
                output.push_str(&format!("- {}\n", entry));
            }
            output.push('\n');
        }

        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_match(&self, result: &MatchResult) -> Result<String> {
        let mut output = String::new();

        output.push_str("# Match Report\n\n");
        output.push_str(&format!(
            "**Match Score:** {:.2} {}\n\n",
            result.match_score,
            Self::markdown_score_badge(result.match_score)
        ));

        output.push_str("| Component | Score | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        output.push_str(&format!(
            "| Skill match | {:.2}% | 70% |\n",
            result.skill_match_percentage
        ));
        output.push_str(&format!(
            "| Semantic similarity | {:.2} | 30% |\n\n",
            result.semantic_similarity
        ));

        output.push_str("## Skills\n\n");
        output.push_str("| Skill | Status |\n");
        output.push_str("|-------|--------|\n");
        for skill in &result.matched_skills {
            output.push_str(&format!("| {} | ✅ matched |\n", skill));
        }
        for skill in &result.missing_skills {
            output.push_str(&format!("| {} | ❌ missing |\n", skill));
        }
        output.push('\n');

        output.push_str("## Candidate Profile\n\n");
        output.push_str(&Self::profile_section(&result.candidate_profile));

        Ok(output)
    }

    fn format_profile(&self, profile: &CandidateProfile) -> Result<String> {
        let mut output = String::from("# Candidate Profile\n\n");
        output.push_str(&Self::profile_section(profile));
        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, true)
    }

    pub fn with_options(use_colors: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter,
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_match(&self, result: &MatchResult, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_match(result)
    }

    pub fn generate_profile(&self, profile: &CandidateProfile, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_profile(profile)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn score_band(score: f64) -> (&'static str, Color) {
    match score {
        s if s >= 80.0 => ("EXCELLENT", Color::Green),
        s if s >= 60.0 => ("GOOD", Color::Yellow),
        s if s >= 40.0 => ("FAIR", Color::BrightYellow),
        _ => ("WEAK", Color::Red),
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content).map_err(|e| {
        RemtchError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::SkillSet;

    fn sample_result() -> MatchResult {
        MatchResult {
            candidate_profile: CandidateProfile {
                name: Some("Jane Doe".to_string()),
                email: Some("jane@example.com".to_string()),
                skills: ["python", "java"].iter().map(|s| s.to_string()).collect::<SkillSet>(),
                education: vec!["BSc Computer Science".to_string()],
                ..Default::default()
            },
            match_score: 42.5,
            skill_match_percentage: 50.0,
            semantic_similarity: 25.0,
            matched_skills: vec!["python".to_string()],
            missing_skills: vec!["aws".to_string()],
        }
    }

    #[test]
    fn test_json_uses_external_keys() {
        let json = JsonFormatter::new(false).format_match(&sample_result()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["match_score"], 42.5);
        assert_eq!(value["candidate_profile"]["email"], "jane@example.com");
        assert!(value["candidate_profile"]["phone"].is_null());
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false).format_match(&sample_result()).unwrap();

        assert!(output.contains("Match Score: 42.50 [FAIR]"));
        assert!(output.contains("Matched: python"));
        assert!(output.contains("Missing: aws"));
        assert!(output.contains("  • BSc Computer Science"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_markdown_skill_table() {
        let output = MarkdownFormatter.format_match(&sample_result()).unwrap();

        assert!(output.starts_with("# Match Report"));
        assert!(output.contains("| python | ✅ matched |"));
        assert!(output.contains("| aws | ❌ missing |"));
        assert!(output.contains("| Phone | _not found_ |"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, true);
        let profile = sample_result().candidate_profile;

        let json = generator.generate_profile(&profile, OutputFormat::Json).unwrap();
        assert!(json.contains("\"skills\""));
        let md = generator.generate_profile(&profile, OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("# Candidate Profile"));
    }
}
