//! Integration tests for the match engine and its input pipeline

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use remtch::config::{Config, OutputFormat};
use remtch::input::{DocumentKind, InputManager, RawDocument};
use remtch::processing::MatchEngine;
use remtch::{ErrorKind, RemtchError, SkillEntry, SkillTaxonomy};
use std::path::Path;
use std::sync::Arc;

fn engine() -> MatchEngine {
    MatchEngine::new(Arc::new(SkillTaxonomy::new().unwrap()))
}

/// Build a PDF with one page per entry; `corrupt` pages get an undecodable content stream.
fn build_pdf(pages: &[Vec<String>], corrupt: &[usize]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (index, lines) in pages.iter().enumerate() {
        let content_id = if corrupt.contains(&index) {
            doc.add_object(Stream::new(
                dictionary! { "Filter" => "FlateDecode" },
                vec![0x78, 0x9c, 0xff, 0x00, 0x13, 0x37, 0xde, 0xad, 0xbe, 0xef],
            ))
        } else {
            let mut operations = Vec::new();
            for (line_no, line) in lines.iter().enumerate() {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(11)],
                ));
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Integer(50), Object::Integer(780 - 14 * line_no as i64)],
                ));
                operations.push(Operation::new("Tj", vec![Object::string_literal(line.as_str())]));
                operations.push(Operation::new("ET", vec![]));
            }
            let content = Content { operations };
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()))
        };

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_scenario_resume_against_job() {
    let resume = RawDocument::text("Proficient in Python, Java, and SQL. Contact: jane@example.com.");
    let result = engine()
        .match_document(&resume, "Looking for a candidate skilled in Python and AWS.")
        .unwrap();

    assert!(result.matched_skills.contains(&"python".to_string()));
    assert!(result.missing_skills.contains(&"aws".to_string()));
    assert_eq!(result.candidate_profile.email.as_deref(), Some("jane@example.com"));
    assert_eq!(result.skill_match_percentage, 50.0);
}

#[test]
fn test_empty_job_description_skips_parsing() {
    let invalid_pdf = RawDocument::pdf(b"%PDF-1.7 truncated garbage".to_vec());
    let err = engine().match_document(&invalid_pdf, "").unwrap_err();

    assert!(matches!(err, RemtchError::EmptyJobDescription));
    assert_eq!(err.to_response().kind, ErrorKind::EmptyJobDescription);
}

#[test]
fn test_corrupted_page_is_skipped() {
    let mut pages = vec![lines(&[
        "Jane Doe",
        "jane.doe@example.com",
        "Skills: Rust, Kafka, PostgreSQL",
        "Experience",
    ])];
    for n in 2..=50 {
        pages.push(vec![format!("Project {} streaming pipeline in Rust with Kafka", n)]);
    }

    // page 30 is index 29
    let bytes = build_pdf(&pages, &[29]);
    let result = engine()
        .match_document(&RawDocument::pdf(bytes), "Rust engineer with Kafka and Kubernetes")
        .unwrap();
    let profile = &result.candidate_profile;

    assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
    assert_eq!(profile.email.as_deref(), Some("jane.doe@example.com"));
    assert!(profile.skills.contains("rust"));
    assert!(profile.skills.contains("postgresql"));
    assert!(profile.experience.iter().any(|e| e.contains("Project 50")));
    assert_eq!(result.matched_skills, vec!["kafka", "rust"]);
    assert_eq!(result.missing_skills, vec!["kubernetes"]);
}

#[test]
fn test_pdf_and_text_agree() {
    let text = ["Alex Kim", "alex@example.org", "Skills: Go, Terraform and AWS"];
    let pdf = build_pdf(&[lines(&text)], &[]);
    let engine = engine();

    let from_pdf = engine.parse_document(&RawDocument::pdf(pdf)).unwrap();
    let from_text = engine.parse_document(&RawDocument::text(text.join("\n"))).unwrap();

    assert_eq!(from_pdf.email, from_text.email);
    assert_eq!(from_pdf.skills, from_text.skills);
}

#[test]
fn test_score_properties() {
    let engine = engine();
    let pairs = [
        ("Rust, Python and Docker engineer", "Looking for Python and Kubernetes"),
        ("", "Java developer"),
        ("Senior accountant with Excel", "Gardener wanted"),
        ("machine learning with pytorch and pandas", "ML engineer: PyTorch, pandas, numpy, AWS"),
    ];

    for (resume, job) in pairs {
        let result = engine.match_document(&RawDocument::text(resume), job).unwrap();
        let job_skills = engine.job_skills(job).unwrap();

        for score in [result.match_score, result.skill_match_percentage, result.semantic_similarity] {
            assert!((0.0..=100.0).contains(&score), "score {} out of range", score);
        }
        assert!(result.matched_skills.iter().all(|s| !result.missing_skills.contains(s)));

        let mut union: Vec<String> = result
            .matched_skills
            .iter()
            .chain(&result.missing_skills)
            .cloned()
            .collect();
        union.sort();
        let mut expected: Vec<String> = job_skills.iter().cloned().collect();
        expected.sort();
        assert_eq!(union, expected);
    }
}

#[test]
fn test_job_without_skills_is_full_skill_match() {
    let result = engine()
        .match_document(&RawDocument::text("Rust developer"), "Friendly team, great snacks")
        .unwrap();
    assert_eq!(result.skill_match_percentage, 100.0);
}

#[test]
fn test_identical_and_disjoint_similarity() {
    let engine = engine();
    let text = "Backend engineer building payment services with Rust and PostgreSQL";

    let same = engine.match_document(&RawDocument::text(text), text).unwrap();
    assert_eq!(same.semantic_similarity, 100.0);
    assert_eq!(same.match_score, 100.0);

    let disjoint = engine
        .match_document(&RawDocument::text("watercolor painting"), "forklift operator")
        .unwrap();
    assert_eq!(disjoint.semantic_similarity, 0.0);
}

#[test]
fn test_byte_identical_output() {
    let engine = engine();
    let resume = RawDocument::text("Jane Doe\nExperience with Spark, Airflow and dbt\nEDUCATION\nMSc Statistics");
    let job = "Data engineer: Spark, Kafka, dbt";

    let first = serde_json::to_vec(&engine.match_document(&resume, job).unwrap()).unwrap();
    let second = serde_json::to_vec(&engine.match_document(&resume, job).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_requests_share_taxonomy() {
    let engine = engine();
    let resume = RawDocument::text("Python and SQL analyst");
    let expected = engine.match_document(&resume, "Python, SQL, Tableau").unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        let resume = resume.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            engine.match_document(&resume, "Python, SQL, Tableau")
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), expected);
    }
}

#[tokio::test]
async fn test_fixture_match() {
    let manager = InputManager::new(Config::default().extraction.max_payload_bytes);
    let resume = manager
        .load(Path::new("tests/fixtures/sample_resume.txt"), None)
        .await
        .unwrap();
    let job = manager
        .load_text(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();

    let result = engine().match_document(&resume, &job).unwrap();
    let profile = &result.candidate_profile;

    assert_eq!(profile.name.as_deref(), Some("John Doe"));
    assert_eq!(profile.email.as_deref(), Some("john.doe@example.com"));
    assert_eq!(profile.phone.as_deref(), Some("(555) 987-6543"));
    assert_eq!(profile.education, vec!["B.S. Computer Science, University of Washington"]);
    assert_eq!(profile.experience.len(), 2);
    assert_eq!(profile.certifications, vec!["AWS Certified Developer - Associate"]);

    assert_eq!(result.matched_skills, vec!["aws", "node.js", "postgresql", "react"]);
    assert_eq!(result.missing_skills, vec!["graphql", "kubernetes"]);
    assert_eq!(result.skill_match_percentage, 66.67);
}

#[tokio::test]
async fn test_markdown_resume_fixture() {
    let manager = InputManager::new(Config::default().extraction.max_payload_bytes);
    let resume = manager
        .load(Path::new("tests/fixtures/sample_resume.md"), None)
        .await
        .unwrap();

    let result = engine()
        .match_document(&resume, "Proficient in Rust and Python. Experience with building scalable systems.")
        .unwrap();
    let profile = &result.candidate_profile;

    assert_eq!(profile.name.as_deref(), Some("Jane Doe"));
    assert_eq!(profile.email.as_deref(), Some("jane.doe@example.com"));
    assert_eq!(profile.phone.as_deref(), Some("555-123-4567"));
    assert_eq!(profile.education, vec!["BSc Computer Science, MIT"]);
    assert_eq!(
        profile.experience,
        vec![
            "Acme GmbH, Backend Engineer, 01.2019 - 12.2021",
            "Initech, Data Engineer, 2016 - 2018",
        ]
    );
    assert!(profile.skills.contains("postgresql"));
    assert_eq!(result.matched_skills, vec!["python", "rust"]);
    assert_eq!(result.skill_match_percentage, 100.0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let manager = InputManager::new(1024);
    let err = manager
        .load(Path::new("tests/fixtures/unsupported.xyz"), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnsupportedDocumentType);
}

#[tokio::test]
async fn test_nonexistent_file() {
    let manager = InputManager::new(1024);
    let result = manager
        .load(Path::new("tests/fixtures/nonexistent.txt"), Some(DocumentKind::Text))
        .await;

    assert!(result.is_err());
}

#[test]
fn test_config_round_trip_and_custom_skills() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.output.format = OutputFormat::Markdown;
    config.extraction.max_payload_bytes = 2048;
    config.taxonomy.custom_skills.push(SkillEntry {
        canonical: "solidity".to_string(),
        aliases: vec!["sol lang".to_string()],
    });
    config.save_to(&path).unwrap();

    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded, config);

    let engine = MatchEngine::from_config(&loaded).unwrap();
    assert_eq!(engine.max_payload_bytes(), 2048);
    assert!(engine.taxonomy().version().ends_with("+custom"));

    let result = engine
        .match_document(&RawDocument::text("Smart contracts in Sol lang"), "Solidity developer")
        .unwrap();
    assert_eq!(result.matched_skills, vec!["solidity"]);
}
