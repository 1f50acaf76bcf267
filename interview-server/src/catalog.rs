//! Question catalog file used to seed an empty database.
//!
//! ```toml
//! [[question]]
//! id = "1"
//! text = "มีปัญหาด้านการเรียนหรือไม่"
//! type = "radio"
//! options = "มี,ไม่มี"
//!
//! [[question]]
//! id = "1.1"
//! text = "โปรดระบุปัญหา"
//! type = "text"
//! condition = "1:eq:มี"
//! condition_display = "แสดงเมื่อตอบข้อ 1 ว่า \"มี\""
//! ```

use std::fs::read_to_string;
use std::path::Path;

use interview_core::{Question, QuestionId, QuestionKind};
use serde::Deserialize;

use crate::error::{ConfigError, Result};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "question")]
    questions: Vec<CatalogEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogEntry {
    id: QuestionId,
    text: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(default)]
    options: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    condition_display: Option<String>,
}

impl From<CatalogEntry> for Question {
    fn from(entry: CatalogEntry) -> Self {
        let mut question = Question::new(entry.id, entry.text, entry.kind);
        if let Some(options) = &entry.options {
            question = question.with_options(options);
        }
        if let Some(logic) = &entry.condition {
            question = question.with_condition(logic);
        }
        if let Some(display) = &entry.condition_display {
            question = question.with_condition_display(display);
        }
        question
    }
}

pub(crate) fn parse(contents: &str) -> std::result::Result<Vec<Question>, toml::de::Error> {
    let file: CatalogFile = toml::from_str(contents)?;
    Ok(file.questions.into_iter().map(Question::from).collect())
}

/// Read the catalog at `path`.
pub fn load(path: &Path) -> Result<Vec<Question>> {
    let contents = read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    let questions = parse(&contents).map_err(|e| ConfigError::Catalog {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use interview_core::{AnswerMap, Catalog};

    use super::*;

    const SAMPLE: &str = r#"
        [[question]]
        id = "2"
        text = "มีปัญหาด้านการเงินหรือไม่"
        type = "radio"
        options = "มี,ไม่มี"

        [[question]]
        id = 1
        text = "มีปัญหาด้านการเรียนหรือไม่"
        type = "radio"
        options = "มี,ไม่มี"

        [[question]]
        id = "1.1"
        text = "โปรดระบุปัญหา"
        type = "text"
        condition = "1:eq:มี"
    "#;

    #[test]
    fn parses_entries() {
        let questions = parse(SAMPLE).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[1].question_id, QuestionId::top(1));
        assert_eq!(questions[2].question_type, QuestionKind::Text);

        let catalog = Catalog::new(questions);
        let mut answers = AnswerMap::new();
        answers.insert(QuestionId::top(1), "มี".to_string());
        let visible: Vec<String> = catalog
            .visible(&answers)
            .iter()
            .map(|q| q.question_id.to_string())
            .collect();
        assert_eq!(visible, ["1", "1.1", "2"]);
    }

    #[test]
    fn shipped_catalog_matches_sample() {
        let questions = parse(include_str!("../catalog.toml")).unwrap();
        let catalog = Catalog::new(questions);
        assert!(catalog.forward_references().is_empty());
        assert_eq!(
            catalog.questions(),
            interview_utils_test::sample_catalog().questions()
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = parse("[[question]]\nid = \"1\"\ntext = \"x\"\ntype = \"slider\"\n");
        assert!(err.is_err());
    }
}
