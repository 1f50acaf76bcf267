use std::collections::BTreeMap;

use actix_web::web;
use interview_core::{AnswerMap, Question, QuestionId, QuestionKind, ValidationError};
use serde::Deserialize;
use serde_json::Value;

use crate::ApiResult;
use crate::error::ApiError;
use crate::response;
use crate::session::Session;
use crate::store::Store;

/// Question as sent by clients; the id comes from the path on update.
#[derive(Deserialize)]
pub(crate) struct QuestionInput {
    #[serde(default)]
    question_id: Option<QuestionId>,
    #[serde(default)]
    question_text: String,
    #[serde(default)]
    question_type: Option<String>,
    #[serde(default)]
    answer_options: Option<String>,
    #[serde(default)]
    condition_logic: Option<String>,
    #[serde(default)]
    condition_display: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl QuestionInput {
    fn into_question(self, id: QuestionId) -> Result<Question, ValidationError> {
        let kind: QuestionKind = self
            .question_type
            .ok_or(ValidationError::MissingField("question_type"))?
            .parse()?;
        let mut question = Question::new(id, self.question_text, kind);
        if let Some(options) = non_empty(self.answer_options) {
            question = question.with_options(&options);
        }
        if let Some(logic) = non_empty(self.condition_logic) {
            question = question.with_condition(&logic);
        }
        if let Some(display) = non_empty(self.condition_display) {
            question = question.with_condition_display(&display);
        }
        Ok(question)
    }
}

#[derive(Deserialize)]
pub(crate) struct VisibleRequest {
    #[serde(default)]
    answers: BTreeMap<QuestionId, Value>,
}

/// Text form of an answer as a form holds it. Checkbox selections arrive as
/// arrays and are joined with commas, numbers and booleans are printed,
/// `null` means unanswered.
fn answer_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(answer_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

fn answer_map(answers: BTreeMap<QuestionId, Value>) -> AnswerMap {
    answers
        .into_iter()
        .filter_map(|(id, value)| answer_text(value).map(|text| (id, text)))
        .collect()
}

fn parse_id(raw: &str) -> Result<QuestionId, ApiError> {
    raw.parse::<QuestionId>()
        .map_err(|e| ApiError::Validation(e.into()))
}

pub(crate) async fn list(store: web::Data<Store>, _session: Session) -> ApiResult {
    let questions = store.db_operation(|db| Ok(db.list_questions()?)).await?;
    Ok(response::list(questions))
}

pub(crate) async fn get(
    store: web::Data<Store>,
    _session: Session,
    path: web::Path<String>,
) -> ApiResult {
    let id = parse_id(&path)?;
    let question = store
        .db_operation(move |db| {
            db.query_question(id)?
                .ok_or_else(|| ApiError::NotFound(format!("question {id}")))
        })
        .await?;
    Ok(response::ok(question))
}

/// Questions to show for the answers given so far.
pub(crate) async fn visible(
    store: web::Data<Store>,
    _session: Session,
    body: web::Json<VisibleRequest>,
) -> ApiResult {
    let answers = answer_map(body.into_inner().answers);
    let questions = store
        .db_operation(move |db| {
            let catalog = db.catalog()?;
            Ok(catalog.visible(&answers).into_iter().cloned().collect::<Vec<_>>())
        })
        .await?;
    Ok(response::list(questions))
}

pub(crate) async fn create(
    store: web::Data<Store>,
    _session: Session,
    body: web::Json<QuestionInput>,
) -> ApiResult {
    let input = body.into_inner();
    let id = input
        .question_id
        .ok_or(ValidationError::MissingField("question_id"))?;
    let question = input.into_question(id)?;
    let question = store
        .db_operation(move |db| Ok(db.create_question(question)?))
        .await?;
    Ok(response::created(question, "question created"))
}

pub(crate) async fn update(
    store: web::Data<Store>,
    _session: Session,
    path: web::Path<String>,
    body: web::Json<QuestionInput>,
) -> ApiResult {
    let id = parse_id(&path)?;
    let question = body.into_inner().into_question(id)?;
    let question = store
        .db_operation(move |db| Ok(db.update_question(question)?))
        .await?;
    Ok(response::updated(question, "question updated"))
}

pub(crate) async fn delete(
    store: web::Data<Store>,
    _session: Session,
    path: web::Path<String>,
) -> ApiResult {
    let id = parse_id(&path)?;
    store
        .db_operation(move |db| Ok(db.delete_question(id)?))
        .await?;
    Ok(response::message("question deleted"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn form_values_become_answer_text() {
        let request: VisibleRequest = serde_json::from_value(json!({
            "answers": {
                "1": ["มี", "ไม่แน่ใจ"],
                "2": 5,
                "2.1": "ข้อความ",
                "3": null,
                "4": true,
            }
        }))
        .unwrap();
        let answers = answer_map(request.answers);
        assert_eq!(answers[&QuestionId::top(1)], "มี,ไม่แน่ใจ");
        assert_eq!(answers[&QuestionId::top(2)], "5");
        assert_eq!(answers[&QuestionId::follow_up(2, 1)], "ข้อความ");
        assert!(!answers.contains_key(&QuestionId::top(3)));
        assert_eq!(answers[&QuestionId::top(4)], "true");
    }
}
