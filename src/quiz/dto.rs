use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::quiz::repo::Question;

#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    pub title: String,
    #[serde(default = "default_marks")]
    pub total_marks: i32,
    #[serde(default = "default_marks")]
    pub pass_marks: i32,
}

fn default_marks() -> i32 {
    5
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    pub total_marks: Option<i32>,
    pub pass_marks: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,
    pub correct_option: Option<String>,
}

/// Question as shown to students: the answer key is not part of this shape.
#[derive(Debug, Serialize)]
pub struct StudentQuestion {
    pub id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
}

impl From<Question> for StudentQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            question_text: q.question_text,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
        }
    }
}

/// Question including the answer key, for admin screens only.
#[derive(Debug, Serialize)]
pub struct AdminQuestion {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: String,
}

impl From<Question> for AdminQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            quiz_id: q.quiz_id,
            question_text: q.question_text,
            option_a: q.option_a,
            option_b: q.option_b,
            option_c: q.option_c,
            option_d: q.option_d,
            correct_option: q.correct_option,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentQuizView {
    pub quiz_id: Uuid,
    pub title: String,
    pub total_marks: i32,
    pub pass_marks: i32,
    pub questions: Vec<StudentQuestion>,
}

#[derive(Debug, Serialize)]
pub struct AdminQuizView {
    pub quiz_id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub total_marks: i32,
    pub pass_marks: i32,
    pub questions: Vec<AdminQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    #[serde(default = "empty_object")]
    pub answers: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub quiz_id: Uuid,
    pub module_id: Uuid,
    pub score: i32,
    pub total_questions: i64,
    pub passed: bool,
    pub attempt_updated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> Question {
        Question {
            id: Uuid::new_v4(),
            quiz_id: Uuid::new_v4(),
            question_text: "What is ownership?".into(),
            option_a: "a".into(),
            option_b: "b".into(),
            option_c: "c".into(),
            option_d: "d".into(),
            correct_option: "B".into(),
        }
    }

    #[test]
    fn student_question_never_carries_the_answer_key() {
        let view = StudentQuestion::from(sample_question());
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("question_text"));
        assert!(!json.contains("correct_option"));
        assert!(!json.contains("\"B\""));
    }

    #[test]
    fn admin_question_includes_the_answer_key() {
        let view = AdminQuestion::from(sample_question());
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("correct_option"));
    }

    #[test]
    fn submit_request_defaults_to_empty_answers() {
        let req: SubmitQuizRequest = serde_json::from_str("{}").unwrap();
        assert!(req.answers.as_object().is_some_and(|m| m.is_empty()));
    }
}
