use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::quiz::repo::Question;

/// Parses the submitted answers payload. The payload must be a JSON object
/// mapping question id to the selected option. Keys that do not parse as
/// question ids and values that are not strings are skipped; the questions
/// they would have answered simply score zero.
pub fn parse_answers(payload: &Value) -> Result<HashMap<Uuid, String>, ApiError> {
    let map = payload
        .as_object()
        .ok_or_else(|| ApiError::InvalidInput("Answers must be an object".into()))?;

    let mut answers = HashMap::new();
    for (key, value) in map {
        let Ok(id) = Uuid::parse_str(key.trim()) else {
            continue;
        };
        if let Some(selected) = value.as_str() {
            answers.insert(id, selected.to_string());
        }
    }
    Ok(answers)
}

/// Count of questions whose submitted option equals the stored correct
/// option, compared case-insensitively after trimming. Unanswered questions
/// contribute zero; the result never exceeds the question count.
pub fn score_answers(questions: &[Question], answers: &HashMap<Uuid, String>) -> i32 {
    questions
        .iter()
        .filter(|q| {
            answers
                .get(&q.id)
                .is_some_and(|selected| selected.trim().eq_ignore_ascii_case(q.correct_option.trim()))
        })
        .count() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(id: Uuid, correct: &str) -> Question {
        Question {
            id,
            quiz_id: Uuid::new_v4(),
            question_text: "?".into(),
            option_a: "a".into(),
            option_b: "b".into(),
            option_c: "c".into(),
            option_d: "d".into(),
            correct_option: correct.into(),
        }
    }

    #[test]
    fn rejects_non_object_payloads() {
        assert!(parse_answers(&json!(["A", "B"])).is_err());
        assert!(parse_answers(&json!("A")).is_err());
        assert!(parse_answers(&json!(42)).is_err());
        assert!(parse_answers(&json!(null)).is_err());
    }

    #[test]
    fn skips_unparseable_keys_and_non_string_values() {
        let q1 = Uuid::new_v4();
        let answers = parse_answers(&json!({
            (q1.to_string()): "A",
            "not-an-id": "B",
            (Uuid::new_v4().to_string()): 3,
        }))
        .unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[&q1], "A");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let q1 = Uuid::new_v4();
        let q2 = Uuid::new_v4();
        let questions = vec![question(q1, "A"), question(q2, "B")];
        let answers = parse_answers(&json!({
            (q1.to_string()): "a",
            (q2.to_string()): "B",
        }))
        .unwrap();
        assert_eq!(score_answers(&questions, &answers), 2);
    }

    #[test]
    fn missing_answers_score_zero() {
        let q1 = Uuid::new_v4();
        let q2 = Uuid::new_v4();
        let questions = vec![question(q1, "C"), question(q2, "D")];
        let answers = parse_answers(&json!({ (q1.to_string()): "C" })).unwrap();
        assert_eq!(score_answers(&questions, &answers), 1);
        assert_eq!(score_answers(&questions, &HashMap::new()), 0);
    }

    #[test]
    fn wrong_answers_score_zero() {
        let q1 = Uuid::new_v4();
        let questions = vec![question(q1, "A")];
        let answers = parse_answers(&json!({ (q1.to_string()): "D" })).unwrap();
        assert_eq!(score_answers(&questions, &answers), 0);
    }

    #[test]
    fn score_is_monotonic_and_bounded() {
        let ids: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let questions: Vec<Question> = ids.iter().map(|id| question(*id, "B")).collect();

        let mut answers = HashMap::new();
        let mut last = 0;
        for id in &ids {
            answers.insert(*id, "B".to_string());
            let score = score_answers(&questions, &answers);
            assert!(score >= last);
            assert!(score <= questions.len() as i32);
            last = score;
        }
        assert_eq!(last, 5);
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let q1 = Uuid::new_v4();
        let questions = vec![question(q1, "A")];
        let answers = parse_answers(&json!({
            (q1.to_string()): "A",
            (Uuid::new_v4().to_string()): "A",
        }))
        .unwrap();
        assert_eq!(score_answers(&questions, &answers), 1);
    }
}
