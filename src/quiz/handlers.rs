use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{jwt::Actor, rbac::Capability};
use crate::catalog::repo as catalog;
use crate::enrollment::guard;
use crate::error::ApiError;
use crate::quiz::dto::{
    AdminQuestion, AdminQuizView, CreateQuestionRequest, CreateQuizRequest, StudentQuestion,
    StudentQuizView, SubmitQuizRequest, SubmitQuizResponse, UpdateQuestionRequest,
    UpdateQuizRequest,
};
use crate::quiz::repo;
use crate::quiz::repo::Quiz;
use crate::quiz::scoring::{parse_answers, score_answers};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/modules/:module_id/quiz",
            get(get_student_quiz).post(create_quiz),
        )
        .route("/modules/:module_id/quiz/submit", post(submit_quiz))
        .route("/quizzes/:quiz_id", get(quiz_detail).put(update_quiz))
        .route("/quizzes/:quiz_id/full", get(admin_quiz))
        .route("/quizzes/:quiz_id/questions", post(add_question))
        .route(
            "/questions/:question_id",
            put(update_question).delete(delete_question),
        )
}

fn normalize_option(raw: &str) -> Result<String, ApiError> {
    let normalized = raw.trim().to_ascii_uppercase();
    match normalized.as_str() {
        "A" | "B" | "C" | "D" => Ok(normalized),
        _ => Err(ApiError::InvalidInput(
            "correct_option must be one of A, B, C, D".into(),
        )),
    }
}

#[instrument(skip(state, payload))]
pub async fn create_quiz(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<Quiz>), ApiError> {
    actor.require(Capability::ManageContent)?;

    catalog::get_module(&state.db, module_id)
        .await?
        .ok_or(ApiError::NotFound("module"))?;

    if payload.pass_marks < 0 || payload.total_marks < 0 {
        return Err(ApiError::InvalidInput("marks must not be negative".into()));
    }

    // One quiz per module; the unique constraint is the arbiter under races.
    let quiz = match repo::create_quiz(
        &state.db,
        module_id,
        payload.title.trim(),
        payload.total_marks,
        payload.pass_marks,
    )
    .await
    {
        Ok(quiz) => quiz,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::Conflict("Quiz"));
        }
        Err(e) => return Err(e.into()),
    };

    info!(quiz_id = %quiz.id, %module_id, "quiz created");
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Quiz as served to an enrolled student: questions without the answer key.
#[instrument(skip(state))]
pub async fn get_student_quiz(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
) -> Result<Json<StudentQuizView>, ApiError> {
    guard::require_module_access(&state.db, &actor, module_id).await?;

    let quiz = repo::quiz_by_module(&state.db, module_id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;
    let questions = repo::questions_by_quiz(&state.db, quiz.id).await?;

    Ok(Json(StudentQuizView {
        quiz_id: quiz.id,
        title: quiz.title,
        total_marks: quiz.total_marks,
        pass_marks: quiz.pass_marks,
        questions: questions.into_iter().map(StudentQuestion::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn quiz_detail(
    State(state): State<AppState>,
    _actor: Actor,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<Quiz>, ApiError> {
    let quiz = repo::quiz_by_id(&state.db, quiz_id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;
    Ok(Json(quiz))
}

/// Full quiz including the answer key; admin screens only.
#[instrument(skip(state))]
pub async fn admin_quiz(
    State(state): State<AppState>,
    actor: Actor,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<AdminQuizView>, ApiError> {
    actor.require(Capability::ViewAnswerKeys)?;

    let quiz = repo::quiz_by_id(&state.db, quiz_id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;
    let questions = repo::questions_by_quiz(&state.db, quiz.id).await?;

    Ok(Json(AdminQuizView {
        quiz_id: quiz.id,
        module_id: quiz.module_id,
        title: quiz.title,
        total_marks: quiz.total_marks,
        pass_marks: quiz.pass_marks,
        questions: questions.into_iter().map(AdminQuestion::from).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_quiz(
    State(state): State<AppState>,
    actor: Actor,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<Json<Quiz>, ApiError> {
    actor.require(Capability::ManageContent)?;

    if payload.pass_marks.is_some_and(|m| m < 0) || payload.total_marks.is_some_and(|m| m < 0) {
        return Err(ApiError::InvalidInput("marks must not be negative".into()));
    }

    let quiz = repo::update_quiz(
        &state.db,
        quiz_id,
        payload.title.as_deref(),
        payload.total_marks,
        payload.pass_marks,
    )
    .await?
    .ok_or(ApiError::NotFound("quiz"))?;
    Ok(Json(quiz))
}

#[instrument(skip(state, payload))]
pub async fn add_question(
    State(state): State<AppState>,
    actor: Actor,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<AdminQuestion>), ApiError> {
    actor.require(Capability::ManageContent)?;

    repo::quiz_by_id(&state.db, quiz_id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;

    let correct = normalize_option(&payload.correct_option)?;
    let question = repo::add_question(
        &state.db,
        quiz_id,
        payload.question_text.trim(),
        &payload.option_a,
        &payload.option_b,
        &payload.option_c,
        &payload.option_d,
        &correct,
    )
    .await?;

    info!(question_id = %question.id, %quiz_id, "question added");
    Ok((StatusCode::CREATED, Json(AdminQuestion::from(question))))
}

#[instrument(skip(state, payload))]
pub async fn update_question(
    State(state): State<AppState>,
    actor: Actor,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<Json<AdminQuestion>, ApiError> {
    actor.require(Capability::ManageContent)?;

    let correct = payload
        .correct_option
        .as_deref()
        .map(normalize_option)
        .transpose()?;

    let question = repo::update_question(
        &state.db,
        question_id,
        payload.question_text.as_deref(),
        payload.option_a.as_deref(),
        payload.option_b.as_deref(),
        payload.option_c.as_deref(),
        payload.option_d.as_deref(),
        correct.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("question"))?;
    Ok(Json(AdminQuestion::from(question)))
}

#[instrument(skip(state))]
pub async fn delete_question(
    State(state): State<AppState>,
    actor: Actor,
    Path(question_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    actor.require(Capability::ManageContent)?;

    if !repo::delete_question(&state.db, question_id).await? {
        return Err(ApiError::NotFound("question"));
    }
    info!(%question_id, "question deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Scores a submission and replaces the caller's previous attempt, if any.
#[instrument(skip(state, payload))]
pub async fn submit_quiz(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<Json<SubmitQuizResponse>, ApiError> {
    guard::require_module_access(&state.db, &actor, module_id).await?;

    let quiz = repo::quiz_by_module(&state.db, module_id)
        .await?
        .ok_or(ApiError::NotFound("quiz"))?;

    let answers = parse_answers(&payload.answers)?;
    let questions = repo::questions_by_quiz(&state.db, quiz.id).await?;

    let score = score_answers(&questions, &answers);
    let passed = score >= quiz.pass_marks;

    let attempt = repo::upsert_attempt(&state.db, actor.id, quiz.id, score, passed).await?;

    info!(
        user_id = %actor.id,
        quiz_id = %quiz.id,
        score = attempt.score,
        passed = attempt.passed,
        "quiz attempt recorded"
    );

    Ok(Json(SubmitQuizResponse {
        quiz_id: quiz.id,
        module_id,
        score: attempt.score,
        total_questions: questions.len() as i64,
        passed: attempt.passed,
        attempt_updated: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_normalization() {
        assert_eq!(normalize_option("a").unwrap(), "A");
        assert_eq!(normalize_option(" D ").unwrap(), "D");
        assert!(normalize_option("E").is_err());
        assert!(normalize_option("").is_err());
        assert!(normalize_option("AB").is_err());
    }
}
