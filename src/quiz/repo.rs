use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub total_marks: i32,
    pub pass_marks: i32,
}

/// Full question row including the answer key. Deliberately not Serialize;
/// responses go through the student/admin DTOs so the key cannot leak by
/// accident.
#[derive(Debug, Clone, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_option: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub score: i32,
    pub passed: bool,
    pub attempted_at: OffsetDateTime,
}

pub async fn quiz_by_module(db: &PgPool, module_id: Uuid) -> sqlx::Result<Option<Quiz>> {
    sqlx::query_as::<_, Quiz>(
        "SELECT id, module_id, title, total_marks, pass_marks FROM quizzes WHERE module_id = $1",
    )
    .bind(module_id)
    .fetch_optional(db)
    .await
}

pub async fn quiz_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Quiz>> {
    sqlx::query_as::<_, Quiz>(
        "SELECT id, module_id, title, total_marks, pass_marks FROM quizzes WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create_quiz(
    db: &PgPool,
    module_id: Uuid,
    title: &str,
    total_marks: i32,
    pass_marks: i32,
) -> sqlx::Result<Quiz> {
    sqlx::query_as::<_, Quiz>(
        r#"
        INSERT INTO quizzes (module_id, title, total_marks, pass_marks)
        VALUES ($1, $2, $3, $4)
        RETURNING id, module_id, title, total_marks, pass_marks
        "#,
    )
    .bind(module_id)
    .bind(title)
    .bind(total_marks)
    .bind(pass_marks)
    .fetch_one(db)
    .await
}

pub async fn update_quiz(
    db: &PgPool,
    id: Uuid,
    title: Option<&str>,
    total_marks: Option<i32>,
    pass_marks: Option<i32>,
) -> sqlx::Result<Option<Quiz>> {
    sqlx::query_as::<_, Quiz>(
        r#"
        UPDATE quizzes
        SET title = COALESCE($2, title),
            total_marks = COALESCE($3, total_marks),
            pass_marks = COALESCE($4, pass_marks)
        WHERE id = $1
        RETURNING id, module_id, title, total_marks, pass_marks
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(total_marks)
    .bind(pass_marks)
    .fetch_optional(db)
    .await
}

pub async fn questions_by_quiz(db: &PgPool, quiz_id: Uuid) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, quiz_id, question_text, option_a, option_b, option_c, option_d, correct_option
        FROM questions
        WHERE quiz_id = $1
        ORDER BY id
        "#,
    )
    .bind(quiz_id)
    .fetch_all(db)
    .await
}

pub async fn add_question(
    db: &PgPool,
    quiz_id: Uuid,
    question_text: &str,
    option_a: &str,
    option_b: &str,
    option_c: &str,
    option_d: &str,
    correct_option: &str,
) -> sqlx::Result<Question> {
    sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions (quiz_id, question_text, option_a, option_b, option_c, option_d, correct_option)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, quiz_id, question_text, option_a, option_b, option_c, option_d, correct_option
        "#,
    )
    .bind(quiz_id)
    .bind(question_text)
    .bind(option_a)
    .bind(option_b)
    .bind(option_c)
    .bind(option_d)
    .bind(correct_option)
    .fetch_one(db)
    .await
}

pub async fn update_question(
    db: &PgPool,
    id: Uuid,
    question_text: Option<&str>,
    option_a: Option<&str>,
    option_b: Option<&str>,
    option_c: Option<&str>,
    option_d: Option<&str>,
    correct_option: Option<&str>,
) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions
        SET question_text = COALESCE($2, question_text),
            option_a = COALESCE($3, option_a),
            option_b = COALESCE($4, option_b),
            option_c = COALESCE($5, option_c),
            option_d = COALESCE($6, option_d),
            correct_option = COALESCE($7, correct_option)
        WHERE id = $1
        RETURNING id, quiz_id, question_text, option_a, option_b, option_c, option_d, correct_option
        "#,
    )
    .bind(id)
    .bind(question_text)
    .bind(option_a)
    .bind(option_b)
    .bind(option_c)
    .bind(option_d)
    .bind(correct_option)
    .fetch_optional(db)
    .await
}

pub async fn delete_question(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Replaces any prior attempt for the (user, quiz) pair; attempts are not
/// historized.
pub async fn upsert_attempt(
    db: &PgPool,
    user_id: Uuid,
    quiz_id: Uuid,
    score: i32,
    passed: bool,
) -> sqlx::Result<QuizAttempt> {
    sqlx::query_as::<_, QuizAttempt>(
        r#"
        INSERT INTO quiz_attempts (user_id, quiz_id, score, passed)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, quiz_id) DO UPDATE
            SET score = EXCLUDED.score,
                passed = EXCLUDED.passed,
                attempted_at = NOW()
        RETURNING id, user_id, quiz_id, score, passed, attempted_at
        "#,
    )
    .bind(user_id)
    .bind(quiz_id)
    .bind(score)
    .bind(passed)
    .fetch_one(db)
    .await
}

/// True when the user has a passing attempt on any quiz under the course.
pub async fn has_passing_attempt(
    db: &PgPool,
    user_id: Uuid,
    course_id: Uuid,
) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM quiz_attempts qa
            JOIN quizzes q ON q.id = qa.quiz_id
            JOIN modules m ON m.id = q.module_id
            WHERE qa.user_id = $1 AND m.course_id = $2 AND qa.passed
        )
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await
}

/// Modules under the course whose quiz the user has passed, for the
/// module-count completion variant.
pub async fn count_passed_module_quizzes(
    db: &PgPool,
    user_id: Uuid,
    course_id: Uuid,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM quiz_attempts qa
        JOIN quizzes q ON q.id = qa.quiz_id
        JOIN modules m ON m.id = q.module_id
        WHERE qa.user_id = $1 AND m.course_id = $2 AND qa.passed
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await
}
