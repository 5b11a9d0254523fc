use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopStudent {
    pub username: String,
    pub avg_score: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
}

pub async fn count_active_enrollments(db: &PgPool, course_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM enrollments WHERE course_id = $1 AND is_active",
    )
    .bind(course_id)
    .fetch_one(db)
    .await
}

pub async fn count_quizzes(db: &PgPool, course_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM quizzes q
        JOIN modules m ON m.id = q.module_id
        WHERE m.course_id = $1
        "#,
    )
    .bind(course_id)
    .fetch_one(db)
    .await
}

pub async fn count_certificates(db: &PgPool, course_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM certificates WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(db)
        .await
}

/// (total attempts, passed attempts) across all quizzes under the course.
pub async fn attempt_counts(db: &PgPool, course_id: Uuid) -> sqlx::Result<(i64, i64)> {
    sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(*), COUNT(*) FILTER (WHERE qa.passed)
        FROM quiz_attempts qa
        JOIN quizzes q ON q.id = qa.quiz_id
        JOIN modules m ON m.id = q.module_id
        WHERE m.course_id = $1
        "#,
    )
    .bind(course_id)
    .fetch_one(db)
    .await
}

pub async fn top_students(db: &PgPool, course_id: Uuid) -> sqlx::Result<Vec<TopStudent>> {
    sqlx::query_as::<_, TopStudent>(
        r#"
        SELECT u.username, AVG(qa.score)::FLOAT8 AS avg_score
        FROM quiz_attempts qa
        JOIN quizzes q ON q.id = qa.quiz_id
        JOIN modules m ON m.id = q.module_id
        JOIN users u ON u.id = qa.user_id
        WHERE m.course_id = $1
        GROUP BY u.username
        ORDER BY avg_score DESC
        LIMIT 5
        "#,
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn count_courses(db: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM courses")
        .fetch_one(db)
        .await
}

pub async fn count_users(db: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await
}

pub async fn count_enrollments(db: &PgPool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments")
        .fetch_one(db)
        .await
}

pub async fn recent_courses(db: &PgPool, limit: i64) -> sqlx::Result<Vec<CourseSummary>> {
    sqlx::query_as::<_, CourseSummary>(
        r#"
        SELECT id, title, description
        FROM courses
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db)
    .await
}
