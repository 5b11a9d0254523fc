use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub is_active: bool,
    pub enrolled_at: OffsetDateTime,
}

/// Active enrollment joined with its course, for the "my courses" listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrolledCourse {
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_premium: bool,
    pub thumbnail: Option<String>,
    pub enrolled_at: OffsetDateTime,
}

/// Idempotent enrollment. The conditional insert makes concurrent first-time
/// enrollments converge on a single row; the follow-up select covers the
/// already-enrolled case. Returns the row and whether it was created.
pub async fn enroll(db: &PgPool, user_id: Uuid, course_id: Uuid) -> sqlx::Result<(Enrollment, bool)> {
    let inserted = sqlx::query_as::<_, Enrollment>(
        r#"
        INSERT INTO enrollments (user_id, course_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, course_id) DO NOTHING
        RETURNING id, user_id, course_id, is_active, enrolled_at
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await?;

    if let Some(enrollment) = inserted {
        return Ok((enrollment, true));
    }

    let existing = sqlx::query_as::<_, Enrollment>(
        r#"
        SELECT id, user_id, course_id, is_active, enrolled_at
        FROM enrollments
        WHERE user_id = $1 AND course_id = $2
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await?;

    Ok((existing, false))
}

pub async fn is_active_enrollment(
    db: &PgPool,
    user_id: Uuid,
    course_id: Uuid,
) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM enrollments
            WHERE user_id = $1 AND course_id = $2 AND is_active
        )
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await
}

pub async fn my_enrollments(db: &PgPool, user_id: Uuid) -> sqlx::Result<Vec<EnrolledCourse>> {
    sqlx::query_as::<_, EnrolledCourse>(
        r#"
        SELECT c.id AS course_id, c.title, c.description, c.category,
               c.is_premium, c.thumbnail, e.enrolled_at
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.user_id = $1 AND e.is_active
        ORDER BY e.enrolled_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

/// Enrollments are never hard-deleted in the normal flow, only deactivated.
pub async fn deactivate(db: &PgPool, user_id: Uuid, course_id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "UPDATE enrollments SET is_active = FALSE WHERE user_id = $1 AND course_id = $2",
    )
    .bind(user_id)
    .bind(course_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
