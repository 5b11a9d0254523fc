use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub watched_seconds: i32,
    pub is_completed: bool,
    pub updated_at: OffsetDateTime,
}

/// Lazily creates the progress row on first access. The no-op conflict update
/// makes the statement return the existing row, so concurrent first reads
/// converge on one row.
pub async fn get_or_create(
    db: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
) -> sqlx::Result<VideoProgress> {
    sqlx::query_as::<_, VideoProgress>(
        r#"
        INSERT INTO video_progress (user_id, video_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, video_id) DO UPDATE SET user_id = video_progress.user_id
        RETURNING id, user_id, video_id, watched_seconds, is_completed, updated_at
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .fetch_one(db)
    .await
}

/// Unconditional overwrite, last write wins. A client may reduce
/// watched_seconds or clear is_completed; no monotonicity is enforced.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    video_id: Uuid,
    watched_seconds: i32,
    is_completed: bool,
) -> sqlx::Result<VideoProgress> {
    sqlx::query_as::<_, VideoProgress>(
        r#"
        INSERT INTO video_progress (user_id, video_id, watched_seconds, is_completed)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, video_id) DO UPDATE
            SET watched_seconds = EXCLUDED.watched_seconds,
                is_completed = EXCLUDED.is_completed,
                updated_at = NOW()
        RETURNING id, user_id, video_id, watched_seconds, is_completed, updated_at
        "#,
    )
    .bind(user_id)
    .bind(video_id)
    .bind(watched_seconds)
    .bind(is_completed)
    .fetch_one(db)
    .await
}

/// Distinct lessons in the course whose linked video has a completed progress
/// row for the user. Lessons without a linked video never count.
pub async fn count_completed_lessons(
    db: &PgPool,
    user_id: Uuid,
    course_id: Uuid,
) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM lessons l
        JOIN modules m ON m.id = l.module_id
        JOIN video_progress vp ON vp.video_id = l.video_id AND vp.user_id = $1
        WHERE m.course_id = $2 AND vp.is_completed
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(db)
    .await
}

/// Lessons in the course with a non-null video reference; the completion
/// denominator.
pub async fn total_eligible_lessons(db: &PgPool, course_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM lessons l
        JOIN modules m ON m.id = l.module_id
        WHERE m.course_id = $1 AND l.video_id IS NOT NULL
        "#,
    )
    .bind(course_id)
    .fetch_one(db)
    .await
}

/// Video ids within a module that the user has completed.
pub async fn completed_video_ids(
    db: &PgPool,
    user_id: Uuid,
    module_id: Uuid,
) -> sqlx::Result<Vec<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT vp.video_id
        FROM video_progress vp
        JOIN videos v ON v.id = vp.video_id
        WHERE vp.user_id = $1 AND v.module_id = $2 AND vp.is_completed
        ORDER BY v.position, v.id
        "#,
    )
    .bind(user_id)
    .bind(module_id)
    .fetch_all(db)
    .await
}
