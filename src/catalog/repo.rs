use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub is_premium: bool,
    pub thumbnail: Option<String>,
    pub created_by: Uuid,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: String,
    pub position: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub content: String,
    pub video_url: String,
    pub position: i32,
    pub video_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Video {
    pub id: Uuid,
    pub module_id: Uuid,
    pub title: String,
    pub video_url: String,
    pub duration_seconds: i32,
    pub position: i32,
    pub created_at: OffsetDateTime,
}

// --- courses ---

pub async fn list_courses(db: &PgPool) -> sqlx::Result<Vec<Course>> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, category, is_premium, thumbnail, created_by, created_at
        FROM courses
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn get_course(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Course>> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, title, description, category, is_premium, thumbnail, created_by, created_at
        FROM courses
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create_course(
    db: &PgPool,
    title: &str,
    description: &str,
    category: &str,
    is_premium: bool,
    thumbnail: Option<&str>,
    created_by: Uuid,
) -> sqlx::Result<Course> {
    sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (title, description, category, is_premium, thumbnail, created_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, title, description, category, is_premium, thumbnail, created_by, created_at
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(category)
    .bind(is_premium)
    .bind(thumbnail)
    .bind(created_by)
    .fetch_one(db)
    .await
}

pub async fn update_course(
    db: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    category: Option<&str>,
    is_premium: Option<bool>,
    thumbnail: Option<&str>,
) -> sqlx::Result<Option<Course>> {
    sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            category = COALESCE($4, category),
            is_premium = COALESCE($5, is_premium),
            thumbnail = COALESCE($6, thumbnail)
        WHERE id = $1
        RETURNING id, title, description, category, is_premium, thumbnail, created_by, created_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(category)
    .bind(is_premium)
    .bind(thumbnail)
    .fetch_optional(db)
    .await
}

pub async fn delete_course(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

// --- modules ---

/// Ordered by position; duplicate or gapped positions are tolerated, with id
/// as the tie-breaker.
pub async fn list_modules(db: &PgPool, course_id: Uuid) -> sqlx::Result<Vec<Module>> {
    sqlx::query_as::<_, Module>(
        r#"
        SELECT id, course_id, title, description, position, created_at
        FROM modules
        WHERE course_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn get_module(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Module>> {
    sqlx::query_as::<_, Module>(
        r#"
        SELECT id, course_id, title, description, position, created_at
        FROM modules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn count_modules(db: &PgPool, course_id: Uuid) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM modules WHERE course_id = $1")
        .bind(course_id)
        .fetch_one(db)
        .await
}

pub async fn course_id_of_module(db: &PgPool, module_id: Uuid) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>("SELECT course_id FROM modules WHERE id = $1")
        .bind(module_id)
        .fetch_optional(db)
        .await
}

pub async fn create_module(
    db: &PgPool,
    course_id: Uuid,
    title: &str,
    description: &str,
    position: i32,
) -> sqlx::Result<Module> {
    sqlx::query_as::<_, Module>(
        r#"
        INSERT INTO modules (course_id, title, description, position)
        VALUES ($1, $2, $3, $4)
        RETURNING id, course_id, title, description, position, created_at
        "#,
    )
    .bind(course_id)
    .bind(title)
    .bind(description)
    .bind(position)
    .fetch_one(db)
    .await
}

pub async fn update_module(
    db: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    position: Option<i32>,
) -> sqlx::Result<Option<Module>> {
    sqlx::query_as::<_, Module>(
        r#"
        UPDATE modules
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            position = COALESCE($4, position)
        WHERE id = $1
        RETURNING id, course_id, title, description, position, created_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(position)
    .fetch_optional(db)
    .await
}

pub async fn delete_module(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM modules WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

// --- lessons ---

pub async fn list_lessons(db: &PgPool, module_id: Uuid) -> sqlx::Result<Vec<Lesson>> {
    sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, module_id, title, content, video_url, position, video_id
        FROM lessons
        WHERE module_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(module_id)
    .fetch_all(db)
    .await
}

pub async fn get_lesson(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Lesson>> {
    sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, module_id, title, content, video_url, position, video_id
        FROM lessons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create_lesson(
    db: &PgPool,
    module_id: Uuid,
    title: &str,
    content: &str,
    video_url: &str,
    position: i32,
    video_id: Option<Uuid>,
) -> sqlx::Result<Lesson> {
    sqlx::query_as::<_, Lesson>(
        r#"
        INSERT INTO lessons (module_id, title, content, video_url, position, video_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, module_id, title, content, video_url, position, video_id
        "#,
    )
    .bind(module_id)
    .bind(title)
    .bind(content)
    .bind(video_url)
    .bind(position)
    .bind(video_id)
    .fetch_one(db)
    .await
}

pub async fn update_lesson(
    db: &PgPool,
    id: Uuid,
    title: Option<&str>,
    content: Option<&str>,
    video_url: Option<&str>,
    position: Option<i32>,
    video_id: Option<Uuid>,
) -> sqlx::Result<Option<Lesson>> {
    sqlx::query_as::<_, Lesson>(
        r#"
        UPDATE lessons
        SET title = COALESCE($2, title),
            content = COALESCE($3, content),
            video_url = COALESCE($4, video_url),
            position = COALESCE($5, position),
            video_id = COALESCE($6, video_id)
        WHERE id = $1
        RETURNING id, module_id, title, content, video_url, position, video_id
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .bind(video_url)
    .bind(position)
    .bind(video_id)
    .fetch_optional(db)
    .await
}

pub async fn delete_lesson(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

// --- videos ---

pub async fn list_videos(db: &PgPool, module_id: Uuid) -> sqlx::Result<Vec<Video>> {
    sqlx::query_as::<_, Video>(
        r#"
        SELECT id, module_id, title, video_url, duration_seconds, position, created_at
        FROM videos
        WHERE module_id = $1
        ORDER BY position, id
        "#,
    )
    .bind(module_id)
    .fetch_all(db)
    .await
}

pub async fn get_video(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Video>> {
    sqlx::query_as::<_, Video>(
        r#"
        SELECT id, module_id, title, video_url, duration_seconds, position, created_at
        FROM videos
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn course_id_of_video(db: &PgPool, video_id: Uuid) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT m.course_id
        FROM videos v
        JOIN modules m ON m.id = v.module_id
        WHERE v.id = $1
        "#,
    )
    .bind(video_id)
    .fetch_optional(db)
    .await
}

pub async fn create_video(
    db: &PgPool,
    module_id: Uuid,
    title: &str,
    video_url: &str,
    duration_seconds: i32,
    position: i32,
) -> sqlx::Result<Video> {
    sqlx::query_as::<_, Video>(
        r#"
        INSERT INTO videos (module_id, title, video_url, duration_seconds, position)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, module_id, title, video_url, duration_seconds, position, created_at
        "#,
    )
    .bind(module_id)
    .bind(title)
    .bind(video_url)
    .bind(duration_seconds)
    .bind(position)
    .fetch_one(db)
    .await
}

pub async fn update_video(
    db: &PgPool,
    id: Uuid,
    title: Option<&str>,
    video_url: Option<&str>,
    duration_seconds: Option<i32>,
    position: Option<i32>,
) -> sqlx::Result<Option<Video>> {
    sqlx::query_as::<_, Video>(
        r#"
        UPDATE videos
        SET title = COALESCE($2, title),
            video_url = COALESCE($3, video_url),
            duration_seconds = COALESCE($4, duration_seconds),
            position = COALESCE($5, position)
        WHERE id = $1
        RETURNING id, module_id, title, video_url, duration_seconds, position, created_at
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(video_url)
    .bind(duration_seconds)
    .bind(position)
    .fetch_optional(db)
    .await
}

pub async fn delete_video(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
