use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{jwt::Actor, rbac::Capability};
use crate::catalog::dto::{
    CreateCourseRequest, CreateLessonRequest, CreateModuleRequest, CreateVideoRequest,
    UpdateCourseRequest, UpdateLessonRequest, UpdateModuleRequest, UpdateVideoRequest,
};
use crate::catalog::repo;
use crate::catalog::repo::{Course, Lesson, Module, Video};
use crate::enrollment::guard;
use crate::error::ApiError;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses))
        .route("/courses/:course_id", get(get_course))
        .route("/courses/:course_id/modules", get(list_modules))
        .route(
            "/courses/:course_id/modules/:module_id",
            get(get_module_in_course),
        )
        .route("/modules/:module_id/lessons", get(list_lessons))
        .route("/lessons/:lesson_id", get(get_lesson))
        .route("/modules/:module_id/videos", get(list_videos))
        .route("/videos/:video_id", get(get_video))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/courses", post(create_course))
        .route(
            "/courses/:course_id",
            put(update_course).delete(delete_course),
        )
        .route("/courses/:course_id/modules", post(create_module))
        .route(
            "/modules/:module_id",
            put(update_module).delete(delete_module),
        )
        .route("/modules/:module_id/lessons", post(create_lesson))
        .route(
            "/lessons/:lesson_id",
            patch(update_lesson).delete(delete_lesson),
        )
        .route("/modules/:module_id/videos", post(create_video))
        .route("/videos/:video_id", put(update_video).delete(delete_video))
}

// --- course reads ---

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<Vec<Course>>, ApiError> {
    let courses = repo::list_courses(&state.db).await?;
    Ok(Json(courses))
}

#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    _actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Course>, ApiError> {
    let course = repo::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    Ok(Json(course))
}

#[instrument(skip(state))]
pub async fn list_modules(
    State(state): State<AppState>,
    _actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Vec<Module>>, ApiError> {
    repo::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    let modules = repo::list_modules(&state.db, course_id).await?;
    Ok(Json(modules))
}

#[instrument(skip(state))]
pub async fn get_module_in_course(
    State(state): State<AppState>,
    _actor: Actor,
    Path((course_id, module_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Module>, ApiError> {
    let module = repo::get_module(&state.db, module_id)
        .await?
        .filter(|m| m.course_id == course_id)
        .ok_or(ApiError::NotFound("module"))?;
    Ok(Json(module))
}

#[instrument(skip(state))]
pub async fn list_lessons(
    State(state): State<AppState>,
    _actor: Actor,
    Path(module_id): Path<Uuid>,
) -> Result<Json<Vec<Lesson>>, ApiError> {
    repo::get_module(&state.db, module_id)
        .await?
        .ok_or(ApiError::NotFound("module"))?;
    let lessons = repo::list_lessons(&state.db, module_id).await?;
    Ok(Json(lessons))
}

#[instrument(skip(state))]
pub async fn get_lesson(
    State(state): State<AppState>,
    _actor: Actor,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<Lesson>, ApiError> {
    let lesson = repo::get_lesson(&state.db, lesson_id)
        .await?
        .ok_or(ApiError::NotFound("lesson"))?;
    Ok(Json(lesson))
}

// Video material is enrollment-gated for students; admins bypass.

#[instrument(skip(state))]
pub async fn list_videos(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
) -> Result<Json<Vec<Video>>, ApiError> {
    guard::require_module_access(&state.db, &actor, module_id).await?;
    let videos = repo::list_videos(&state.db, module_id).await?;
    Ok(Json(videos))
}

#[instrument(skip(state))]
pub async fn get_video(
    State(state): State<AppState>,
    actor: Actor,
    Path(video_id): Path<Uuid>,
) -> Result<Json<Video>, ApiError> {
    let video = repo::get_video(&state.db, video_id)
        .await?
        .ok_or(ApiError::NotFound("video"))?;
    guard::require_module_access(&state.db, &actor, video.module_id).await?;
    Ok(Json(video))
}

// --- course writes ---

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    actor: Actor,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<Course>), ApiError> {
    actor.require(Capability::ManageContent)?;

    let course = repo::create_course(
        &state.db,
        payload.title.trim(),
        &payload.description,
        &payload.category,
        payload.is_premium,
        payload.thumbnail.as_deref(),
        actor.id,
    )
    .await?;

    info!(course_id = %course.id, title = %course.title, "course created");
    Ok((StatusCode::CREATED, Json(course)))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, ApiError> {
    actor.require(Capability::ManageContent)?;

    let course = repo::update_course(
        &state.db,
        course_id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.category.as_deref(),
        payload.is_premium,
        payload.thumbnail.as_deref(),
    )
    .await?
    .ok_or(ApiError::NotFound("course"))?;
    Ok(Json(course))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    actor.require(Capability::ManageContent)?;

    if !repo::delete_course(&state.db, course_id).await? {
        return Err(ApiError::NotFound("course"));
    }
    info!(%course_id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- module writes ---

#[instrument(skip(state, payload))]
pub async fn create_module(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateModuleRequest>,
) -> Result<(StatusCode, Json<Module>), ApiError> {
    actor.require(Capability::ManageContent)?;

    repo::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let module = repo::create_module(
        &state.db,
        course_id,
        payload.title.trim(),
        &payload.description,
        payload.position,
    )
    .await?;

    info!(module_id = %module.id, %course_id, "module created");
    Ok((StatusCode::CREATED, Json(module)))
}

#[instrument(skip(state, payload))]
pub async fn update_module(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<UpdateModuleRequest>,
) -> Result<Json<Module>, ApiError> {
    actor.require(Capability::ManageContent)?;

    let module = repo::update_module(
        &state.db,
        module_id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.position,
    )
    .await?
    .ok_or(ApiError::NotFound("module"))?;
    Ok(Json(module))
}

#[instrument(skip(state))]
pub async fn delete_module(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    actor.require(Capability::ManageContent)?;

    if !repo::delete_module(&state.db, module_id).await? {
        return Err(ApiError::NotFound("module"));
    }
    info!(%module_id, "module deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- lesson writes ---

#[instrument(skip(state, payload))]
pub async fn create_lesson(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), ApiError> {
    actor.require(Capability::ManageContent)?;

    repo::get_module(&state.db, module_id)
        .await?
        .ok_or(ApiError::NotFound("module"))?;

    if let Some(video_id) = payload.video_id {
        repo::get_video(&state.db, video_id)
            .await?
            .ok_or(ApiError::NotFound("video"))?;
    }

    let lesson = repo::create_lesson(
        &state.db,
        module_id,
        payload.title.trim(),
        &payload.content,
        &payload.video_url,
        payload.position,
        payload.video_id,
    )
    .await?;

    info!(lesson_id = %lesson.id, %module_id, "lesson created");
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[instrument(skip(state, payload))]
pub async fn update_lesson(
    State(state): State<AppState>,
    actor: Actor,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<UpdateLessonRequest>,
) -> Result<Json<Lesson>, ApiError> {
    actor.require(Capability::ManageContent)?;

    if let Some(video_id) = payload.video_id {
        repo::get_video(&state.db, video_id)
            .await?
            .ok_or(ApiError::NotFound("video"))?;
    }

    let lesson = repo::update_lesson(
        &state.db,
        lesson_id,
        payload.title.as_deref(),
        payload.content.as_deref(),
        payload.video_url.as_deref(),
        payload.position,
        payload.video_id,
    )
    .await?
    .ok_or(ApiError::NotFound("lesson"))?;
    Ok(Json(lesson))
}

#[instrument(skip(state))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    actor: Actor,
    Path(lesson_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    actor.require(Capability::ManageContent)?;

    if !repo::delete_lesson(&state.db, lesson_id).await? {
        return Err(ApiError::NotFound("lesson"));
    }
    info!(%lesson_id, "lesson deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- video writes ---

#[instrument(skip(state, payload))]
pub async fn create_video(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    actor.require(Capability::ManageContent)?;

    repo::get_module(&state.db, module_id)
        .await?
        .ok_or(ApiError::NotFound("module"))?;

    if payload.duration_seconds < 0 {
        return Err(ApiError::InvalidInput(
            "duration_seconds must not be negative".into(),
        ));
    }

    let video = repo::create_video(
        &state.db,
        module_id,
        payload.title.trim(),
        &payload.video_url,
        payload.duration_seconds,
        payload.position,
    )
    .await?;

    info!(video_id = %video.id, %module_id, "video created");
    Ok((StatusCode::CREATED, Json(video)))
}

#[instrument(skip(state, payload))]
pub async fn update_video(
    State(state): State<AppState>,
    actor: Actor,
    Path(video_id): Path<Uuid>,
    Json(payload): Json<UpdateVideoRequest>,
) -> Result<Json<Video>, ApiError> {
    actor.require(Capability::ManageContent)?;

    if payload.duration_seconds.is_some_and(|d| d < 0) {
        return Err(ApiError::InvalidInput(
            "duration_seconds must not be negative".into(),
        ));
    }

    let video = repo::update_video(
        &state.db,
        video_id,
        payload.title.as_deref(),
        payload.video_url.as_deref(),
        payload.duration_seconds,
        payload.position,
    )
    .await?
    .ok_or(ApiError::NotFound("video"))?;
    Ok(Json(video))
}

#[instrument(skip(state))]
pub async fn delete_video(
    State(state): State<AppState>,
    actor: Actor,
    Path(video_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    actor.require(Capability::ManageContent)?;

    if !repo::delete_video(&state.db, video_id).await? {
        return Err(ApiError::NotFound("video"));
    }
    info!(%video_id, "video deleted");
    Ok(StatusCode::NO_CONTENT)
}
