use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::auth::jwt::Actor;
use crate::catalog::repo as catalog;
use crate::enrollment::guard;
use crate::error::ApiError;
use crate::progress::aggregate::{self, CourseProgress, ModuleProgress};
use crate::progress::dto::{CompletedVideos, UpdateProgressRequest};
use crate::progress::repo;
use crate::progress::repo::VideoProgress;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/videos/:video_id/progress",
            get(get_progress).post(update_progress),
        )
        .route("/courses/:course_id/progress", get(course_progress))
        .route(
            "/courses/:course_id/progress/modules",
            get(module_progress),
        )
        .route(
            "/modules/:module_id/completed-videos",
            get(completed_videos),
        )
}

async fn require_video_access(
    state: &AppState,
    actor: &Actor,
    video_id: Uuid,
) -> Result<(), ApiError> {
    let course_id = catalog::course_id_of_video(&state.db, video_id)
        .await?
        .ok_or(ApiError::NotFound("video"))?;
    guard::require_course_access(&state.db, actor, course_id).await
}

/// Resume point for the player; creates the row on first access.
#[instrument(skip(state))]
pub async fn get_progress(
    State(state): State<AppState>,
    actor: Actor,
    Path(video_id): Path<Uuid>,
) -> Result<Json<VideoProgress>, ApiError> {
    require_video_access(&state, &actor, video_id).await?;
    let progress = repo::get_or_create(&state.db, actor.id, video_id).await?;
    Ok(Json(progress))
}

#[instrument(skip(state, payload))]
pub async fn update_progress(
    State(state): State<AppState>,
    actor: Actor,
    Path(video_id): Path<Uuid>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<Json<VideoProgress>, ApiError> {
    require_video_access(&state, &actor, video_id).await?;

    if payload.watched_seconds < 0 {
        return Err(ApiError::InvalidInput(
            "watched_seconds must not be negative".into(),
        ));
    }

    let progress = repo::update(
        &state.db,
        actor.id,
        video_id,
        payload.watched_seconds,
        payload.is_completed,
    )
    .await?;

    debug!(
        user_id = %actor.id,
        %video_id,
        watched_seconds = progress.watched_seconds,
        is_completed = progress.is_completed,
        "video progress updated"
    );
    Ok(Json(progress))
}

#[instrument(skip(state))]
pub async fn course_progress(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseProgress>, ApiError> {
    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    let progress = aggregate::compute_course_progress(&state.db, actor.id, course_id).await?;
    Ok(Json(progress))
}

/// Module-quiz-count completion variant, kept behind its own endpoint.
#[instrument(skip(state))]
pub async fn module_progress(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<ModuleProgress>, ApiError> {
    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    let progress = aggregate::compute_module_progress(&state.db, actor.id, course_id).await?;
    Ok(Json(progress))
}

#[instrument(skip(state))]
pub async fn completed_videos(
    State(state): State<AppState>,
    actor: Actor,
    Path(module_id): Path<Uuid>,
) -> Result<Json<CompletedVideos>, ApiError> {
    catalog::get_module(&state.db, module_id)
        .await?
        .ok_or(ApiError::NotFound("module"))?;
    let completed_video_ids = repo::completed_video_ids(&state.db, actor.id, module_id).await?;
    Ok(Json(CompletedVideos {
        completed_video_ids,
    }))
}
