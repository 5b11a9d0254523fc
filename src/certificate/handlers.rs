use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::jwt::Actor;
use crate::catalog::repo as catalog;
use crate::enrollment::repo as enrollment;
use crate::error::ApiError;
use crate::quiz::repo as quiz;
use crate::state::AppState;

use super::repo;
use super::repo::Certificate;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/courses/:course_id/certificate",
        get(get_certificate).post(issue_certificate),
    )
}

/// Idempotent issuance: an active enrollment and one passing quiz attempt
/// under the course gate the first issue; repeat calls return the original
/// certificate unchanged.
#[instrument(skip(state))]
pub async fn issue_certificate(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Certificate>), ApiError> {
    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    if !enrollment::is_active_enrollment(&state.db, actor.id, course_id).await? {
        return Err(ApiError::NotEnrolled);
    }
    if !quiz::has_passing_attempt(&state.db, actor.id, course_id).await? {
        return Err(ApiError::QuizNotPassed);
    }

    let candidate = repo::new_certificate_id();
    let certificate = repo::get_or_create(&state.db, actor.id, course_id, &candidate).await?;

    let created = certificate.certificate_id == candidate;
    if created {
        info!(
            user_id = %actor.id,
            %course_id,
            certificate_id = %certificate.certificate_id,
            "certificate issued"
        );
    }

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(certificate)))
}

#[instrument(skip(state))]
pub async fn get_certificate(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<Certificate>, ApiError> {
    let certificate = repo::find(&state.db, actor.id, course_id)
        .await?
        .ok_or(ApiError::NotFound("certificate"))?;
    Ok(Json(certificate))
}
