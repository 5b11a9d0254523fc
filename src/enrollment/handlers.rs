use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::auth::{jwt::Actor, rbac::Capability};
use crate::catalog::repo as catalog;
use crate::enrollment::dto::{AdminEnrollRequest, EnrollmentStatus};
use crate::enrollment::repo;
use crate::enrollment::repo::EnrolledCourse;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/:course_id/enroll",
            post(enroll_self).get(enrollment_status),
        )
        .route("/me/enrollments", get(my_enrollments))
        .route("/admin/courses/:course_id/enrollments", post(admin_enroll))
        .route(
            "/admin/courses/:course_id/enrollments/:user_id",
            delete(admin_deactivate),
        )
}

/// Self-service enrollment, students only. Repeat calls report "already
/// enrolled" instead of erroring.
#[instrument(skip(state))]
pub async fn enroll_self(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    actor.require(Capability::EnrollSelf)?;

    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let (enrollment, created) = repo::enroll(&state.db, actor.id, course_id).await?;

    if !created {
        return Ok((StatusCode::OK, Json(json!({ "message": "Already enrolled" }))).into_response());
    }

    info!(user_id = %actor.id, %course_id, "student enrolled");
    Ok((StatusCode::CREATED, Json(enrollment)).into_response())
}

#[instrument(skip(state))]
pub async fn enrollment_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<EnrollmentStatus>, ApiError> {
    let enrolled = repo::is_active_enrollment(&state.db, actor.id, course_id).await?;
    Ok(Json(EnrollmentStatus { enrolled }))
}

#[instrument(skip(state))]
pub async fn my_enrollments(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<EnrolledCourse>>, ApiError> {
    let enrollments = repo::my_enrollments(&state.db, actor.id).await?;
    Ok(Json(enrollments))
}

/// Admin-initiated enrollment of an arbitrary user; the student-role check of
/// the self-service path does not apply here.
#[instrument(skip(state, payload))]
pub async fn admin_enroll(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<AdminEnrollRequest>,
) -> Result<Response, ApiError> {
    actor.require(Capability::ManageUsers)?;

    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;
    crate::auth::repo::find_by_id(&state.db, payload.user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let (enrollment, created) = repo::enroll(&state.db, payload.user_id, course_id).await?;

    if !created {
        return Ok((StatusCode::OK, Json(json!({ "message": "Already enrolled" }))).into_response());
    }

    info!(user_id = %payload.user_id, %course_id, admin_id = %actor.id, "user enrolled by admin");
    Ok((StatusCode::CREATED, Json(enrollment)).into_response())
}

#[instrument(skip(state))]
pub async fn admin_deactivate(
    State(state): State<AppState>,
    actor: Actor,
    Path((course_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    actor.require(Capability::ManageUsers)?;

    if !repo::deactivate(&state.db, user_id, course_id).await? {
        return Err(ApiError::NotFound("enrollment"));
    }
    info!(%user_id, %course_id, "enrollment deactivated");
    Ok(StatusCode::NO_CONTENT)
}
