use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::analytics::dto::{CourseAnalytics, DashboardStats, PassFailStats, TopStudents};
use crate::analytics::repo;
use crate::auth::{jwt::Actor, rbac::Capability};
use crate::catalog::repo as catalog;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(dashboard_stats))
        .route(
            "/admin/courses/:course_id/analytics",
            get(course_analytics),
        )
        .route(
            "/admin/courses/:course_id/pass-fail-stats",
            get(pass_fail_stats),
        )
        .route(
            "/admin/courses/:course_id/top-students",
            get(top_students),
        )
}

fn percentage(part: i64, whole: i64) -> i64 {
    if whole > 0 {
        part * 100 / whole
    } else {
        0
    }
}

#[instrument(skip(state))]
pub async fn course_analytics(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseAnalytics>, ApiError> {
    actor.require(Capability::ViewReports)?;

    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let enrollments = repo::count_active_enrollments(&state.db, course_id).await?;
    let modules = catalog::count_modules(&state.db, course_id).await?;
    let quizzes = repo::count_quizzes(&state.db, course_id).await?;
    let certificates_issued = repo::count_certificates(&state.db, course_id).await?;

    Ok(Json(CourseAnalytics {
        course_id,
        enrollments,
        modules,
        quizzes,
        certificates_issued,
    }))
}

#[instrument(skip(state))]
pub async fn pass_fail_stats(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<PassFailStats>, ApiError> {
    actor.require(Capability::ViewReports)?;

    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let (total_attempts, passed) = repo::attempt_counts(&state.db, course_id).await?;

    Ok(Json(PassFailStats {
        course_id,
        total_attempts,
        passed,
        failed: total_attempts - passed,
        pass_percentage: percentage(passed, total_attempts),
    }))
}

#[instrument(skip(state))]
pub async fn top_students(
    State(state): State<AppState>,
    actor: Actor,
    Path(course_id): Path<Uuid>,
) -> Result<Json<TopStudents>, ApiError> {
    actor.require(Capability::ViewReports)?;

    catalog::get_course(&state.db, course_id)
        .await?
        .ok_or(ApiError::NotFound("course"))?;

    let top = repo::top_students(&state.db, course_id).await?;
    Ok(Json(TopStudents { course_id, top }))
}

#[instrument(skip(state))]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<DashboardStats>, ApiError> {
    actor.require(Capability::ViewReports)?;

    let total_courses = repo::count_courses(&state.db).await?;
    let total_users = repo::count_users(&state.db).await?;
    let total_enrollments = repo::count_enrollments(&state.db).await?;
    let recent_courses = repo::recent_courses(&state.db, 5).await?;

    Ok(Json(DashboardStats {
        total_courses,
        total_users,
        total_enrollments,
        recent_courses,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_is_floored_and_zero_safe() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(3, 3), 100);
    }
}
