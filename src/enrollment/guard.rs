use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::jwt::Actor;
use crate::catalog::repo as catalog;
use crate::enrollment::repo;
use crate::error::ApiError;

/// Enrollment gate for course-scoped content. Callers whose capability set
/// bypasses enrollment (admins) pass unconditionally.
pub async fn require_course_access(
    db: &PgPool,
    actor: &Actor,
    course_id: Uuid,
) -> Result<(), ApiError> {
    if actor.caps.bypass_enrollment {
        return Ok(());
    }
    if repo::is_active_enrollment(db, actor.id, course_id).await? {
        Ok(())
    } else {
        Err(ApiError::NotEnrolled)
    }
}

/// Same gate keyed by module; resolves the owning course first.
/// Returns the course id so callers can reuse the lookup.
pub async fn require_module_access(
    db: &PgPool,
    actor: &Actor,
    module_id: Uuid,
) -> Result<Uuid, ApiError> {
    let course_id = catalog::course_id_of_module(db, module_id)
        .await?
        .ok_or(ApiError::NotFound("module"))?;
    require_course_access(db, actor, course_id).await?;
    Ok(course_id)
}
