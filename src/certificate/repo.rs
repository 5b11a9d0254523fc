use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Certificate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    pub certificate_id: String,
    pub issued_at: OffsetDateTime,
}

/// Opaque, globally unique certificate token.
pub fn new_certificate_id() -> String {
    format!("CERT-{}", Uuid::new_v4().simple())
}

/// Atomic get-or-create keyed by (user, course). The candidate token is only
/// used when no certificate exists yet; the no-op conflict update returns the
/// already-issued row, so repeat calls yield the same certificate_id.
pub async fn get_or_create(
    db: &PgPool,
    user_id: Uuid,
    course_id: Uuid,
    candidate_id: &str,
) -> sqlx::Result<Certificate> {
    sqlx::query_as::<_, Certificate>(
        r#"
        INSERT INTO certificates (user_id, course_id, certificate_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, course_id) DO UPDATE SET user_id = certificates.user_id
        RETURNING id, user_id, course_id, certificate_id, issued_at
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(candidate_id)
    .fetch_one(db)
    .await
}

pub async fn find(db: &PgPool, user_id: Uuid, course_id: Uuid) -> sqlx::Result<Option<Certificate>> {
    sqlx::query_as::<_, Certificate>(
        r#"
        SELECT id, user_id, course_id, certificate_id, issued_at
        FROM certificates
        WHERE user_id = $1 AND course_id = $2
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_ids_are_prefixed_and_unique() {
        let a = new_certificate_id();
        let b = new_certificate_id();
        assert!(a.starts_with("CERT-"));
        assert!(b.starts_with("CERT-"));
        assert_ne!(a, b);
    }
}
