use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct EnrollmentStatus {
    pub enrolled: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdminEnrollRequest {
    pub user_id: Uuid,
}
