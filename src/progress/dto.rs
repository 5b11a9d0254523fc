use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    #[serde(default)]
    pub watched_seconds: i32,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct CompletedVideos {
    pub completed_video_ids: Vec<Uuid>,
}
