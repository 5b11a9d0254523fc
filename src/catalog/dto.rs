use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_premium: bool,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_premium: Option<bool>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateModuleRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateModuleRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default = "default_position")]
    pub position: i32,
    pub video_id: Option<Uuid>,
}

fn default_position() -> i32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub position: Option<i32>,
    pub video_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub video_url: String,
    pub duration_seconds: i32,
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateVideoRequest {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub position: Option<i32>,
}
