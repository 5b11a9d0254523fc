use serde::Serialize;
use uuid::Uuid;

use super::repo::{CourseSummary, TopStudent};

#[derive(Debug, Serialize)]
pub struct CourseAnalytics {
    pub course_id: Uuid,
    pub enrollments: i64,
    pub modules: i64,
    pub quizzes: i64,
    pub certificates_issued: i64,
}

#[derive(Debug, Serialize)]
pub struct PassFailStats {
    pub course_id: Uuid,
    pub total_attempts: i64,
    pub passed: i64,
    pub failed: i64,
    pub pass_percentage: i64,
}

#[derive(Debug, Serialize)]
pub struct TopStudents {
    pub course_id: Uuid,
    pub top: Vec<TopStudent>,
}

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub total_courses: i64,
    pub total_users: i64,
    pub total_enrollments: i64,
    pub recent_courses: Vec<CourseSummary>,
}
