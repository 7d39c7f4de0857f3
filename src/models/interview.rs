// src/models/interview.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Represents the 'interview_logs' table: the persisted outcome of one
/// finished mock-interview session.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InterviewLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expression_score: i32,
    pub eyes_score: i32,
    pub posture_score: i32,
    pub speech_speed_score: i32,
    pub total_score: i32,
    pub comment: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for starting a mock-interview session.
/// An empty or missing question list falls back to the defaults.
#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub questions: Option<Vec<String>>,
}

/// Base64 frame payload forwarded to the analysis service.
#[derive(Debug, Deserialize)]
pub struct AnalyzeFrameRequest {
    pub image: String,
}

/// Base64 audio payload forwarded to the analysis service.
#[derive(Debug, Deserialize)]
pub struct AnalyzeAudioRequest {
    pub audio: String,
}
