// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;
use validator::Validate;

use crate::models::question::validate_exam_kind;

/// Represents the 'exam_histories' table: one attempt at an exam,
/// from session start to finish.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ExamHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exam_kind: String,
    pub is_finished: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Requested question count for one category of a new session.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CategoryQuota {
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(range(min = 1, max = 200))]
    pub count: i64,
}

/// DTO for starting a new exam session.
///
/// Quota entries are processed in request order; that order fixes the
/// category blocks of the generated slot sequence. Each category may
/// appear at most once: blocks sample independently, so a repeated
/// category could draw the same question into two slots.
#[derive(Debug, Deserialize, Validate)]
pub struct StartExamRequest {
    #[validate(custom(function = validate_exam_kind))]
    pub exam_kind: String,
    #[validate(length(min = 1), nested, custom(function = validate_quota_categories))]
    pub quota: Vec<CategoryQuota>,
}

pub fn validate_quota_categories(
    quota: &[CategoryQuota],
) -> Result<(), validator::ValidationError> {
    let mut seen = std::collections::HashSet::new();
    for entry in quota {
        if !seen.insert(entry.category.as_str()) {
            return Err(validator::ValidationError::new("duplicate_category"));
        }
    }
    Ok(())
}

/// DTO for answering one slot.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveAnswerRequest {
    #[validate(range(min = 1, max = 4))]
    pub answer: i32,
}

/// One row of a session result: a detail slot joined with its question.
#[derive(Debug, Serialize, FromRow)]
pub struct SlotResult {
    pub slot_number: i32,
    pub question_id: Uuid,
    pub content: String,
    pub choices: Json<Vec<String>>,
    pub user_answer: Option<i32>,
    pub correct_choice: i32,
    pub is_correct: bool,
}

/// Full session result: per-slot rows plus the read-time aggregate.
#[derive(Debug, Serialize)]
pub struct ExamResultResponse {
    pub session_id: Uuid,
    pub is_finished: bool,
    pub total: i64,
    pub correct_count: i64,
    pub accuracy_rate: f64,
    pub slots: Vec<SlotResult>,
}

/// One entry of a user's exam history list, counts computed on read.
#[derive(Debug, Serialize, FromRow)]
pub struct ExamHistorySummary {
    pub id: Uuid,
    pub exam_kind: String,
    pub is_finished: bool,
    pub total: i64,
    pub correct_count: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Percentage of correct answers, rounded half-up to two decimals.
/// Matches how finished sessions have always been scored: 2/3 -> 66.67.
pub fn accuracy_rate(correct: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64;
    (raw * 10_000.0).round() / 100.0
}
