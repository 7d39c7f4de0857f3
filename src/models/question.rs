// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use uuid::Uuid;
use validator::Validate;

/// Represents the 'questions' table in the database.
///
/// Master questions for both practice-exam kinds ('spi' and 'cabgab'),
/// tagged by category (e.g. "verbal", "non-verbal", "math").
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,

    /// Exam kind this question belongs to: 'spi' or 'cabgab'.
    pub exam_kind: String,

    /// Sampling category within the kind.
    pub category: String,

    /// The text content of the question.
    pub content: String,

    /// The four answer choices, stored as a JSON array.
    pub choices: Json<Vec<String>>,

    /// Index of the correct choice, 1-based (1..=4).
    pub correct_choice: i32,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a question to an exam taker (excludes the correct choice).
#[derive(Debug, Serialize, FromRow)]
pub struct PublicQuestion {
    pub id: Uuid,
    pub exam_kind: String,
    pub category: String,
    pub content: String,
    pub choices: Json<Vec<String>>,
}

/// DTO for creating a new question.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(custom(function = validate_exam_kind))]
    pub exam_kind: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    #[validate(custom(function = validate_choices))]
    pub choices: Vec<String>,
    #[validate(range(min = 1, max = 4))]
    pub correct_choice: i32,
}

/// DTO for updating a question. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub category: Option<String>,
    pub content: Option<String>,
    pub choices: Option<Vec<String>>,
    pub correct_choice: Option<i32>,
}

pub fn validate_exam_kind(kind: &str) -> Result<(), validator::ValidationError> {
    match kind {
        "spi" | "cabgab" => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_exam_kind")),
    }
}

pub fn validate_choices(choices: &[String]) -> Result<(), validator::ValidationError> {
    if choices.len() != 4 {
        return Err(validator::ValidationError::new("exactly_four_choices_required"));
    }
    for choice in choices {
        if choice.is_empty() || choice.len() > 500 {
            return Err(validator::ValidationError::new("choice_length_invalid"));
        }
    }
    Ok(())
}
