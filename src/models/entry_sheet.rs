// src/models/entry_sheet.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'entry_sheets' table: one entry-sheet draft per target
/// occupation, authored by the user.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct EntrySheet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub occupation: String,
    pub reason: String,
    pub self_pr: String,
    pub activities: String,
    pub strengths: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating an entry sheet.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEntrySheetRequest {
    #[validate(length(min = 1, max = 100))]
    pub occupation: String,
    #[validate(length(max = 4000))]
    pub reason: Option<String>,
    #[validate(length(max = 4000))]
    pub self_pr: Option<String>,
    #[validate(length(max = 4000))]
    pub activities: Option<String>,
    #[validate(length(max = 4000))]
    pub strengths: Option<String>,
}

/// DTO for updating an entry sheet. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateEntrySheetRequest {
    pub occupation: Option<String>,
    pub reason: Option<String>,
    pub self_pr: Option<String>,
    pub activities: Option<String>,
    pub strengths: Option<String>,
}
