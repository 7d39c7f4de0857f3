// src/models/goal.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents the 'goals' table. One goal per user, upserted on save.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub goal_date: Option<chrono::NaiveDate>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Goal plus the number of days left until its target date.
#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub id: Uuid,
    pub content: String,
    pub goal_date: Option<chrono::NaiveDate>,
    pub remaining_days: Option<i64>,
}

/// DTO for setting or replacing the user's goal.
#[derive(Debug, Deserialize, Validate)]
pub struct SaveGoalRequest {
    #[validate(length(min = 1, max = 1000))]
    pub content: String,
    pub goal_date: Option<chrono::NaiveDate>,
}

/// Days from `today` to `target`, clamped at zero for past dates.
pub fn remaining_days(today: chrono::NaiveDate, target: chrono::NaiveDate) -> i64 {
    (target - today).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn counts_days_until_target() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let target = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        assert_eq!(remaining_days(today, target), 31);
    }

    #[test]
    fn past_dates_clamp_to_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let target = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert_eq!(remaining_days(today, target), 0);
    }
}
