// src/handlers/goal.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::goal::{Goal, GoalResponse, SaveGoalRequest, remaining_days},
    utils::jwt::Claims,
};

/// Returns the caller's goal with the countdown to its target date,
/// or null when none is set.
pub async fn get_goal(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let goal: Option<Goal> = sqlx::query_as(
        "SELECT id, user_id, content, goal_date, updated_at FROM goals WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?;

    let response = goal.map(|g| {
        let today = chrono::Utc::now().date_naive();
        GoalResponse {
            id: g.id,
            content: g.content,
            goal_date: g.goal_date,
            remaining_days: g.goal_date.map(|d| remaining_days(today, d)),
        }
    });

    Ok(Json(response))
}

/// Sets or replaces the caller's goal (one goal per user).
pub async fn save_goal(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SaveGoalRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;

    sqlx::query(
        r#"
        INSERT INTO goals (id, user_id, content, goal_date)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id) DO UPDATE SET
            content = EXCLUDED.content,
            goal_date = EXCLUDED.goal_date,
            updated_at = now()
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(&payload.content)
    .bind(payload.goal_date)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save goal: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(serde_json::json!({ "status": "success" })))
}
