// src/handlers/entry_sheet.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::entry_sheet::{CreateEntrySheetRequest, EntrySheet, UpdateEntrySheetRequest},
    utils::{html::clean_html, jwt::Claims},
};

/// Lists the caller's entry sheets, newest first.
pub async fn list_entry_sheets(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let sheets: Vec<EntrySheet> = sqlx::query_as(
        r#"
        SELECT id, user_id, occupation, reason, self_pr, activities, strengths,
               created_at, updated_at
        FROM entry_sheets
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(sheets))
}

/// Creates an entry sheet for the caller. All free-text fields are
/// sanitized before storage.
pub async fn create_entry_sheet(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateEntrySheetRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;
    let id = Uuid::now_v7();

    sqlx::query(
        r#"
        INSERT INTO entry_sheets (id, user_id, occupation, reason, self_pr, activities, strengths)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(clean_html(&payload.occupation))
    .bind(clean_html(payload.reason.as_deref().unwrap_or_default()))
    .bind(clean_html(payload.self_pr.as_deref().unwrap_or_default()))
    .bind(clean_html(payload.activities.as_deref().unwrap_or_default()))
    .bind(clean_html(payload.strengths.as_deref().unwrap_or_default()))
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create entry sheet: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Updates one of the caller's entry sheets. Fields are optional; other
/// users' sheets are indistinguishable from missing ones.
pub async fn update_entry_sheet(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEntrySheetRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    if payload.occupation.is_none()
        && payload.reason.is_none()
        && payload.self_pr.is_none()
        && payload.activities.is_none()
        && payload.strengths.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE entry_sheets SET ");
    let mut separated = builder.separated(", ");

    if let Some(occupation) = payload.occupation {
        separated.push("occupation = ");
        separated.push_bind_unseparated(clean_html(&occupation));
    }

    if let Some(reason) = payload.reason {
        separated.push("reason = ");
        separated.push_bind_unseparated(clean_html(&reason));
    }

    if let Some(self_pr) = payload.self_pr {
        separated.push("self_pr = ");
        separated.push_bind_unseparated(clean_html(&self_pr));
    }

    if let Some(activities) = payload.activities {
        separated.push("activities = ");
        separated.push_bind_unseparated(clean_html(&activities));
    }

    if let Some(strengths) = payload.strengths {
        separated.push("strengths = ");
        separated.push_bind_unseparated(clean_html(&strengths));
    }

    separated.push("updated_at = now()");

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" AND user_id = ");
    builder.push_bind(user_id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update entry sheet: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Entry sheet not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes one of the caller's entry sheets.
pub async fn delete_entry_sheet(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let result = sqlx::query("DELETE FROM entry_sheets WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Entry sheet not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
