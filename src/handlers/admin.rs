// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        question::{CreateQuestionRequest, Question, UpdateQuestionRequest, validate_choices},
        user::User,
    },
    utils::{hash::hash_password, jwt::Claims},
};

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    /// Optional partial-match name search.
    pub q: Option<String>,
}

/// Lists users, optionally filtered by a name keyword.
/// Admin only.
pub async fn list_users(
    State(pool): State<PgPool>,
    Query(params): Query<UserListParams>,
) -> Result<impl IntoResponse, AppError> {
    let keyword = params.q.filter(|k| !k.trim().is_empty());

    let users: Vec<User> = sqlx::query_as(
        r#"
        SELECT id, email, name, password, role, is_valid, created_at
        FROM users
        WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%')
        ORDER BY created_at DESC
        "#,
    )
    .bind(&keyword)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(users))
}

/// DTO for Admin creating a user (can specify role).
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: String, // 'user' or 'admin'
}

/// Creates a new user with specific role.
/// Admin only.
pub async fn create_user(
    State(pool): State<PgPool>,
    Json(payload): Json<AdminCreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;
    let id = Uuid::now_v7();

    sqlx::query("INSERT INTO users (id, email, name, password, role) VALUES ($1, $2, $3, $4, $5)")
        .bind(id)
        .bind(&payload.email)
        .bind(&payload.name)
        .bind(&hashed_password)
        .bind(&payload.role)
        .execute(&pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
                AppError::Conflict(format!("Email '{}' is already registered", payload.email))
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::InternalServerError(e.to_string())
            }
        })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// DTO for updating a user. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_valid: Option<bool>,
    pub password: Option<String>,
}

/// Updates user information.
/// Admin only.
pub async fn update_user(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.is_none()
        && payload.name.is_none()
        && payload.role.is_none()
        && payload.is_valid.is_none()
        && payload.password.is_none()
    {
        return Ok(StatusCode::OK);
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut separated = builder.separated(", ");

    if let Some(email) = payload.email {
        separated.push("email = ");
        separated.push_bind_unseparated(email);
    }

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(role) = payload.role {
        separated.push("role = ");
        separated.push_bind_unseparated(role);
    }

    if let Some(is_valid) = payload.is_valid {
        separated.push("is_valid = ");
        separated.push_bind_unseparated(is_valid);
    }

    if let Some(password) = payload.password {
        let hashed = hash_password(&password)?;
        separated.push("password = ");
        separated.push_bind_unseparated(hashed);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict("Email is already registered".to_string())
        } else {
            tracing::error!("Failed to update user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a user by ID.
/// Admin only. Prevents deleting self.
pub async fn delete_user(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    // Prevent self-deletion
    if id == claims.user_id()? {
        return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Creates a new master question.
/// Admin only.
pub async fn create_question(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    // Serialize choices as JSON
    let choices_json = serde_json::to_value(payload.choices).unwrap_or_default();
    let id = Uuid::now_v7();

    sqlx::query(
        r#"
        INSERT INTO questions (id, exam_kind, category, content, choices, correct_choice)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(&payload.exam_kind)
    .bind(&payload.category)
    .bind(&payload.content)
    .bind(&choices_json)
    .bind(payload.correct_choice)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({"id": id}))))
}

/// Fetches one question including its answer key.
/// Admin only.
pub async fn get_question(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let question: Option<Question> = sqlx::query_as(
        r#"
        SELECT id, exam_kind, category, content, choices, correct_choice, created_at
        FROM questions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?;

    let question = question.ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Updates a question by ID.
/// Admin only.
pub async fn update_question(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.category.is_none()
        && payload.content.is_none()
        && payload.choices.is_none()
        && payload.correct_choice.is_none()
    {
        return Ok(StatusCode::OK);
    }

    if let Some(choices) = &payload.choices {
        if validate_choices(choices).is_err() {
            return Err(AppError::BadRequest(
                "Exactly four non-empty choices are required".to_string(),
            ));
        }
    }

    if let Some(correct) = payload.correct_choice {
        if !(1..=4).contains(&correct) {
            return Err(AppError::BadRequest(
                "correct_choice must be between 1 and 4".to_string(),
            ));
        }
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE questions SET ");
    let mut separated = builder.separated(", ");

    if let Some(category) = payload.category {
        separated.push("category = ");
        separated.push_bind_unseparated(category);
    }

    if let Some(content) = payload.content {
        separated.push("content = ");
        separated.push_bind_unseparated(content);
    }

    if let Some(choices) = payload.choices {
        separated.push("choices = ");
        separated.push_bind_unseparated(serde_json::to_value(choices).unwrap_or_default());
    }

    if let Some(correct_choice) = payload.correct_choice {
        separated.push("correct_choice = ");
        separated.push_bind_unseparated(correct_choice);
    }

    builder.push(" WHERE id = ");
    builder.push_bind(id);

    let result = builder.build().execute(&pool).await.map_err(|e| {
        tracing::error!("Failed to update question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::OK)
}

/// Deletes a master question by ID.
/// Admin only.
///
/// The FK cascade also removes detail rows that reference the question,
/// including rows of finished histories, whose results then shrink.
pub async fn delete_question(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
