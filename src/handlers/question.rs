// src/handlers/question.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppError, models::question::PublicQuestion};

#[derive(Debug, Deserialize)]
pub struct QuestionListParams {
    pub exam_kind: Option<String>,
    pub category: Option<String>,
}

/// Lists master questions, optionally filtered by kind and category.
/// The correct choice is hidden by the DTO; exam takers never see it.
pub async fn list_questions(
    State(pool): State<PgPool>,
    Query(params): Query<QuestionListParams>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<PublicQuestion> = sqlx::query_as(
        r#"
        SELECT id, exam_kind, category, content, choices
        FROM questions
        WHERE ($1::TEXT IS NULL OR exam_kind = $1)
          AND ($2::TEXT IS NULL OR category = $2)
        ORDER BY exam_kind, category, id
        "#,
    )
    .bind(&params.exam_kind)
    .bind(&params.category)
    .fetch_all(&pool)
    .await?;

    Ok(Json(questions))
}

/// Fetches one question without its answer key.
pub async fn get_question(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let question: Option<PublicQuestion> = sqlx::query_as(
        "SELECT id, exam_kind, category, content, choices FROM questions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?;

    let question = question.ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}
