// src/handlers/exam.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::exam::{
        ExamHistory, ExamHistorySummary, ExamResultResponse, SaveAnswerRequest, SlotResult,
        StartExamRequest, accuracy_rate,
    },
    utils::jwt::Claims,
};

#[derive(Debug, Deserialize)]
pub struct ExamKindQuery {
    pub exam_kind: Option<String>,
}

/// Starts a new exam session.
///
/// Inside one transaction: inserts the history row, then for each quota
/// entry (in request order) samples that many random questions of the
/// category without replacement and pre-creates one empty detail row per
/// question, slot numbers forming a contiguous 1..N sequence. A category
/// with too few questions aborts the whole start.
pub async fn start_exam(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<StartExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;
    let session_id = Uuid::now_v7();

    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO exam_histories (id, user_id, exam_kind) VALUES ($1, $2, $3)")
        .bind(session_id)
        .bind(user_id)
        .bind(&payload.exam_kind)
        .execute(&mut *tx)
        .await?;

    let mut slot_number: i32 = 1;

    for quota in &payload.quota {
        // Uniform sample without replacement within the category.
        let sampled: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM questions
            WHERE exam_kind = $1 AND category = $2
            ORDER BY random()
            LIMIT $3
            "#,
        )
        .bind(&payload.exam_kind)
        .bind(&quota.category)
        .bind(quota.count)
        .fetch_all(&mut *tx)
        .await?;

        if (sampled.len() as i64) < quota.count {
            // Dropping the transaction rolls back the history insert.
            return Err(AppError::InsufficientQuestions {
                category: quota.category.clone(),
                requested: quota.count,
                available: sampled.len() as i64,
            });
        }

        for (question_id,) in sampled {
            sqlx::query(
                r#"
                INSERT INTO exam_details (id, history_id, question_id, slot_number)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(session_id)
            .bind(question_id)
            .bind(slot_number)
            .execute(&mut *tx)
            .await?;
            slot_number += 1;
        }
    }

    tx.commit().await?;

    tracing::info!(
        "Exam session started: session={} user={} slots={}",
        session_id,
        user_id,
        slot_number - 1
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "session_id": session_id })),
    ))
}

/// Fetches a history row, enforcing that it belongs to the caller.
async fn find_own_history(
    pool: &PgPool,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<ExamHistory, AppError> {
    let history: Option<ExamHistory> = sqlx::query_as(
        "SELECT id, user_id, exam_kind, is_finished, created_at FROM exam_histories WHERE id = $1",
    )
    .bind(session_id)
    .fetch_optional(pool)
    .await?;

    match history {
        Some(h) if h.user_id == user_id => Ok(h),
        // Hide other users' sessions behind the same 404.
        _ => Err(AppError::NotFound("Exam session not found".to_string())),
    }
}

/// Records the answer for one slot.
///
/// Correctness is judged against the question's stored correct choice at
/// save time. Re-saving the same slot overwrites the previous answer
/// (last write wins, no locking).
pub async fn save_answer(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path((session_id, slot_number)): Path<(Uuid, i32)>,
    Json(payload): Json<SaveAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.user_id()?;
    let history = find_own_history(&pool, session_id, user_id).await?;

    if history.is_finished {
        return Err(AppError::BadRequest(
            "Exam session is already finished".to_string(),
        ));
    }

    let slot: Option<(Uuid, i32)> = sqlx::query_as(
        r#"
        SELECT d.id, q.correct_choice
        FROM exam_details d
        JOIN questions q ON d.question_id = q.id
        WHERE d.history_id = $1 AND d.slot_number = $2
        "#,
    )
    .bind(session_id)
    .bind(slot_number)
    .fetch_optional(&pool)
    .await?;

    let (detail_id, correct_choice) =
        slot.ok_or(AppError::NotFound("Slot not found".to_string()))?;

    let is_correct = payload.answer == correct_choice;

    sqlx::query("UPDATE exam_details SET user_answer = $1, is_correct = $2 WHERE id = $3")
        .bind(payload.answer)
        .bind(is_correct)
        .bind(detail_id)
        .execute(&pool)
        .await?;

    Ok(Json(serde_json::json!({ "is_correct": is_correct })))
}

/// Marks the session finished. Terminal and idempotent: a second call
/// changes nothing, and detail rows are never touched here. The score is
/// computed when results are read, not stored.
pub async fn finish_exam(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    find_own_history(&pool, session_id, user_id).await?;

    sqlx::query("UPDATE exam_histories SET is_finished = TRUE WHERE id = $1")
        .bind(session_id)
        .execute(&pool)
        .await?;

    Ok(StatusCode::OK)
}

/// Returns the caller's most recent unfinished session id, or null.
pub async fn get_in_progress(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ExamKindQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let session: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id FROM exam_histories
        WHERE user_id = $1
          AND is_finished = FALSE
          AND ($2::TEXT IS NULL OR exam_kind = $2)
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(&params.exam_kind)
    .fetch_optional(&pool)
    .await?;

    Ok(Json(
        serde_json::json!({ "session_id": session.map(|(id,)| id) }),
    ))
}

/// Returns 1 + the number of answered slots, i.e. where a resumed
/// session should continue.
pub async fn get_next_slot(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    find_own_history(&pool, session_id, user_id).await?;

    let (answered,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM exam_details WHERE history_id = $1 AND user_answer IS NOT NULL",
    )
    .bind(session_id)
    .fetch_one(&pool)
    .await?;

    Ok(Json(serde_json::json!({ "next_slot": answered + 1 })))
}

/// Per-slot results joined with the question master, ordered by slot,
/// plus the aggregate score computed at read time.
pub async fn get_results(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let history = find_own_history(&pool, session_id, user_id).await?;

    let slots: Vec<SlotResult> = sqlx::query_as(
        r#"
        SELECT
            d.slot_number,
            d.question_id,
            q.content,
            q.choices,
            d.user_answer,
            q.correct_choice,
            d.is_correct
        FROM exam_details d
        JOIN questions q ON d.question_id = q.id
        WHERE d.history_id = $1
        ORDER BY d.slot_number ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(&pool)
    .await?;

    let total = slots.len() as i64;
    let correct_count = slots.iter().filter(|s| s.is_correct).count() as i64;

    Ok(Json(ExamResultResponse {
        session_id,
        is_finished: history.is_finished,
        total,
        correct_count,
        accuracy_rate: accuracy_rate(correct_count, total),
        slots,
    }))
}

/// All of the caller's exam histories, newest first, with per-history
/// counts computed by subqueries.
pub async fn get_history_list(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<ExamKindQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let histories: Vec<ExamHistorySummary> = sqlx::query_as(
        r#"
        SELECT
            h.id,
            h.exam_kind,
            h.is_finished,
            (SELECT COUNT(*) FROM exam_details WHERE history_id = h.id) AS total,
            (SELECT COUNT(*) FROM exam_details WHERE history_id = h.id AND is_correct) AS correct_count,
            h.created_at
        FROM exam_histories h
        WHERE h.user_id = $1
          AND ($2::TEXT IS NULL OR h.exam_kind = $2)
        ORDER BY h.created_at DESC, h.id DESC
        "#,
    )
    .bind(user_id)
    .bind(&params.exam_kind)
    .fetch_all(&pool)
    .await?;

    Ok(Json(histories))
}
