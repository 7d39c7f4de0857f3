// src/handlers/interview.rs

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppError,
    interview::{
        client::InterviewClient,
        feedback::{self, InterviewFeedback},
        session::InterviewSessions,
    },
    models::interview::{AnalyzeAudioRequest, AnalyzeFrameRequest, InterviewLog, StartInterviewRequest},
    utils::jwt::Claims,
};

// The proxy is best-effort: a remote failure is logged once and reported
// to the client as a normal error envelope, never as a 5xx.

fn unavailable(message: &str) -> Json<serde_json::Value> {
    Json(json!({
        "status": "error",
        "message": message,
    }))
}

/// Starts a mock-interview session: registers the question script in
/// memory and tells the analysis service to begin.
pub async fn start_session(
    State(client): State<InterviewClient>,
    State(sessions): State<InterviewSessions>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<StartInterviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let session_id = sessions.start(user_id, payload.questions);

    if let Err(e) = client.start().await {
        tracing::warn!("Interview analysis start failed: {}", e);
        sessions.clear(user_id);
        return Ok(unavailable("Interview analysis service is unavailable").into_response());
    }

    tracing::info!("Interview session started: user={} session={}", user_id, session_id);

    Ok(Json(json!({
        "status": "success",
        "session_id": session_id,
    }))
    .into_response())
}

/// Stops the session, evaluates the remote scores into feedback,
/// persists the log row and returns the result.
pub async fn stop_session(
    State(pool): State<PgPool>,
    State(client): State<InterviewClient>,
    State(sessions): State<InterviewSessions>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    if sessions.session_id_for(user_id).is_none() {
        return Ok((
            StatusCode::NOT_FOUND,
            unavailable("No interview session in progress"),
        )
            .into_response());
    }

    let scores = match client.stop().await {
        Ok(scores) => scores,
        Err(e) => {
            tracing::warn!("Interview analysis stop failed: {}", e);
            return Ok(unavailable("Interview analysis service is unavailable").into_response());
        }
    };

    let result = feedback::evaluate(&scores);
    insert_log(&pool, user_id, &result).await?;
    sessions.store_result(user_id, result.clone());

    Ok(Json(json!({
        "status": "success",
        "data": result,
    }))
    .into_response())
}

async fn insert_log(
    pool: &PgPool,
    user_id: Uuid,
    result: &InterviewFeedback,
) -> Result<(), AppError> {
    let comment = result
        .comments
        .iter()
        .map(|c| c.comment.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    sqlx::query(
        r#"
        INSERT INTO interview_logs
        (id, user_id, expression_score, eyes_score, posture_score,
         speech_speed_score, total_score, comment)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(result.expression_score)
    .bind(result.eyes_score)
    .bind(result.posture_score)
    .bind(result.speech_speed_score)
    .bind(result.total_score)
    .bind(comment)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert interview log: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(())
}

/// Pings the analysis service so the client can warn the user before a
/// session starts.
pub async fn health(
    State(client): State<InterviewClient>,
) -> Result<impl IntoResponse, AppError> {
    match client.test_connection().await {
        Ok(()) => Ok(Json(json!({ "status": "success" })).into_response()),
        Err(e) => {
            tracing::warn!("Interview analysis health check failed: {}", e);
            Ok(unavailable("Interview analysis service is unavailable").into_response())
        }
    }
}

/// Asks the analysis service to drop its state.
pub async fn reset(
    State(client): State<InterviewClient>,
) -> Result<impl IntoResponse, AppError> {
    match client.reset().await {
        Ok(()) => Ok(Json(json!({ "status": "success" })).into_response()),
        Err(e) => {
            tracing::warn!("Interview analysis reset failed: {}", e);
            Ok(unavailable("Interview analysis service is unavailable").into_response())
        }
    }
}

/// Forwards one camera frame to the analysis service.
pub async fn analyze_frame(
    State(client): State<InterviewClient>,
    Json(payload): Json<AnalyzeFrameRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.image.is_empty() {
        return Err(AppError::BadRequest("Missing image payload".to_string()));
    }

    match client.analyze_frame(&payload.image).await {
        Ok(()) => Ok(Json(json!({ "status": "success" })).into_response()),
        Err(e) => {
            tracing::warn!("Frame analysis failed: {}", e);
            Ok(unavailable("Interview analysis service is unavailable").into_response())
        }
    }
}

/// Forwards one audio chunk to the analysis service.
pub async fn analyze_audio(
    State(client): State<InterviewClient>,
    Json(payload): Json<AnalyzeAudioRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.audio.is_empty() {
        return Err(AppError::BadRequest("Missing audio payload".to_string()));
    }

    match client.analyze_audio(&payload.audio).await {
        Ok(()) => Ok(Json(json!({ "status": "success" })).into_response()),
        Err(e) => {
            tracing::warn!("Audio analysis failed: {}", e);
            Ok(unavailable("Interview analysis service is unavailable").into_response())
        }
    }
}

/// Fetches the synthesized audio of the finished session.
/// Any remote failure is a plain 404, matching the best-effort policy.
pub async fn get_audio_result(
    State(client): State<InterviewClient>,
) -> Result<impl IntoResponse, AppError> {
    match client.audio_result().await {
        Ok(bytes) if !bytes.is_empty() => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "audio/wav")],
            bytes,
        )
            .into_response()),
        Ok(_) => Ok(StatusCode::NOT_FOUND.into_response()),
        Err(e) => {
            tracing::warn!("Audio result fetch failed: {}", e);
            Ok(StatusCode::NOT_FOUND.into_response())
        }
    }
}

fn question_payload(state: &crate::interview::session::SessionState) -> serde_json::Value {
    let total = state.questions.len();
    // Past the last question the index sits at `total`; keep the
    // reported number within 1..=total.
    let question_number = (state.current_index + 1).min(total.max(1));

    json!({
        "status": "success",
        "question": state.current_question(),
        "question_number": question_number,
        "total_questions": total,
        "progress": state.progress(),
        "finished": state.current_question().is_none(),
    })
}

/// Returns the question the session is currently on.
pub async fn current_question(
    State(sessions): State<InterviewSessions>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    match sessions.state(user_id) {
        Some(state) => Ok(Json(question_payload(&state)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            unavailable("No interview session in progress"),
        )
            .into_response()),
    }
}

/// Advances the session to the next question.
pub async fn next_question(
    State(sessions): State<InterviewSessions>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    match sessions.advance(user_id) {
        Some(state) => Ok(Json(question_payload(&state)).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            unavailable("No interview session in progress"),
        )
            .into_response()),
    }
}

/// Latest result for the caller: the in-memory one if the session just
/// stopped, otherwise the newest persisted log.
pub async fn session_result(
    State(pool): State<PgPool>,
    State(sessions): State<InterviewSessions>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    if let Some(result) = sessions.last_result(user_id) {
        return Ok(Json(json!({ "status": "success", "data": result })).into_response());
    }

    let log: Option<InterviewLog> = sqlx::query_as(
        r#"
        SELECT id, user_id, expression_score, eyes_score, posture_score,
               speech_speed_score, total_score, comment, created_at
        FROM interview_logs
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?;

    match log {
        Some(log) => Ok(Json(json!({ "status": "success", "data": log })).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            unavailable("No interview result found. Complete an interview first."),
        )
            .into_response()),
    }
}

/// Recent persisted interview logs, newest first.
pub async fn list_logs(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    let logs: Vec<InterviewLog> = sqlx::query_as(
        r#"
        SELECT id, user_id, expression_score, eyes_score, posture_score,
               speech_speed_score, total_score, comment, created_at
        FROM interview_logs
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 3
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "status": "success", "data": logs })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::session::SessionState;

    #[test]
    fn exhausted_script_keeps_question_number_in_range() {
        let state = SessionState {
            questions: vec!["a".to_string(), "b".to_string()],
            current_index: 2,
            last_result: None,
        };

        let payload = question_payload(&state);
        assert_eq!(payload["question_number"], 2);
        assert_eq!(payload["total_questions"], 2);
        assert_eq!(payload["finished"], true);
        assert!(payload["question"].is_null());
    }

    #[test]
    fn running_script_reports_one_based_number() {
        let state = SessionState {
            questions: vec!["a".to_string(), "b".to_string()],
            current_index: 0,
            last_result: None,
        };

        let payload = question_payload(&state);
        assert_eq!(payload["question_number"], 1);
        assert_eq!(payload["finished"], false);
    }
}
