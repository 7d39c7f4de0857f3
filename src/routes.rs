// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, entry_sheet, exam, goal, interview, profile, question},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, exams, questions, interview, admin, ...).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, interview client).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me))
        .route("/password", put(profile::change_password));

    let question_routes = Router::new()
        .route("/", get(question::list_questions))
        .route("/{id}", get(question::get_question));

    let exam_routes = Router::new()
        .route("/", post(exam::start_exam).get(exam::get_history_list))
        .route("/in-progress", get(exam::get_in_progress))
        .route("/{session_id}/answers/{slot}", put(exam::save_answer))
        .route("/{session_id}/finish", post(exam::finish_exam))
        .route("/{session_id}/next-slot", get(exam::get_next_slot))
        .route("/{session_id}/results", get(exam::get_results));

    let entry_sheet_routes = Router::new()
        .route(
            "/",
            get(entry_sheet::list_entry_sheets).post(entry_sheet::create_entry_sheet),
        )
        .route(
            "/{id}",
            put(entry_sheet::update_entry_sheet).delete(entry_sheet::delete_entry_sheet),
        );

    let goal_routes = Router::new().route("/", get(goal::get_goal).put(goal::save_goal));

    let interview_routes = Router::new()
        .route("/health", get(interview::health))
        .route("/sessions", post(interview::start_session))
        .route("/sessions/stop", post(interview::stop_session))
        .route("/sessions/result", get(interview::session_result))
        .route("/reset", post(interview::reset))
        .route("/analyze", post(interview::analyze_frame))
        .route("/analyze-audio", post(interview::analyze_audio))
        .route("/audio-result", get(interview::get_audio_result))
        .route("/current-question", get(interview::current_question))
        .route("/next-question", post(interview::next_question))
        .route("/logs", get(interview::list_logs));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/questions", post(admin::create_question))
        .route(
            "/questions/{id}",
            get(admin::get_question)
                .put(admin::update_question)
                .delete(admin::delete_question),
        )
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let authed = Router::new()
        .nest("/api/profile", profile_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/entry-sheets", entry_sheet_routes)
        .nest("/api/goals", goal_routes)
        .nest("/api/interview", interview_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/questions", question_routes)
        .merge(authed)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
