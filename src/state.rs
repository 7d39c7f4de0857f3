use crate::config::Config;
use crate::interview::client::InterviewClient;
use crate::interview::session::InterviewSessions;
use axum::extract::FromRef;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub interview: InterviewClient,
    pub interview_sessions: InterviewSessions,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for InterviewClient {
    fn from_ref(state: &AppState) -> Self {
        state.interview.clone()
    }
}

impl FromRef<AppState> for InterviewSessions {
    fn from_ref(state: &AppState) -> Self {
        state.interview_sessions.clone()
    }
}
