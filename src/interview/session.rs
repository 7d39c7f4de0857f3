// src/interview/session.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::interview::feedback::InterviewFeedback;

/// Default question script used when the client starts a session
/// without supplying its own list.
pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "Why do you want to work for this company?",
    "Please give us your self-introduction.",
    "What are your strengths and weaknesses?",
];

/// State of one running mock-interview session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub questions: Vec<String>,
    pub current_index: usize,
    pub last_result: Option<InterviewFeedback>,
}

impl SessionState {
    fn new(questions: Vec<String>) -> Self {
        Self {
            questions,
            current_index: 0,
            last_result: None,
        }
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current_index).map(String::as_str)
    }

    /// Percentage progress through the question script.
    pub fn progress(&self) -> u32 {
        if self.questions.is_empty() {
            return 100;
        }
        let done = self.current_index.min(self.questions.len());
        (done * 100 / self.questions.len()) as u32
    }
}

/// In-memory registry of mock-interview sessions, keyed per user.
///
/// This is the only shared mutable state in the process; the map is small
/// (one entry per concurrently interviewing user) and every access is a
/// short critical section, so a plain `Mutex` is enough.
#[derive(Clone, Default)]
pub struct InterviewSessions {
    inner: Arc<Mutex<Registry>>,
}

#[derive(Default)]
struct Registry {
    by_user: HashMap<Uuid, Uuid>,
    sessions: HashMap<Uuid, SessionState>,
}

impl InterviewSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session for the user, replacing any previous one.
    /// Returns the new session id.
    pub fn start(&self, user_id: Uuid, questions: Option<Vec<String>>) -> Uuid {
        let questions = match questions {
            Some(list) if !list.is_empty() => list,
            _ => DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        };

        let session_id = Uuid::now_v7();
        let mut registry = self.inner.lock().expect("interview registry poisoned");
        if let Some(old) = registry.by_user.insert(user_id, session_id) {
            registry.sessions.remove(&old);
        }
        registry.sessions.insert(session_id, SessionState::new(questions));
        session_id
    }

    pub fn session_id_for(&self, user_id: Uuid) -> Option<Uuid> {
        self.inner
            .lock()
            .expect("interview registry poisoned")
            .by_user
            .get(&user_id)
            .copied()
    }

    pub fn state(&self, user_id: Uuid) -> Option<SessionState> {
        let registry = self.inner.lock().expect("interview registry poisoned");
        let session_id = registry.by_user.get(&user_id)?;
        registry.sessions.get(session_id).cloned()
    }

    /// Advances to the next question.
    /// Returns the new state, or `None` when the user has no session.
    pub fn advance(&self, user_id: Uuid) -> Option<SessionState> {
        let mut registry = self.inner.lock().expect("interview registry poisoned");
        let session_id = *registry.by_user.get(&user_id)?;
        let state = registry.sessions.get_mut(&session_id)?;
        if state.current_index < state.questions.len() {
            state.current_index += 1;
        }
        Some(state.clone())
    }

    /// Records the feedback computed when the session stopped, so the
    /// result page can fetch it again without another remote call.
    pub fn store_result(&self, user_id: Uuid, result: InterviewFeedback) {
        let mut registry = self.inner.lock().expect("interview registry poisoned");
        let Some(session_id) = registry.by_user.get(&user_id).copied() else {
            return;
        };
        if let Some(state) = registry.sessions.get_mut(&session_id) {
            state.last_result = Some(result);
        }
    }

    pub fn last_result(&self, user_id: Uuid) -> Option<InterviewFeedback> {
        self.state(user_id)?.last_result
    }

    /// Drops the user's session entirely.
    pub fn clear(&self, user_id: Uuid) {
        let mut registry = self.inner.lock().expect("interview registry poisoned");
        if let Some(session_id) = registry.by_user.remove(&user_id) {
            registry.sessions.remove(&session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_uses_defaults_when_no_questions_given() {
        let sessions = InterviewSessions::new();
        let user = Uuid::now_v7();
        sessions.start(user, None);

        let state = sessions.state(user).unwrap();
        assert_eq!(state.questions.len(), DEFAULT_QUESTIONS.len());
        assert_eq!(state.current_question(), Some(DEFAULT_QUESTIONS[0]));
        assert_eq!(state.progress(), 0);
    }

    #[test]
    fn advance_walks_the_script_and_stops_at_the_end() {
        let sessions = InterviewSessions::new();
        let user = Uuid::now_v7();
        sessions.start(user, Some(vec!["q1".into(), "q2".into()]));

        let state = sessions.advance(user).unwrap();
        assert_eq!(state.current_question(), Some("q2"));
        assert_eq!(state.progress(), 50);

        let state = sessions.advance(user).unwrap();
        assert_eq!(state.current_question(), None);
        assert_eq!(state.progress(), 100);

        // Further advances are no-ops.
        let state = sessions.advance(user).unwrap();
        assert_eq!(state.progress(), 100);
    }

    #[test]
    fn restart_replaces_previous_session() {
        let sessions = InterviewSessions::new();
        let user = Uuid::now_v7();
        let first = sessions.start(user, Some(vec!["a".into()]));
        let second = sessions.start(user, Some(vec!["b".into()]));

        assert_ne!(first, second);
        assert_eq!(sessions.session_id_for(user), Some(second));
        assert_eq!(sessions.state(user).unwrap().current_question(), Some("b"));
    }

    #[test]
    fn clear_removes_session() {
        let sessions = InterviewSessions::new();
        let user = Uuid::now_v7();
        sessions.start(user, None);
        sessions.clear(user);
        assert!(sessions.state(user).is_none());
    }
}
