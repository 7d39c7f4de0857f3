// src/interview/client.rs

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// A remote call to the analysis service failed.
///
/// Callers treat every variant the same way (the service is "unavailable"
/// and the operation degrades to false/empty), but the original error is
/// kept so it can be logged instead of silently discarded.
#[derive(Debug)]
pub enum RemoteError {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Transport(e) => write!(f, "transport error: {}", e),
            RemoteError::Status(code) => write!(f, "unexpected status: {}", code),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err)
    }
}

/// Scores reported by the analysis service when a session stops.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteScores {
    #[serde(default)]
    pub expression_score: i32,
    #[serde(default)]
    pub eyes_score: i32,
    #[serde(default)]
    pub posture_score: i32,
    #[serde(default)]
    pub chars_per_minute: i32,
}

/// HTTP client for the external interview-analysis service.
///
/// No retries, no backoff: a failed call is reported once as `RemoteError`
/// and the caller degrades. The only resilience is the request timeout.
#[derive(Clone)]
pub struct InterviewClient {
    http: reqwest::Client,
    base_url: String,
}

impl InterviewClient {
    /// Runs once at boot; a client without the timeout would hang on a
    /// stalled analysis service, so a broken builder is fatal.
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build interview HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Checks that the analysis service answers at all.
    pub async fn test_connection(&self) -> Result<(), RemoteError> {
        let resp = self.http.get(&self.base_url).send().await?;
        expect_success(resp.status())
    }

    /// Tells the service to begin a new analysis run.
    pub async fn start(&self) -> Result<(), RemoteError> {
        self.post_empty("/interview/start").await
    }

    /// Stops the current run and fetches the computed scores.
    pub async fn stop(&self) -> Result<RemoteScores, RemoteError> {
        let resp = self
            .http
            .post(format!("{}/interview/stop", self.base_url))
            .json(&json!({}))
            .send()
            .await?;
        expect_success(resp.status())?;
        Ok(resp.json().await?)
    }

    /// Discards all analysis state on the remote side.
    pub async fn reset(&self) -> Result<(), RemoteError> {
        self.post_empty("/interview/reset").await
    }

    /// Submits one base64-encoded camera frame.
    pub async fn analyze_frame(&self, image_base64: &str) -> Result<(), RemoteError> {
        self.post_json("/interview/analyze", json!({ "image": image_base64 }))
            .await
    }

    /// Submits one base64-encoded audio chunk.
    pub async fn analyze_audio(&self, audio_base64: &str) -> Result<(), RemoteError> {
        self.post_json("/interview/analyze-audio", json!({ "audio": audio_base64 }))
            .await
    }

    /// Fetches the synthesized audio artifact of the finished run.
    pub async fn audio_result(&self) -> Result<Vec<u8>, RemoteError> {
        let resp = self
            .http
            .get(format!("{}/interview/audio", self.base_url))
            .send()
            .await?;
        expect_success(resp.status())?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn post_empty(&self, path: &str) -> Result<(), RemoteError> {
        self.post_json(path, json!({})).await
    }

    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), RemoteError> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;
        expect_success(resp.status())
    }
}

fn expect_success(status: reqwest::StatusCode) -> Result<(), RemoteError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RemoteError::Status(status))
    }
}
