//! Session launch against a `WebDriver` server.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, info_span, Instrument};

use crate::discovery::HttpSessionDirectory;
use crate::models::server::ServerParams;
use crate::services::{BoxFuture, NewSessionRequest, SessionDirectory, SessionLauncher};
use crate::{AppError, Result};

#[derive(Debug, Deserialize)]
struct NewSessionResponse {
    value: NewSessionValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSessionValue {
    session_id: String,
}

/// Creates sessions with `POST {server}/session` and checks attach targets
/// against the server's running sessions.
#[derive(Debug, Clone)]
pub struct HttpSessionLauncher {
    client: reqwest::Client,
    timeout: Duration,
    directory: HttpSessionDirectory,
}

impl HttpSessionLauncher {
    /// Launcher whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    /// Launcher issuing requests through `client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            directory: HttpSessionDirectory::with_client(client.clone(), timeout),
            client,
            timeout,
        }
    }

    /// W3C new-session payload for `caps`.
    #[must_use]
    pub fn new_session_body(caps: &Value) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": caps,
                "firstMatch": [{}],
            }
        })
    }

    async fn create(&self, server: &ServerParams, caps: Value) -> Result<String> {
        let url = format!("{}/session", server.base_url()?);
        let mut request = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&Self::new_session_body(&caps));
        if let Some(auth) = &server.auth {
            request = request.basic_auth(&auth.username, Some(&auth.access_key));
        }
        let response = request
            .send()
            .await
            .map_err(|err| AppError::Session(format!("{url} unreachable: {err}")))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Session(format!(
                "{url} refused the session ({status}): {body}"
            )));
        }
        let created: NewSessionResponse = response
            .json()
            .await
            .map_err(|err| AppError::Session(format!("unexpected new-session reply: {err}")))?;
        Ok(created.value.session_id)
    }

    async fn verify_running(&self, server: ServerParams, session_id: &str) -> Result<()> {
        let running = self.directory.discover(server).await?;
        if running.iter().any(|s| s.id == session_id) {
            Ok(())
        } else {
            Err(AppError::Session(format!(
                "session {session_id} is no longer running"
            )))
        }
    }
}

impl SessionLauncher for HttpSessionLauncher {
    fn new_session(&self, request: NewSessionRequest) -> BoxFuture<'_, Result<()>> {
        let span = info_span!("new_session", server_type = %request.server_type);
        Box::pin(
            async move {
                match (request.attach_session_id, request.caps) {
                    (Some(session_id), _) => {
                        self.verify_running(request.server, &session_id).await?;
                        info!(%session_id, "attached to running session");
                    }
                    (None, Some(caps)) => {
                        let caps = serde_json::to_value(&caps)?;
                        let session_id = self.create(&request.server, caps).await?;
                        info!(%session_id, "session created");
                    }
                    (None, None) => {
                        return Err(AppError::Session(
                            "neither capabilities nor a session to attach to".into(),
                        ));
                    }
                }
                Ok(())
            }
            .instrument(span),
        )
    }
}
