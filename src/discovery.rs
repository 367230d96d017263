//! Running-session discovery over the `WebDriver` `/sessions` endpoint.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::models::running::RunningSession;
use crate::models::server::ServerParams;
use crate::services::{BoxFuture, SessionDirectory};
use crate::{AppError, Result};

#[derive(Debug, Deserialize)]
struct SessionsResponse {
    #[serde(default)]
    value: Vec<RunningSession>,
}

/// Queries `GET {server}/sessions` for sessions to attach to.
#[derive(Debug, Clone)]
pub struct HttpSessionDirectory {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpSessionDirectory {
    /// Directory whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), timeout)
    }

    /// Directory issuing requests through `client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// URL listing the running sessions of `server`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `server` has no host.
    pub fn sessions_url(server: &ServerParams) -> Result<String> {
        Ok(format!("{}/sessions", server.base_url()?))
    }
}

impl SessionDirectory for HttpSessionDirectory {
    fn discover(&self, server: ServerParams) -> BoxFuture<'_, Result<Vec<RunningSession>>> {
        Box::pin(async move {
            let url = Self::sessions_url(&server)?;
            let mut request = self.client.get(&url).timeout(self.timeout);
            if let Some(auth) = &server.auth {
                request = request.basic_auth(&auth.username, Some(&auth.access_key));
            }
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AppError::Discovery(format!("{url} answered {status}")));
            }
            let body: SessionsResponse = response.json().await?;
            debug!(%url, sessions = body.value.len(), "running sessions listed");
            Ok(body.value)
        })
    }
}
