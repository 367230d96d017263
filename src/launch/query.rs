//! Query-string overrides.
//!
//! The screen accepts a single `state` parameter holding URL-encoded JSON:
//!
//! ```text
//! ?state={"caps":{"platformName":"iOS"},"serverType":"remote","server":{"host":"10.0.0.2","port":4723}}
//! ```
//!
//! Other parameters are ignored. A `server` given without `serverType`
//! belongs to `remote`, whatever server type is active.

use serde::Deserialize;
use tracing::debug;

use crate::models::caps::CapabilitySet;
use crate::models::patch::StatePatch;
use crate::models::server::{Protocol, ServerAuth, ServerParams, ServerType};
use crate::{AppError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryState {
    #[serde(default)]
    caps: Option<CapabilitySet>,
    #[serde(default)]
    server_type: Option<ServerType>,
    #[serde(default)]
    server: Option<QueryServer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryServer {
    #[serde(default)]
    host: String,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    protocol: Protocol,
    #[serde(default)]
    auth: Option<ServerAuth>,
}

/// Parse a launch query string into a state patch.
///
/// # Errors
///
/// Returns `AppError::Parse` if the `state` parameter is not valid
/// URL-encoded JSON.
pub fn parse_query_string(raw: &str) -> Result<StatePatch> {
    let raw = raw.trim().trim_start_matches('?');
    let mut patch = StatePatch::default();

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != "state" {
            debug!(key, "ignoring query parameter");
            continue;
        }
        let state = decode_state(value)?;
        patch = into_patch(state);
    }

    Ok(patch)
}

fn decode_state(value: &str) -> Result<QueryState> {
    let spaced = value.replace('+', " ");
    let decoded = urlencoding::decode(&spaced)
        .map_err(|err| AppError::Parse(format!("state is not valid UTF-8: {err}")))?;
    serde_json::from_str(&decoded)
        .map_err(|err| AppError::Parse(format!("state is not valid JSON: {err}")))
}

fn into_patch(state: QueryState) -> StatePatch {
    let server_type = state.server_type;
    let servers = state
        .server
        .map(|server| {
            let mut params = ServerParams::empty(server_type.clone().unwrap_or_default());
            params.host = server.host;
            params.port = server.port;
            if let Some(path) = server.path {
                params.path = path;
            }
            params.protocol = server.protocol;
            params.auth = server.auth;
            params
        })
        .into_iter()
        .collect();

    StatePatch {
        caps: state.caps,
        servers,
        server_type,
    }
}
