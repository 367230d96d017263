//! Save, save-as, start and attach with their preconditions.
//!
//! Each action checks its precondition against an [`ActionInputs`] view
//! of the screen and fires exactly one call at a collaborator. Nothing is
//! retried; collaborator errors are returned as-is.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::models::caps::CapabilitySet;
use crate::models::saved::{SaveRequest, SavedSession};
use crate::models::server::{ServerParams, ServerType};
use crate::models::tabs::WorkflowTab;
use crate::services::{NewSessionRequest, SaveAsPrompt, SavedSessionStore, SessionLauncher};
use crate::{AppError, Result};

/// The parts of screen state the actions depend on.
#[derive(Debug, Clone, Copy)]
pub struct ActionInputs<'a> {
    /// Selected workflow tab.
    pub workflow_tab: WorkflowTab,
    /// Active capability set.
    pub caps: &'a CapabilitySet,
    /// Whether `caps` has unsaved changes.
    pub dirty: bool,
    /// Running session chosen for attach.
    pub attach_target: Option<&'a str>,
    /// Active server parameters.
    pub server: &'a ServerParams,
    /// Active server type.
    pub server_type: &'a ServerType,
}

impl ActionInputs<'_> {
    fn attaching(&self) -> bool {
        self.workflow_tab == WorkflowTab::Attach
    }
}

/// Which actions are currently enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)] // One flag per button.
pub struct ActionAvailability {
    /// Overwrite the saved set.
    pub save: bool,
    /// Save under a new name.
    pub save_as: bool,
    /// Start a new session.
    pub start: bool,
    /// Attach to the chosen running session.
    pub attach: bool,
}

impl ActionAvailability {
    /// Evaluate every precondition.
    #[must_use]
    pub fn evaluate(inputs: &ActionInputs<'_>) -> Self {
        let attaching = inputs.attaching();
        Self {
            save: !attaching && inputs.caps.uuid().is_some() && inputs.dirty,
            save_as: !attaching,
            start: !attaching,
            attach: attaching && inputs.attach_target.is_some(),
        }
    }
}

/// Fires the gated actions against their collaborators.
#[derive(Clone)]
pub struct ActionGateway {
    saved_sessions: Arc<dyn SavedSessionStore>,
    save_as_prompt: Arc<dyn SaveAsPrompt>,
    launcher: Arc<dyn SessionLauncher>,
}

impl ActionGateway {
    /// Gateway over the given collaborators.
    #[must_use]
    pub fn new(
        saved_sessions: Arc<dyn SavedSessionStore>,
        save_as_prompt: Arc<dyn SaveAsPrompt>,
        launcher: Arc<dyn SessionLauncher>,
    ) -> Self {
        Self {
            saved_sessions,
            save_as_prompt,
            launcher,
        }
    }

    /// Overwrite the saved set the active capabilities came from.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` when attaching, unsaved or clean;
    /// otherwise whatever the store reports.
    pub async fn save(&self, inputs: &ActionInputs<'_>) -> Result<SavedSession> {
        if !ActionAvailability::evaluate(inputs).save {
            return Err(AppError::ActionDisabled(
                "save needs a previously saved, modified capability set".into(),
            ));
        }
        let request = SaveRequest {
            server: inputs.server.clone(),
            server_type: inputs.server_type.clone(),
            caps: inputs.caps.clone(),
            uuid: inputs.caps.uuid(),
            name: None,
        };
        self.saved_sessions
            .save(request)
            .instrument(info_span!("save_session"))
            .await
    }

    /// Open the save-as naming surface.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` while attaching.
    pub fn save_as(&self, inputs: &ActionInputs<'_>) -> Result<()> {
        if !ActionAvailability::evaluate(inputs).save_as {
            return Err(AppError::ActionDisabled(
                "save as is unavailable while attaching".into(),
            ));
        }
        self.save_as_prompt.request_name();
        Ok(())
    }

    /// Persist the active capabilities as a new saved set named `name`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` while attaching or for a blank
    /// name; otherwise whatever the store reports.
    pub async fn complete_save_as(
        &self,
        inputs: &ActionInputs<'_>,
        name: &str,
    ) -> Result<SavedSession> {
        if !ActionAvailability::evaluate(inputs).save_as {
            return Err(AppError::ActionDisabled(
                "save as is unavailable while attaching".into(),
            ));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ActionDisabled(
                "save as needs a non-empty name".into(),
            ));
        }
        let request = SaveRequest {
            server: inputs.server.clone(),
            server_type: inputs.server_type.clone(),
            caps: inputs.caps.clone(),
            uuid: None,
            name: Some(name.to_owned()),
        };
        self.saved_sessions
            .save(request)
            .instrument(info_span!("save_session_as", name))
            .await
    }

    /// Start a new session from the active capabilities.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` while attaching; otherwise
    /// whatever the launcher reports.
    pub async fn start(&self, inputs: &ActionInputs<'_>) -> Result<()> {
        if !ActionAvailability::evaluate(inputs).start {
            return Err(AppError::ActionDisabled(
                "start is unavailable while attaching".into(),
            ));
        }
        info!(server_type = %inputs.server_type, caps = inputs.caps.len(), "starting session");
        self.launcher
            .new_session(NewSessionRequest {
                server: inputs.server.clone(),
                server_type: inputs.server_type.clone(),
                caps: Some(inputs.caps.clone()),
                attach_session_id: None,
            })
            .instrument(info_span!("start_session"))
            .await
    }

    /// Attach to the chosen running session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ActionDisabled` unless attaching with a target;
    /// otherwise whatever the launcher reports.
    pub async fn attach(&self, inputs: &ActionInputs<'_>) -> Result<()> {
        let Some(session_id) = inputs.attach_target.filter(|_| inputs.attaching()) else {
            return Err(AppError::ActionDisabled(
                "attach needs the attach tab and a running session".into(),
            ));
        };
        info!(server_type = %inputs.server_type, session_id, "attaching to session");
        self.launcher
            .new_session(NewSessionRequest {
                server: inputs.server.clone(),
                server_type: inputs.server_type.clone(),
                caps: None,
                attach_session_id: Some(session_id.to_owned()),
            })
            .instrument(info_span!("attach_session", session_id))
            .await
    }
}
