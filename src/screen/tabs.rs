//! Server-type and workflow tab selection.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::models::server::ServerType;
use crate::models::tabs::{ServerTab, TabState, WorkflowTab, WorkflowTabEntry};
use crate::providers::CloudProviderRegistry;
use crate::{AppError, Result};

/// Result of a server-type tab selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerTabOutcome {
    /// The pseudo-tab was chosen; the provider selector was opened instead.
    ProviderSelectorOpened,
    /// The tab was already selected.
    Unchanged,
    /// The server type changed.
    Switched {
        /// Previously selected server type.
        from: ServerType,
        /// Newly selected server type.
        to: ServerType,
    },
}

/// Owns the two exclusive tab selections and the attach target.
#[derive(Debug, Clone, Default)]
pub struct TabNavigationController {
    state: TabState,
    attach_target: Option<String>,
}

impl TabNavigationController {
    /// Controller on `remote` / `new`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selections.
    #[must_use]
    pub fn state(&self) -> &TabState {
        &self.state
    }

    /// Selected server type.
    #[must_use]
    pub fn server_type(&self) -> &ServerType {
        &self.state.server_type_tab
    }

    /// Selected workflow tab.
    #[must_use]
    pub fn workflow_tab(&self) -> WorkflowTab {
        self.state.workflow_tab
    }

    /// Whether the attach workflow is selected.
    #[must_use]
    pub fn is_attaching(&self) -> bool {
        self.state.workflow_tab == WorkflowTab::Attach
    }

    /// Running session chosen on the attach tab.
    #[must_use]
    pub fn attach_target(&self) -> Option<&str> {
        if self.is_attaching() {
            self.attach_target.as_deref()
        } else {
            None
        }
    }

    /// Select a workflow tab; returns whether the selection changed.
    ///
    /// Leaving the attach tab drops the attach target.
    pub fn select_workflow_tab(&mut self, tab: WorkflowTab) -> bool {
        if self.state.workflow_tab == tab {
            return false;
        }
        debug!(from = %self.state.workflow_tab, to = %tab, "workflow tab selected");
        self.state.workflow_tab = tab;
        if tab != WorkflowTab::Attach {
            self.attach_target = None;
        }
        true
    }

    /// Choose the running session to attach to; ignored outside the attach tab.
    pub fn select_attach_target(&mut self, session_id: Option<String>) -> bool {
        if !self.is_attaching() {
            warn!("attach target chosen outside the attach tab");
            return false;
        }
        self.attach_target = session_id.filter(|id| !id.is_empty());
        true
    }

    /// Commit a server type restored from storage or a launch source.
    pub fn restore_server_type(&mut self, server_type: ServerType) {
        self.state.server_type_tab = server_type;
    }

    /// Select a server-type tab.
    ///
    /// The pseudo-tab opens the provider selector and leaves the selection
    /// alone. Any other tab runs `change` for the new server type and
    /// commits the tab only once it succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` for a provider missing from the catalog
    /// or not shown as a tab, or the error `change` failed with; the
    /// previous tab stays selected.
    pub async fn select_server_type_tab<F, Fut>(
        &mut self,
        tab: ServerTab,
        registry: &CloudProviderRegistry,
        change: F,
    ) -> Result<ServerTabOutcome>
    where
        F: FnOnce(ServerType) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let ServerTab::Server(target) = tab else {
            registry.add_provider();
            return Ok(ServerTabOutcome::ProviderSelectorOpened);
        };

        if let ServerType::Provider(key) = &target {
            if registry.lookup(key).is_none() {
                return Err(AppError::Provider(format!("unknown provider {key}")));
            }
            if !registry.is_visible(key) {
                return Err(AppError::Provider(format!("provider {key} has no tab")));
            }
        }

        if target == self.state.server_type_tab {
            return Ok(ServerTabOutcome::Unchanged);
        }

        if let Err(err) = change(target.clone()).await {
            warn!(to = %target, %err, "server type change rejected");
            return Err(err);
        }

        let from = std::mem::replace(&mut self.state.server_type_tab, target.clone());
        info!(%from, to = %target, "server type changed");
        Ok(ServerTabOutcome::Switched { from, to: target })
    }

    /// Server tabs in display order.
    ///
    /// Always `remote`, then visible providers known to the catalog, then
    /// the pseudo-tab.
    #[must_use]
    pub fn server_tabs(registry: &CloudProviderRegistry) -> Vec<ServerTab> {
        let mut tabs = vec![ServerTab::Server(ServerType::Remote)];
        tabs.extend(
            registry
                .visible_descriptors()
                .map(|d| ServerTab::Server(ServerType::Provider(d.key.to_owned()))),
        );
        tabs.push(ServerTab::AddCloudProvider);
        tabs
    }

    /// Workflow tabs in display order; `saved` is disabled while nothing is saved.
    #[must_use]
    pub fn workflow_tabs(saved_count: usize) -> Vec<WorkflowTabEntry> {
        WorkflowTab::ALL
            .into_iter()
            .map(|tab| WorkflowTabEntry {
                tab,
                enabled: tab != WorkflowTab::Saved || saved_count > 0,
            })
            .collect()
    }
}
