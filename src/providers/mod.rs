//! Cloud provider catalog and the user's visible subset.
//!
//! Providers are plain descriptor records in a lookup table. The registry
//! holds the catalog plus the ordered list of keys the user has opted to
//! show as server tabs. It performs no IO; persisting the visible set is
//! the orchestrator's job.

pub mod catalog;

use std::sync::Arc;

use tracing::{debug, info};

use crate::models::server::{is_reserved_key, ServerParams};
use crate::services::ProviderSelector;
use crate::{AppError, Result};

pub use catalog::BUILTIN_PROVIDERS;

/// Tab header of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabHead {
    /// Text shown on the tab.
    pub label: &'static str,
}

/// A form field on a provider's connection panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelField {
    /// Field key.
    pub name: &'static str,
    /// Field label.
    pub label: &'static str,
    /// Whether the value must be masked.
    pub secret: bool,
}

/// Content of a provider's connection panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderPanel {
    /// Connection parameters used until the user edits them.
    pub defaults: ServerParams,
    /// Fields the panel asks for.
    pub fields: &'static [PanelField],
}

/// Static catalog entry for one cloud provider.
#[derive(Debug, Clone, Copy)]
pub struct CloudProviderDescriptor {
    /// Catalog key; also the server type and tab key.
    pub key: &'static str,
    /// Builds the tab header.
    pub tab_head: fn() -> TabHead,
    /// Builds the connection panel.
    pub panel: fn() -> ProviderPanel,
}

/// Catalog of installable providers and the visible subset.
pub struct CloudProviderRegistry {
    catalog: &'static [CloudProviderDescriptor],
    visible: Vec<String>,
    selector: Arc<dyn ProviderSelector>,
}

impl CloudProviderRegistry {
    /// Registry over the built-in catalog.
    #[must_use]
    pub fn new(selector: Arc<dyn ProviderSelector>) -> Self {
        Self::with_catalog(BUILTIN_PROVIDERS, selector)
    }

    /// Registry over a custom catalog.
    #[must_use]
    pub fn with_catalog(
        catalog: &'static [CloudProviderDescriptor],
        selector: Arc<dyn ProviderSelector>,
    ) -> Self {
        Self {
            catalog,
            visible: Vec::new(),
            selector,
        }
    }

    /// Every installable provider, in catalog order.
    #[must_use]
    pub fn catalog(&self) -> &'static [CloudProviderDescriptor] {
        self.catalog
    }

    /// Find a provider by key.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&'static CloudProviderDescriptor> {
        self.catalog.iter().find(|d| d.key == key)
    }

    /// Visible provider keys, in the order they were added.
    ///
    /// May include keys no longer in the catalog when restored from
    /// stale settings; [`Self::visible_descriptors`] skips those.
    #[must_use]
    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    /// Whether `key` is a catalog provider the user shows as a tab.
    #[must_use]
    pub fn is_visible(&self, key: &str) -> bool {
        self.lookup(key).is_some() && self.visible.iter().any(|k| k == key)
    }

    /// Descriptors of visible providers present in the catalog.
    pub fn visible_descriptors(&self) -> impl Iterator<Item = &'static CloudProviderDescriptor> + '_ {
        self.visible.iter().filter_map(|key| {
            let found = self.lookup(key);
            if found.is_none() {
                debug!(provider = %key, "skipping visible provider missing from catalog");
            }
            found
        })
    }

    /// Replace the visible set, dropping reserved keys and duplicates.
    pub fn set_visible<I, K>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.visible.clear();
        for key in keys {
            let key = key.into();
            if is_reserved_key(&key) || key.is_empty() || self.visible.contains(&key) {
                debug!(provider = %key, "ignoring visible provider key");
                continue;
            }
            self.visible.push(key);
        }
    }

    /// Append a catalog provider to the visible set.
    ///
    /// Returns `false` if it was already visible.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Provider` if `key` is not in the catalog.
    pub fn show_provider(&mut self, key: &str) -> Result<bool> {
        if self.lookup(key).is_none() {
            return Err(AppError::Provider(format!("unknown provider {key}")));
        }
        if self.visible.iter().any(|k| k == key) {
            return Ok(false);
        }
        self.visible.push(key.to_owned());
        info!(provider = key, "provider shown");
        Ok(true)
    }

    /// Remove a provider from the visible set; returns whether it was present.
    pub fn remove_provider(&mut self, key: &str) -> bool {
        let before = self.visible.len();
        self.visible.retain(|k| k != key);
        let removed = self.visible.len() != before;
        if removed {
            info!(provider = key, "provider hidden");
        }
        removed
    }

    /// Open the provider selection surface.
    pub fn add_provider(&self) {
        debug!("opening provider selection");
        self.selector.open();
    }
}
