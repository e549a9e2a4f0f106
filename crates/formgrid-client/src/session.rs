#![forbid(unsafe_code)]

//! Session-scoped dashboard state.
//!
//! Dashboard layout (which pages exist, their icons and titles) survives
//! navigation within a session but not beyond it. Rather than ambient
//! global state behind a well-known key, the cache is an explicit service:
//! a [`DashboardConfigStore`] injected where it is needed, over a narrow
//! [`SessionStore`] key/value seam the embedding application implements
//! (browser session storage, a test map, anything string-keyed).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed key dashboard state is stored under.
pub const DASHBOARD_STATE_KEY: &str = "formgrid.dashboard.state";

// ---------------------------------------------------------------------------
// SessionStore seam
// ---------------------------------------------------------------------------

/// String-keyed ephemeral storage, scoped to one session.
pub trait SessionStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&mut self, key: &str, value: String);

    /// Remove a value.
    fn remove(&mut self, key: &str);
}

/// In-memory session store for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// ---------------------------------------------------------------------------
// Dashboard config
// ---------------------------------------------------------------------------

/// One dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardPage {
    /// Page id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Icon tokens assigned to the page.
    pub icons: Vec<String>,
    /// Chart/panel titles on the page.
    pub titles: Vec<String>,
}

/// Dashboard layout for one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// The form this dashboard belongs to.
    pub uuid: Uuid,
    /// Pages in display order.
    pub pages: Vec<DashboardPage>,
}

/// Loads and saves [`DashboardConfig`] under [`DASHBOARD_STATE_KEY`].
#[derive(Debug, Clone, Default)]
pub struct DashboardConfigStore<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> DashboardConfigStore<S> {
    /// Wrap a session store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the cached config for one form.
    ///
    /// Returns `None` when nothing is cached, the cache belongs to a
    /// different form, or the cached value no longer parses (a stale or
    /// corrupt entry behaves like a cache miss).
    #[must_use]
    pub fn load(&self, uuid: Uuid) -> Option<DashboardConfig> {
        let raw = self.store.get(DASHBOARD_STATE_KEY)?;
        let config: DashboardConfig = match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unparsable dashboard state");
                return None;
            }
        };
        (config.uuid == uuid).then_some(config)
    }

    /// Cache the config, replacing any previous entry.
    pub fn save(&mut self, config: &DashboardConfig) {
        match serde_json::to_string(config) {
            Ok(raw) => self.store.set(DASHBOARD_STATE_KEY, raw),
            Err(e) => tracing::warn!(error = %e, "failed to encode dashboard state"),
        }
    }

    /// Drop the cached entry.
    pub fn clear(&mut self) {
        self.store.remove(DASHBOARD_STATE_KEY);
    }
}
