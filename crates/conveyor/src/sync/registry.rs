//! Registry mapping domain names to their sync services.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::service::{SyncError, SyncService};

/// Immutable map from domain name to [`SyncService`], built once at startup
/// from a statically-known list of constructors.
///
/// A `BTreeMap` keeps iteration order deterministic, so "all domains" always
/// means the same sequence.
#[derive(Default)]
pub struct SyncRegistry {
    services: BTreeMap<String, Arc<dyn SyncService>>,
}

impl SyncRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service under its own domain name.
    ///
    /// # Errors
    /// Returns [`SyncError::DuplicateDomain`] if the name is already taken.
    pub fn register(&mut self, service: Arc<dyn SyncService>) -> Result<(), SyncError> {
        let domain = service.domain_name().to_string();
        if self.services.contains_key(&domain) {
            return Err(SyncError::DuplicateDomain { domain });
        }
        self.services.insert(domain, service);
        Ok(())
    }

    /// Look up the service for a domain.
    pub fn get(&self, domain: &str) -> Option<&Arc<dyn SyncService>> {
        self.services.get(domain)
    }

    /// Registered domain names, sorted.
    pub fn domains(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    /// Iterate services in domain-name order.
    pub fn services(&self) -> impl Iterator<Item = &Arc<dyn SyncService>> {
        self.services.values()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl std::fmt::Debug for SyncRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRegistry")
            .field("domains", &self.domains())
            .finish()
    }
}
