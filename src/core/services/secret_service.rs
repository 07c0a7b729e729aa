//! Repository over stored secrets.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::time::Clock;
use crate::domain::{Secret, SecretCategory, SecretPatch};
use crate::errors::{Mutation, StoreResult};
use crate::storage::{document::report_write_failure, SecretStore};

use super::{matches_query, remove_from, update_in};

#[derive(Clone)]
pub struct SecretService {
    store: SecretStore,
    clock: Arc<dyn Clock>,
}

impl SecretService {
    pub fn new(store: SecretStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn list(&self) -> Vec<Secret> {
        self.store.read()
    }

    pub fn get(&self, id: &str) -> Option<Secret> {
        self.list().into_iter().find(|secret| secret.id == id)
    }

    /// Matches title, description and tags. Secret values are never searched.
    pub fn search(&self, query: &str, category: Option<SecretCategory>) -> Vec<Secret> {
        self.list()
            .into_iter()
            .filter(|secret| category.map_or(true, |wanted| secret.category == wanted))
            .filter(|secret| {
                let description = secret.description.as_deref().unwrap_or_default();
                matches_query(query, &[secret.title.as_str(), description], &secret.tags)
            })
            .collect()
    }

    /// Number of secrets per category; every category is present.
    pub fn count_by_category(&self) -> BTreeMap<&'static str, usize> {
        let secrets = self.list();
        SecretCategory::ALL
            .iter()
            .map(|category| {
                let count = secrets
                    .iter()
                    .filter(|secret| secret.category == *category)
                    .count();
                (category.label(), count)
            })
            .collect()
    }

    pub fn try_add(&self, secret: Secret) -> StoreResult<Mutation> {
        let mut secrets = self.list();
        if secrets.iter().any(|existing| existing.id == secret.id) {
            warn!(id = %secret.id, "secret id already in use");
            return Ok(Mutation::Duplicate);
        }
        debug!(id = %secret.id, category = secret.category.label(), "adding secret");
        secrets.push(secret);
        self.store.try_write(&secrets)?;
        Ok(Mutation::Applied)
    }

    pub fn try_update(&self, id: &str, patch: SecretPatch) -> StoreResult<Mutation> {
        let mut secrets = self.list();
        let outcome = update_in(&mut secrets, id, self.clock.now(), |secret| {
            patch.apply(secret)
        });
        if outcome.applied() {
            self.store.try_write(&secrets)?;
        }
        Ok(outcome)
    }

    pub fn try_delete(&self, id: &str) -> StoreResult<Mutation> {
        let mut secrets = self.list();
        let outcome = remove_from(&mut secrets, id);
        self.store.try_write(&secrets)?;
        Ok(outcome)
    }

    pub fn add(&self, secret: Secret) {
        if let Err(err) = self.try_add(secret) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn update(&self, id: &str, patch: SecretPatch) {
        if let Err(err) = self.try_update(id, patch) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn delete(&self, id: &str) {
        if let Err(err) = self.try_delete(id) {
            report_write_failure(self.store.key(), err);
        }
    }
}
