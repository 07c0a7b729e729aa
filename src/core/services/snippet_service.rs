//! Repository over the saved snippet collection.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::time::Clock;
use crate::domain::{Snippet, SnippetLanguage, SnippetPatch};
use crate::errors::{Mutation, StoreResult};
use crate::storage::{document::report_write_failure, SnippetStore};

use super::{matches_query, remove_from, update_in};

#[derive(Clone)]
pub struct SnippetService {
    store: SnippetStore,
    clock: Arc<dyn Clock>,
}

impl SnippetService {
    pub fn new(store: SnippetStore, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Stored snippets. The first call against empty storage seeds the samples.
    pub fn list(&self) -> Vec<Snippet> {
        self.store.read()
    }

    pub fn get(&self, id: &str) -> Option<Snippet> {
        self.list().into_iter().find(|snippet| snippet.id == id)
    }

    pub fn favorites(&self) -> Vec<Snippet> {
        self.list()
            .into_iter()
            .filter(Snippet::is_favorite)
            .collect()
    }

    /// Snippets whose title, description, content or tags contain `query`,
    /// optionally narrowed to one language.
    pub fn search(&self, query: &str, language: Option<SnippetLanguage>) -> Vec<Snippet> {
        self.list()
            .into_iter()
            .filter(|snippet| language.map_or(true, |wanted| snippet.language == wanted))
            .filter(|snippet| {
                let description = snippet.description.as_deref().unwrap_or_default();
                matches_query(
                    query,
                    &[snippet.title.as_str(), description, snippet.content.as_str()],
                    &snippet.tags,
                )
            })
            .collect()
    }

    pub fn try_add(&self, snippet: Snippet) -> StoreResult<Mutation> {
        let mut snippets = self.list();
        if snippets.iter().any(|existing| existing.id == snippet.id) {
            warn!(id = %snippet.id, "snippet id already in use");
            return Ok(Mutation::Duplicate);
        }
        debug!(id = %snippet.id, title = %snippet.title, "adding snippet");
        snippets.push(snippet);
        self.store.try_write(&snippets)?;
        Ok(Mutation::Applied)
    }

    pub fn try_update(&self, id: &str, patch: SnippetPatch) -> StoreResult<Mutation> {
        let mut snippets = self.list();
        let outcome = update_in(&mut snippets, id, self.clock.now(), |snippet| {
            patch.apply(snippet)
        });
        if outcome.applied() {
            self.store.try_write(&snippets)?;
        }
        Ok(outcome)
    }

    pub fn try_toggle_favorite(&self, id: &str) -> StoreResult<Mutation> {
        let mut snippets = self.list();
        let outcome = update_in(&mut snippets, id, self.clock.now(), |snippet| {
            snippet.is_favorite = Some(!snippet.is_favorite());
        });
        if outcome.applied() {
            self.store.try_write(&snippets)?;
        }
        Ok(outcome)
    }

    pub fn try_delete(&self, id: &str) -> StoreResult<Mutation> {
        let mut snippets = self.list();
        let outcome = remove_from(&mut snippets, id);
        self.store.try_write(&snippets)?;
        Ok(outcome)
    }

    pub fn add(&self, snippet: Snippet) {
        if let Err(err) = self.try_add(snippet) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn update(&self, id: &str, patch: SnippetPatch) {
        if let Err(err) = self.try_update(id, patch) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn toggle_favorite(&self, id: &str) {
        if let Err(err) = self.try_toggle_favorite(id) {
            report_write_failure(self.store.key(), err);
        }
    }

    pub fn delete(&self, id: &str) {
        if let Err(err) = self.try_delete(id) {
            report_write_failure(self.store.key(), err);
        }
    }
}
