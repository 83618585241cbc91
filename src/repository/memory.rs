use super::ContentRepository;
use crate::core::error::{ScoutError, ScoutResult};
use crate::types::{ContentFilter, ContentItem, TermRef};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Repository over a fixed set of items, typically loaded from a JSON corpus
/// (`[ContentItem, ...]` or `{"items": [...]}`).
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    items: BTreeMap<u64, ContentItem>,
    capabilities: HashSet<String>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Corpus {
    List(Vec<ContentItem>),
    Wrapped { items: Vec<ContentItem> },
}

impl InMemoryRepository {
    pub fn new(items: Vec<ContentItem>, capabilities: impl IntoIterator<Item = String>) -> Self {
        let mut map = BTreeMap::new();
        for item in items {
            if let Some(previous) = map.insert(item.id, item) {
                warn!("content corpus: id {} defined twice; keeping the later entry", previous.id);
            }
        }
        Self {
            items: map,
            capabilities: capabilities.into_iter().collect(),
        }
    }

    /// Repository whose actor holds every capability. Handy for CLI runs and tests.
    pub fn unrestricted(items: Vec<ContentItem>) -> Self {
        let mut repo = Self::new(items, std::iter::empty());
        repo.capabilities.insert("*".to_string());
        repo
    }

    pub fn from_json(json: &str, capabilities: impl IntoIterator<Item = String>) -> ScoutResult<Self> {
        let items = match serde_json::from_str::<Corpus>(json)? {
            Corpus::List(items) => items,
            Corpus::Wrapped { items } => items,
        };
        Ok(Self::new(items, capabilities))
    }

    pub fn load(path: &Path, capabilities: impl IntoIterator<Item = String>) -> ScoutResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let repo = Self::from_json(&contents, capabilities)?;
        info!("content corpus loaded from {}: {} items", path.display(), repo.len());
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ContentRepository for InMemoryRepository {
    fn fetch_content_item(&self, id: u64) -> ScoutResult<ContentItem> {
        self.items.get(&id).cloned().ok_or(ScoutError::NotFound(id))
    }

    fn fetch_terms_assigned(&self, content_id: u64, taxonomy: &str) -> ScoutResult<Vec<TermRef>> {
        let item = self
            .items
            .get(&content_id)
            .ok_or(ScoutError::NotFound(content_id))?;
        Ok(item.assigned_terms.get(taxonomy).cloned().unwrap_or_default())
    }

    fn current_actor_can(&self, capability: &str) -> bool {
        self.capabilities.contains("*") || self.capabilities.contains(capability)
    }

    fn list_content_items(&self, filter: &ContentFilter) -> Vec<ContentItem> {
        let matching = self.items.values().filter(|item| filter.matches(item)).cloned();
        match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}
