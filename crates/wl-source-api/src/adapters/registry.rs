//! In-process source registry.
//!
//! Holds the records of one named table in a concurrent map. Records can be
//! seeded at startup from a JSON array file.

use crate::domain::config::RegistryConfig;
use crate::domain::entities::{Source, SourceId};
use crate::domain::error::RegistryError;
use crate::ports::outbound::SourceRegistry;
use async_trait::async_trait;
use dashmap::DashMap;
use std::path::Path;
use tracing::info;

/// Source registry backed by a `DashMap` keyed by source id.
#[derive(Debug)]
pub struct InMemorySourceRegistry {
    table_name: String,
    sources: DashMap<SourceId, Source>,
}

impl InMemorySourceRegistry {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            sources: DashMap::new(),
        }
    }

    /// Build the registry for `config`, loading the seed file if one is set.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let registry = Self::new(config.table_name.clone());
        if let Some(path) = &config.seed_path {
            let loaded = registry.load_seed(path)?;
            info!(
                table = %registry.table_name,
                path = %path.display(),
                sources = loaded,
                "Loaded source registry seed"
            );
        }
        Ok(registry)
    }

    /// Load a JSON array of source records. Returns the number loaded.
    ///
    /// Later records replace earlier ones with the same id.
    pub fn load_seed(&self, path: &Path) -> Result<usize, RegistryError> {
        let seed_error = |reason: String| RegistryError::Seed {
            path: path.display().to_string(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| seed_error(e.to_string()))?;
        let records: Vec<Source> =
            serde_json::from_str(&raw).map_err(|e| seed_error(e.to_string()))?;

        let count = records.len();
        for source in records {
            if source.id.as_str().trim().is_empty() {
                return Err(seed_error("record with blank id".to_string()));
            }
            self.insert(source);
        }
        Ok(count)
    }

    /// Insert or replace a source record.
    pub fn insert(&self, source: Source) -> Option<Source> {
        self.sources.insert(source.id.clone(), source)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl SourceRegistry for InMemorySourceRegistry {
    async fn get_by_id(&self, id: &SourceId) -> Result<Option<Source>, RegistryError> {
        Ok(self.sources.get(id).map(|entry| entry.value().clone()))
    }

    fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn id(raw: &str) -> SourceId {
        SourceId::parse(Some(raw)).unwrap()
    }

    fn seed_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let registry = InMemorySourceRegistry::new("sources");
        registry.insert(Source::new(id("wl-42")));

        let found = registry.get_by_id(&id("wl-42")).await.unwrap();
        assert_eq!(found.map(|s| s.id), Some(id("wl-42")));
        assert!(registry.get_by_id(&id("wl-43")).await.unwrap().is_none());
        assert_eq!(registry.table_name(), "sources");
    }

    #[tokio::test]
    async fn test_ids_are_exact_match() {
        let registry = InMemorySourceRegistry::new("sources");
        registry.insert(Source::new(id("wl-42")));

        assert!(registry.get_by_id(&id("WL-42")).await.unwrap().is_none());
        assert!(registry.get_by_id(&id(" wl-42")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_seed() {
        let file = seed_file(
            r#"[
                {"id": "wl-1", "url": "https://example.org/a.txt"},
                {"id": "wl-2", "name": "Second"}
            ]"#,
        );
        let registry = InMemorySourceRegistry::from_config(&RegistryConfig {
            table_name: "seeded".into(),
            seed_path: Some(file.path().to_path_buf()),
        })
        .unwrap();

        assert_eq!(registry.len(), 2);
        let source = registry.get_by_id(&id("wl-1")).await.unwrap().unwrap();
        assert_eq!(source.attributes["url"], "https://example.org/a.txt");
    }

    #[test]
    fn test_load_seed_rejects_bad_json() {
        let file = seed_file("{not json");
        let registry = InMemorySourceRegistry::new("sources");
        assert!(matches!(
            registry.load_seed(file.path()),
            Err(RegistryError::Seed { .. })
        ));
    }

    #[test]
    fn test_load_seed_rejects_blank_id() {
        let file = seed_file(r#"[{"id": "  "}]"#);
        let registry = InMemorySourceRegistry::new("sources");
        assert!(registry.load_seed(file.path()).is_err());
    }

    #[test]
    fn test_missing_seed_file() {
        let registry = InMemorySourceRegistry::new("sources");
        let err = registry
            .load_seed(Path::new("/nonexistent/sources.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sources.json"));
    }
}
