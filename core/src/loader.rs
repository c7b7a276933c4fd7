use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::*;

const BUNDLED_LEVELS: [&str; 3] = [
    include_str!("../levels/level-1.json"),
    include_str!("../levels/level-2.json"),
    include_str!("../levels/level-3.json"),
];

/// Resolves level indices to maps.
pub trait MapSource {
    /// Total number of configured levels, level indices run from 1 to this value.
    fn level_count(&self) -> LevelIndex;

    fn load(&self, level: LevelIndex) -> Result<LevelMap>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    pub level_count: LevelIndex,
}

impl CatalogConfig {
    pub fn new(level_count: LevelIndex) -> Self {
        Self {
            level_count: level_count.max(1),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(BUNDLED_LEVELS.len() as LevelIndex)
    }
}

/// Map documents in the JSON wire format, keyed by level index.
#[derive(Clone, Debug, PartialEq)]
pub struct MapCatalog {
    config: CatalogConfig,
    documents: BTreeMap<LevelIndex, Cow<'static, str>>,
}

impl MapCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            documents: BTreeMap::new(),
        }
    }

    /// The levels shipped with the crate.
    pub fn bundled() -> Self {
        let mut catalog = Self::new(CatalogConfig::default());
        for (level, json) in (1..).zip(BUNDLED_LEVELS) {
            catalog.insert(level, json);
        }
        catalog
    }

    pub fn config(&self) -> CatalogConfig {
        self.config
    }

    /// Registers the document for `level`, replacing any earlier one.
    pub fn insert(&mut self, level: LevelIndex, json: impl Into<Cow<'static, str>>) {
        if level == 0 || level > self.config.level_count {
            log::warn!(
                "Level {} is outside the configured 1..={}, it will never be loaded",
                level,
                self.config.level_count
            );
        }
        self.documents.insert(level, json.into());
    }
}

impl MapSource for MapCatalog {
    fn level_count(&self) -> LevelIndex {
        self.config.level_count
    }

    fn load(&self, level: LevelIndex) -> Result<LevelMap> {
        if level == 0 || level > self.config.level_count {
            return Err(PuzzleError::MapNotFound(level));
        }
        let json = self
            .documents
            .get(&level)
            .ok_or(PuzzleError::MapNotFound(level))?;
        LevelMap::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn bundled_levels_all_load() {
        let catalog = MapCatalog::bundled();

        assert_eq!(catalog.level_count(), 3);
        for level in 1..=catalog.level_count() {
            let map = catalog.load(level).unwrap();
            assert!(map.base_cell().is_base(), "level {level}");
        }
    }

    #[test]
    fn out_of_range_levels_are_not_found() {
        let catalog = MapCatalog::bundled();

        assert_eq!(catalog.load(0), Err(PuzzleError::MapNotFound(0)));
        assert_eq!(catalog.load(4), Err(PuzzleError::MapNotFound(4)));
    }

    #[test]
    fn configured_level_without_document_is_not_found() {
        let mut catalog = MapCatalog::new(CatalogConfig::new(2));
        catalog.insert(1, BUNDLED_LEVELS[0]);

        assert!(catalog.load(1).is_ok());
        assert_eq!(catalog.load(2), Err(PuzzleError::MapNotFound(2)));
    }

    #[test]
    fn document_beyond_level_count_is_not_loaded() {
        let mut catalog = MapCatalog::new(CatalogConfig::new(1));
        catalog.insert(2, BUNDLED_LEVELS[1]);

        assert_eq!(catalog.load(2), Err(PuzzleError::MapNotFound(2)));
    }

    #[test]
    fn invalid_documents_surface_their_error() {
        let mut catalog = MapCatalog::new(CatalogConfig::new(2));
        catalog.insert(
            1,
            r#"{ "optimum": 1, "cells": [{ "id": "a", "row": 1, "col": 1, "dir": "UP" }] }"#,
        );
        catalog.insert(2, format!("{{ \"optimum\": {} }}", 3));

        assert_eq!(catalog.load(1), Err(PuzzleError::MissingBaseCell));
        assert!(matches!(catalog.load(2), Err(PuzzleError::MalformedMap(_))));
    }

    #[test]
    fn config_clamps_level_count() {
        assert_eq!(CatalogConfig::new(0).level_count, 1);

        let config: CatalogConfig = serde_json::from_str(r#"{ "levelCount": 11 }"#).unwrap();
        assert_eq!(config, CatalogConfig::new(11));
    }
}
