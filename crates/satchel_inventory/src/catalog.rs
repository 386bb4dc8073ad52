//! Item catalog
//!
//! Definitions are loaded from TOML. Each item is an `[[item]]` table:
//!
//! ```toml
//! [[item]]
//! id = "iron_ore"
//! name = "Iron Ore"
//! weight = 2.0
//! max_stack = 10
//!
//! [[item]]
//! id = "sword"
//! name = "Sword"
//! stackable = false
//! pickup = "pickup_sword"
//! ```
//!
//! Replicas resolve incoming item types through the same catalog.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use satchel_core::ItemTypeId;
use serde::Deserialize;
use thiserror::Error;

use crate::item::{ItemDefinition, ItemRequest};

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate item type: {0}")]
    Duplicate(String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "item")]
    items: Vec<ItemDefinition>,
}

/// Registered item definitions
#[derive(Debug, Default, Clone)]
pub struct ItemCatalog {
    definitions: HashMap<ItemTypeId, Arc<ItemDefinition>>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut catalog = Self::new();
        for definition in file.items {
            let id = definition.id.clone();
            if catalog.definitions.contains_key(&id) {
                return Err(CatalogError::Duplicate(id.to_string()));
            }
            catalog.insert(definition);
        }
        Ok(catalog)
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        log::info!("Loaded {} item definitions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Register a definition (normalized), replacing any previous one
    pub fn insert(&mut self, definition: ItemDefinition) -> Arc<ItemDefinition> {
        let definition = Arc::new(definition.normalized());
        self.definitions.insert(definition.id.clone(), Arc::clone(&definition));
        definition
    }

    /// Builder form of [`ItemCatalog::insert`]
    pub fn with(mut self, definition: ItemDefinition) -> Self {
        self.insert(definition);
        self
    }

    /// Look up a definition
    pub fn get(&self, id: &ItemTypeId) -> Option<Arc<ItemDefinition>> {
        self.definitions.get(id).cloned()
    }

    /// Look up a definition by name
    pub fn get_by_name(&self, name: &str) -> Option<Arc<ItemDefinition>> {
        self.get(&ItemTypeId::new(name))
    }

    /// Build an add request for a catalog type
    pub fn request(&self, name: &str, quantity: u32) -> Option<ItemRequest> {
        self.get_by_name(name).map(|definition| ItemRequest::new(definition, quantity))
    }

    /// Check if a type is registered
    pub fn contains(&self, id: &ItemTypeId) -> bool {
        self.definitions.contains_key(id)
    }

    /// Iterate over definitions
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
