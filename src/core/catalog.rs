//! Component catalog loading

use crate::core::component::{Component, ComponentSummary};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("../../data/component_catalog.json");

/// Error types for catalog loading
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate component id in catalog: {0}")]
    DuplicateId(String),
}

/// Source of the component catalog
pub trait CatalogLoader {
    fn load(&self) -> Result<Catalog, CatalogError>;
}

/// Loads the catalog from a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonCatalogLoader {
    path: PathBuf,
}

impl JsonCatalogLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CatalogLoader for JsonCatalogLoader {
    fn load(&self) -> Result<Catalog, CatalogError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        Catalog::from_json(&content)
    }
}

/// Loads the catalog bundled with the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalogLoader;

impl CatalogLoader for BuiltinCatalogLoader {
    fn load(&self) -> Result<Catalog, CatalogError> {
        Catalog::from_json(BUILTIN_CATALOG)
    }
}

/// Read-only, ordered collection of selectable components
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    components: Vec<Component>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids
    pub fn new(components: Vec<Component>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(components.len());
        for (position, component) in components.iter().enumerate() {
            if index.insert(component.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(component.id.clone()));
            }
        }
        Ok(Self { components, index })
    }

    /// Parse a catalog from a JSON array of components
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let components: Vec<Component> = serde_json::from_str(json)?;
        Self::new(components)
    }

    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        BuiltinCatalogLoader.load()
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.index.get(id).map(|&position| &self.components[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// id/name/type/description view used in LLM prompts
    pub fn summaries(&self) -> Vec<ComponentSummary<'_>> {
        self.components.iter().map(Component::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::ComponentType;

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.iter().any(|c| c.is_type(ComponentType::Model)));
        assert!(catalog.iter().any(|c| c.is_type(ComponentType::Preprocessing)));
    }

    #[test]
    fn test_lookup_preserves_order() {
        let catalog = Catalog::builtin().unwrap();
        let first = &catalog.components()[0];
        assert_eq!(catalog.get(&first.id), Some(first));
        assert!(catalog.get("does_not_exist").is_none());
        assert_eq!(catalog.summaries().len(), catalog.len());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let catalog = Catalog::builtin().unwrap();
        let mut components = catalog.components().to_vec();
        components.push(components[0].clone());
        let err = Catalog::new(components).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(_)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            Catalog::from_json("{\"not\": \"an array\"}"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = JsonCatalogLoader::new("/nonexistent/catalog.json")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
