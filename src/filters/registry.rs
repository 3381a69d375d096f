//! Filter registry for managing available filter types.

use crate::core::error::{FilterError, FilterResult};
use crate::core::filter::{Category, Filter, FilterMetadata};
use indexmap::IndexMap;
use log::warn;
use std::sync::Arc;

/// Factory function for creating filter instances with default parameters.
pub type FilterFactory = Arc<dyn Fn() -> FilterResult<Box<dyn Filter>> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: FilterFactory,
    /// Metadata read once at registration.
    pub metadata: FilterMetadata,
}

/// Registry for all available filter types.
///
/// Filters are kept in registration order and indexed by category.
pub struct FilterRegistry {
    /// Filters indexed by their unique ID.
    filters: IndexMap<String, RegistryEntry>,
    /// Filters grouped by category.
    categories: IndexMap<Category, Vec<String>>,
}

impl FilterRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            filters: IndexMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with built-in filters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register a filter type.
    ///
    /// The factory is invoked once to read metadata; a factory that fails is
    /// skipped with a warning.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> FilterResult<Box<dyn Filter>> + Send + Sync + 'static,
    {
        let metadata = match factory() {
            Ok(instance) => instance.metadata(),
            Err(e) => {
                warn!("skipping filter whose default construction failed: {}", e);
                return;
            }
        };
        let id = metadata.id.clone();
        let category = metadata.category;

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
        };

        if self.filters.insert(id.clone(), entry).is_none() {
            self.categories.entry(category).or_default().push(id);
        }
    }

    /// Create a new instance of a filter by ID.
    pub fn create(&self, id: &str) -> FilterResult<Box<dyn Filter>> {
        match self.filters.get(id) {
            Some(entry) => (entry.factory)(),
            None => Err(FilterError::UnknownFilter(id.to_string())),
        }
    }

    /// Get metadata for a filter without creating an instance.
    pub fn get_metadata(&self, id: &str) -> Option<&FilterMetadata> {
        self.filters.get(id).map(|e| &e.metadata)
    }

    /// Check if a filter is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.filters.contains_key(id)
    }

    /// Get all registered filter IDs.
    pub fn filter_ids(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(|s| s.as_str())
    }

    /// Get filters by category.
    pub fn filters_by_category(&self, category: &Category) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|ids| ids.iter().map(|s| s.as_str()).collect())
            .unwrap_or_default()
    }

    /// Search filters by id, name or description.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.filters
            .iter()
            .filter(|(_, entry)| {
                entry.metadata.id.to_lowercase().contains(&query)
                    || entry.metadata.name.to_lowercase().contains(&query)
                    || entry.metadata.description.to_lowercase().contains(&query)
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Get the total number of registered filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Get filters grouped by category, in category display order.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&FilterMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&FilterMetadata>> = IndexMap::new();

        for category in Category::all() {
            let mut filters: Vec<&FilterMetadata> = self
                .filters
                .values()
                .filter(|e| e.metadata.category == *category)
                .map(|e| &e.metadata)
                .collect();
            if filters.is_empty() {
                continue;
            }
            filters.sort_by(|a, b| a.name.cmp(&b.name));
            grouped.insert(*category, filters);
        }

        grouped
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
