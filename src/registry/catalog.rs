//! Discovery catalog: parses the service index, provides lookup and search.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{CatalogError, json_kind};
use crate::registry::embedded;

/// Per-service descriptor: an arbitrary JSON object.
pub type ServiceDescriptor = Map<String, Value>;

/// Descriptor key holding the discovery document URL.
const DISCOVERY_URL_FIELD: &str = "discoveryRestUrl";

/// Immutable index of service identifiers to descriptors.
///
/// The wrapped JSON is not validated at construction. The `"items"` shape is
/// checked every time the items view is requested, so a catalog without it
/// still constructs and only fails on first use.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryCatalog {
    root: Map<String, Value>,
}

impl DiscoveryCatalog {
    /// Wrap an already-parsed catalog object.
    pub fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Load the catalog embedded into the binary at build time.
    pub fn load_bundled() -> Result<Self, CatalogError> {
        Self::from_resource(embedded::bundled_catalog())
    }

    fn from_resource(resource: Option<&str>) -> Result<Self, CatalogError> {
        let definition = resource.ok_or_else(|| {
            CatalogError::ResourceMissing("registry/discovery.json was not embedded".to_string())
        })?;

        let catalog = Self::parse(definition)?;
        tracing::debug!(bytes = definition.len(), "Loaded bundled discovery catalog");
        Ok(catalog)
    }

    /// Parse catalog JSON text. The top level must be a JSON object.
    pub fn parse(definition: &str) -> Result<Self, CatalogError> {
        let root: Map<String, Value> = serde_json::from_str(definition)?;
        Ok(Self::new(root))
    }

    /// Read and parse a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let definition = std::fs::read_to_string(path).map_err(|e| CatalogError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let catalog = Self::parse(&definition)?;
        tracing::debug!(path = %path.display(), "Loaded discovery catalog from disk");
        Ok(catalog)
    }

    /// Load `path` when given, otherwise the bundled catalog.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::load_bundled(),
        }
    }

    /// The whole parsed catalog object.
    pub fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    /// The `"items"` mapping of service id to descriptor.
    ///
    /// Every entry must be an object, so a single malformed descriptor fails
    /// the whole view. Per-service lookups ([`get`](Self::get),
    /// [`discovery_url`](Self::discovery_url)) and [`search`](Self::search)
    /// only check the entries they touch.
    pub fn items(&self) -> Result<BTreeMap<&str, &ServiceDescriptor>, CatalogError> {
        self.raw_items()?
            .iter()
            .map(|(id, entry)| Ok((id.as_str(), descriptor(id, entry)?)))
            .collect()
    }

    fn raw_items(&self) -> Result<&Map<String, Value>, CatalogError> {
        let items = self.root.get("items").ok_or(CatalogError::MissingItems)?;
        items.as_object().ok_or(CatalogError::ItemsNotObject {
            found: json_kind(items),
        })
    }

    /// Sorted service identifiers, including ids whose descriptor is malformed.
    pub fn service_ids(&self) -> Result<Vec<&str>, CatalogError> {
        Ok(self.raw_items()?.keys().map(String::as_str).collect())
    }

    /// Look up a descriptor by service id.
    pub fn get(&self, id: &str) -> Result<Option<&ServiceDescriptor>, CatalogError> {
        self.raw_items()?
            .get(id)
            .map(|entry| descriptor(id, entry))
            .transpose()
    }

    /// Look up a descriptor, failing if the service is unknown.
    pub fn get_strict(&self, id: &str) -> Result<&ServiceDescriptor, CatalogError> {
        self.get(id)?
            .ok_or_else(|| CatalogError::ServiceNotFound(id.to_string()))
    }

    /// Location of the service's discovery document (`discoveryRestUrl`).
    pub fn discovery_url(&self, id: &str) -> Result<&str, CatalogError> {
        self.get_strict(id)?
            .get(DISCOVERY_URL_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| CatalogError::MissingField {
                id: id.to_string(),
                field: DISCOVERY_URL_FIELD,
            })
    }

    /// Search services by query string (matches id, name, title, description).
    ///
    /// Results are ordered by descending score, then by id. Entries that are
    /// not objects are skipped.
    pub fn search(&self, query: &str) -> Result<Vec<(&str, &ServiceDescriptor)>, CatalogError> {
        let query_lower = query.to_lowercase();
        let tokens: Vec<&str> = query_lower.split_whitespace().collect();

        let mut scored: Vec<(&str, &ServiceDescriptor, usize)> = self
            .raw_items()?
            .iter()
            .filter_map(|(id, entry)| {
                let Some(descriptor) = entry.as_object() else {
                    tracing::debug!(id = %id, "Skipping malformed catalog entry");
                    return None;
                };
                let id = id.as_str();
                let score = Self::score_service(id, descriptor, &tokens);
                if score > 0 {
                    Some((id, descriptor, score))
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(b.0)));
        Ok(scored.into_iter().map(|(id, d, _)| (id, d)).collect())
    }

    fn score_service(id: &str, descriptor: &ServiceDescriptor, tokens: &[&str]) -> usize {
        let field = |key: &str| {
            descriptor
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase()
        };
        let id_lower = id.to_lowercase();
        let name_lower = field("name");
        let title_lower = field("title");
        let desc_lower = field("description");

        let mut score = 0;
        for token in tokens {
            if id_lower == *token || name_lower == *token {
                score += 10;
            } else if id_lower.contains(token) || name_lower.contains(token) {
                score += 5;
            }

            if title_lower.contains(token) {
                score += 4;
            }

            if desc_lower.contains(token) {
                score += 2;
            }
        }

        score
    }
}

fn descriptor<'a>(id: &str, entry: &'a Value) -> Result<&'a ServiceDescriptor, CatalogError> {
    entry.as_object().ok_or_else(|| CatalogError::EntryNotObject {
        id: id.to_string(),
        found: json_kind(entry),
    })
}
