//! Schema index construction from contract documents.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur when indexing a contract.
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Failed to read contract file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed contract: {0}")]
    Malformed(String),
}

/// Mapping from schema name to its declared properties, in document order.
///
/// Built once per validation run and read-only thereafter. A contract
/// with zero schemas produces an empty index; that is a valid (if
/// suspicious) result, not an error, and every change validated against
/// it falls into the skip policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SchemaIndex {
    schemas: BTreeMap<String, Vec<String>>,
}

impl SchemaIndex {
    /// Build an index from YAML contract text.
    ///
    /// Navigates the well-known `components.schemas` path. An absent
    /// path yields an empty index. Each schema contributes the keys of
    /// its `properties` mapping in document order; a schema with no
    /// properties contributes an empty list, not an absent entry.
    /// Schema references (`$ref`) are not resolved.
    pub fn from_yaml(text: &str) -> Result<Self, ContractError> {
        let document: serde_yaml::Value = serde_yaml::from_str(text)?;
        Self::from_document(&document)
    }

    /// Build an index from JSON contract text.
    pub fn from_json(text: &str) -> Result<Self, ContractError> {
        let document: serde_json::Value = serde_json::from_str(text)?;
        // Re-expressed as a YAML value so both formats share one walk;
        // serde_json's preserve_order feature keeps property order intact.
        let document = serde_yaml::to_value(&document)?;
        Self::from_document(&document)
    }

    /// Build an index from a YAML contract file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Build an index from a JSON contract file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ContractError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    fn from_document(document: &serde_yaml::Value) -> Result<Self, ContractError> {
        let mut index = SchemaIndex::default();

        let schemas = document
            .get("components")
            .and_then(|components| components.get("schemas"));
        let schemas = match schemas {
            Some(value) if value.is_null() => None,
            other => other,
        };
        let Some(schemas) = schemas else {
            warn!("no schemas found in contract");
            return Ok(index);
        };

        let schemas = schemas.as_mapping().ok_or_else(|| {
            ContractError::Malformed("components.schemas is not a mapping".to_string())
        })?;

        for (name, entry) in schemas {
            let name = name.as_str().ok_or_else(|| {
                ContractError::Malformed("schema name is not a string".to_string())
            })?;

            let properties = schema_properties(name, entry)?;
            debug!(
                schema = name,
                properties = properties.len(),
                "indexed schema"
            );
            index.schemas.insert(name.to_owned(), properties);
        }

        if index.is_empty() {
            warn!("no schemas found in contract");
        }
        Ok(index)
    }

    /// The declared property names of a schema, in document order.
    pub fn get(&self, schema_name: &str) -> Option<&[String]> {
        self.schemas.get(schema_name).map(Vec::as_slice)
    }

    /// Whether the contract declares a schema with this name.
    pub fn contains(&self, schema_name: &str) -> bool {
        self.schemas.contains_key(schema_name)
    }

    /// Number of indexed schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterate schemas with their property lists.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.schemas.iter()
    }
}

impl FromIterator<(String, Vec<String>)> for SchemaIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            schemas: iter.into_iter().collect(),
        }
    }
}

/// Read the `properties` keys of one schema entry, in document order.
fn schema_properties(
    schema_name: &str,
    entry: &serde_yaml::Value,
) -> Result<Vec<String>, ContractError> {
    let properties = match entry.get("properties") {
        None => return Ok(Vec::new()),
        Some(value) if value.is_null() => return Ok(Vec::new()),
        Some(value) => value.as_mapping().ok_or_else(|| {
            ContractError::Malformed(format!(
                "properties of schema '{schema_name}' is not a mapping"
            ))
        })?,
    };

    properties
        .keys()
        .map(|key| {
            key.as_str().map(str::to_owned).ok_or_else(|| {
                ContractError::Malformed(format!(
                    "property name in schema '{schema_name}' is not a string"
                ))
            })
        })
        .collect()
}
