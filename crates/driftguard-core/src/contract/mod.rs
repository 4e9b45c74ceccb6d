//! Contract indexing.
//!
//! API contracts are tree-structured documents (OpenAPI-style YAML or
//! JSON). This module parses them and builds the schema index the
//! validator cross-references changes against.

mod index;

pub use index::{ContractError, SchemaIndex};
