//! # driftguard-core
//!
//! Structural drift detection between a data model's source code and its
//! published API contract.
//!
//! The pipeline has three stages:
//!
//! 1. **Extraction**: parse two snapshots of a Python module and collect
//!    each class's top-level field names
//! 2. **Diffing**: compute ADD/DELETE change records between snapshots
//! 3. **Validation**: cross-reference the changes against the contract's
//!    schema index, flagging OUTDATED and MISMATCH fields
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **Pure stages**: Diffing and validation cannot fail; only parsing can
//! 3. **Lenient by design**: record types without a contract schema are
//!    skipped, never flagged, and a zero-schema contract is valid
//! 4. **No I/O**: the core consumes text and returns values; files,
//!    rendering, and exit codes belong to the caller
//!
//! ## Example
//!
//! ```rust,ignore
//! use driftguard_core::{check, SchemaIndex};
//!
//! let index = SchemaIndex::from_yaml_file("contract.yaml")?;
//! let before = std::fs::read_to_string("models_old.py")?;
//! let after = std::fs::read_to_string("models.py")?;
//!
//! let violations = check(&before, &after, &index)?;
//! for v in &violations {
//!     println!("{}: {} ({})", v.kind, v.field, v.schema);
//! }
//! ```

pub mod contract;
pub mod diff;
pub mod extractor;
pub mod types;
pub mod validator;

// Re-export main types at crate root
pub use contract::{ContractError, SchemaIndex};
pub use diff::diff;
pub use extractor::{extract_fields, ExtractError};
pub use types::{Change, ChangeKind, FieldMap, Violation, ViolationKind};
pub use validator::{SchemaNamer, Validator};

use thiserror::Error;

/// Errors that can occur during a drift check.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),
}

/// Run the full pipeline over two source snapshots.
///
/// Extracts both snapshots, diffs the field maps, and validates the
/// changes against `index` using the default `{type}Schema` naming
/// convention. Returns the violation list; an empty list means the
/// contract is consistent with the change.
///
/// # Errors
///
/// Fails only if a snapshot is not valid Python. A parse failure aborts
/// before any violation list exists; callers must surface it distinctly
/// from "zero violations".
pub fn check(
    before_source: &str,
    after_source: &str,
    index: &SchemaIndex,
) -> Result<Vec<Violation>, CheckError> {
    check_with_validator(before_source, after_source, index, &Validator::new())
}

/// Run the full pipeline with a caller-supplied [`Validator`].
///
/// Use this to inject a schema-naming convention other than the default
/// `Schema` suffix.
pub fn check_with_validator(
    before_source: &str,
    after_source: &str,
    index: &SchemaIndex,
    validator: &Validator,
) -> Result<Vec<Violation>, CheckError> {
    let before = extract_fields(before_source)?;
    let after = extract_fields(after_source)?;

    let changes = diff(&before, &after);
    Ok(validator.validate(&changes, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_CONTRACT: &str = r#"
openapi: "3.0.0"
components:
  schemas:
    UserSchema:
      type: object
      properties:
        id:
          type: integer
        first_name:
          type: string
        email:
          type: string
"#;

    const USER_BEFORE: &str = r#"
class User:
    id: int
    first_name: str
    last_name: str
    email: str
"#;

    const USER_AFTER: &str = r#"
class User:
    id: int
    name: str
    email: str
"#;

    // A rename shows up as one DELETE plus one ADD; the contract still
    // lists first_name (OUTDATED) and never learned about name (MISMATCH).
    // last_name was deleted but the contract never promised it.
    #[test]
    fn test_renamed_and_deleted_fields() {
        let index = SchemaIndex::from_yaml(USER_CONTRACT).unwrap();
        let violations = check(USER_BEFORE, USER_AFTER, &index).unwrap();

        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::Outdated && v.field == "first_name"));
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::Mismatch && v.field == "name"));
        assert!(violations.iter().all(|v| v.schema == "UserSchema"));
    }

    #[test]
    fn test_empty_contract_yields_no_violations() {
        let index = SchemaIndex::from_yaml("openapi: \"3.0.0\"").unwrap();
        let violations = check(USER_BEFORE, USER_AFTER, &index).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_new_type_without_schema_is_skipped() {
        let index = SchemaIndex::from_yaml(USER_CONTRACT).unwrap();
        let after = r#"
class User:
    id: int
    first_name: str
    last_name: str
    email: str

class AuditLog:
    a: str
    b: str
"#;
        let violations = check(USER_BEFORE, after, &index).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_identical_snapshots_are_clean() {
        let index = SchemaIndex::from_yaml(USER_CONTRACT).unwrap();
        let violations = check(USER_BEFORE, USER_BEFORE, &index).unwrap();
        assert!(violations.is_empty());
    }

    #[test]
    fn test_parse_failure_aborts() {
        let index = SchemaIndex::from_yaml(USER_CONTRACT).unwrap();
        let result = check("class User\n  nope", USER_AFTER, &index);
        assert!(matches!(result, Err(CheckError::Extract(_))));
    }

    #[test]
    fn test_module_without_classes_is_clean() {
        let index = SchemaIndex::from_yaml(USER_CONTRACT).unwrap();
        let violations = check("x = 1", "y = 2", &index).unwrap();
        assert!(violations.is_empty());
    }
}
