//! Cross-referencing field changes against the contract's schema index.
//!
//! The validator applies a fixed, non-configurable decision table:
//!
//! 1. No schema for the change's record type → skip (not a violation)
//! 2. DELETE and the field is still in the schema → OUTDATED
//! 3. ADD and the field is absent from the schema → MISMATCH
//! 4. Anything else → no violation
//!
//! The skip rule is a deliberate leniency policy: record types the
//! contract never tracked cannot produce false positives.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::contract::SchemaIndex;
use crate::types::{Change, ChangeKind, Violation};

/// Maps a record-type name to its contract schema name.
pub type SchemaNamer = Box<dyn Fn(&str) -> String + Send + Sync>;

/// The Validator cross-references a change list against a schema index.
///
/// The record-type-to-schema mapping is an injectable naming function;
/// the default appends the `Schema` suffix (`User` → `UserSchema`).
/// The convention is brittle by construction: two type names can
/// collide on one schema name, which is warned about but not rejected.
pub struct Validator {
    namer: SchemaNamer,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// A validator using the fixed `{type_name}Schema` convention.
    pub fn new() -> Self {
        Self::with_namer(Box::new(|type_name| format!("{type_name}Schema")))
    }

    /// A validator with a custom schema-naming function.
    pub fn with_namer(namer: SchemaNamer) -> Self {
        Self { namer }
    }

    /// The schema name this validator maps a record type to.
    pub fn schema_name(&self, type_name: &str) -> String {
        (self.namer)(type_name)
    }

    /// Validate a change list against the schema index.
    ///
    /// Pure and total given valid inputs. Output order follows input
    /// change order; no secondary ordering is applied.
    pub fn validate(&self, changes: &[Change], index: &SchemaIndex) -> Vec<Violation> {
        self.warn_on_collisions(changes);

        let mut violations = Vec::new();

        for change in changes {
            let schema_name = self.schema_name(&change.type_name);

            let Some(schema_fields) = index.get(&schema_name) else {
                debug!(
                    schema = %schema_name,
                    record_type = %change.type_name,
                    "schema not in contract, skipping change"
                );
                continue;
            };

            let in_schema = schema_fields.iter().any(|f| f == &change.field);
            match change.kind {
                ChangeKind::Delete if in_schema => {
                    violations.push(Violation::outdated(&change.field, &schema_name));
                }
                ChangeKind::Add if !in_schema => {
                    violations.push(Violation::mismatch(&change.field, &schema_name));
                }
                _ => {}
            }
        }

        violations
    }

    /// Warn once per schema name that two or more record types alias to.
    ///
    /// Collisions are never validated away (the naming convention gives
    /// no way to disambiguate), so surfacing them is diagnostic only.
    fn warn_on_collisions(&self, changes: &[Change]) {
        let mut by_schema: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for change in changes {
            let schema_name = self.schema_name(&change.type_name);
            let types = by_schema.entry(schema_name).or_default();
            if !types.contains(&change.type_name.as_str()) {
                types.push(&change.type_name);
            }
        }

        for (schema_name, types) in by_schema {
            if types.len() > 1 {
                warn!(
                    schema = %schema_name,
                    record_types = %types.join(", "),
                    "multiple record types map to one schema name"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViolationKind;

    fn user_index() -> SchemaIndex {
        [(
            "UserSchema".to_string(),
            vec![
                "id".to_string(),
                "first_name".to_string(),
                "email".to_string(),
            ],
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_delete_of_contracted_field_is_outdated() {
        let changes = vec![Change::deleted("User", "first_name")];
        let violations = Validator::new().validate(&changes, &user_index());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Outdated);
        assert_eq!(violations[0].field, "first_name");
        assert_eq!(violations[0].schema, "UserSchema");
    }

    #[test]
    fn test_add_of_uncontracted_field_is_mismatch() {
        let changes = vec![Change::added("User", "name")];
        let violations = Validator::new().validate(&changes, &user_index());

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Mismatch);
        assert_eq!(violations[0].field, "name");
    }

    #[test]
    fn test_benign_combinations_are_not_violations() {
        // DELETE of a field the contract never promised, and ADD of a
        // field the contract already documents.
        let changes = vec![
            Change::deleted("User", "last_name"),
            Change::added("User", "email"),
        ];
        let violations = Validator::new().validate(&changes, &user_index());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_unmapped_schema_is_skipped() {
        let changes = vec![
            Change::added("Order", "total"),
            Change::deleted("Order", "status"),
        ];
        let violations = Validator::new().validate(&changes, &user_index());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_empty_index_skips_everything() {
        let changes = vec![
            Change::deleted("User", "first_name"),
            Change::added("User", "name"),
        ];
        let violations = Validator::new().validate(&changes, &SchemaIndex::default());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_output_order_follows_input_order() {
        let changes = vec![
            Change::added("User", "name"),
            Change::deleted("User", "first_name"),
        ];
        let violations = Validator::new().validate(&changes, &user_index());

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].kind, ViolationKind::Mismatch);
        assert_eq!(violations[1].kind, ViolationKind::Outdated);
    }

    #[test]
    fn test_custom_namer() {
        let index: SchemaIndex = [("user".to_string(), vec!["id".to_string()])]
            .into_iter()
            .collect();
        let validator =
            Validator::with_namer(Box::new(|type_name| type_name.to_lowercase()));

        let changes = vec![Change::deleted("User", "id")];
        let violations = validator.validate(&changes, &index);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].schema, "user");
    }

    #[test]
    fn test_colliding_type_names_still_validate() {
        // Force a collision with a constant namer.
        let validator = Validator::with_namer(Box::new(|_| "SharedSchema".to_string()));
        let index: SchemaIndex = [("SharedSchema".to_string(), vec!["id".to_string()])]
            .into_iter()
            .collect();

        let changes = vec![
            Change::deleted("User", "id"),
            Change::deleted("Account", "id"),
        ];
        let violations = validator.validate(&changes, &index);

        // Collision is warned, not rejected; both changes evaluate.
        assert_eq!(violations.len(), 2);
    }
}
