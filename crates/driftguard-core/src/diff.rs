//! Field-set diffing between two source snapshots.
//!
//! Pure and total: given two well-formed field maps this cannot fail.
//! Deterministic ordering guaranteed via BTree iteration: record types
//! in sorted order, deletions before additions within a type, fields
//! sorted within each group.

use std::collections::BTreeSet;

use crate::types::{Change, FieldMap};

/// Compute the field changes between two snapshots.
///
/// Operates over the union of record-type names in either map. A type
/// present only in `after` contributes one ADD per field; a type present
/// only in `before` contributes one DELETE per field. A field present in
/// both snapshots, or in neither, yields nothing.
pub fn diff(before: &FieldMap, after: &FieldMap) -> Vec<Change> {
    let empty = BTreeSet::new();
    let mut changes = Vec::new();

    let type_names: BTreeSet<&String> = before.keys().chain(after.keys()).collect();

    for type_name in type_names {
        let before_set = before.get(type_name).unwrap_or(&empty);
        let after_set = after.get(type_name).unwrap_or(&empty);

        for field in before_set.difference(after_set) {
            changes.push(Change::deleted(type_name.as_str(), field.as_str()));
        }
        for field in after_set.difference(before_set) {
            changes.push(Change::added(type_name.as_str(), field.as_str()));
        }
    }

    changes
}
