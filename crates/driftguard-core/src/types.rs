//! Core types for drift detection.
//!
//! These are the plain data values handed between pipeline stages:
//! field maps out of extraction, changes out of diffing, violations out
//! of validation. Each is owned and immutable once produced; no stage
//! mutates another stage's output.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Field names per record type, for one source snapshot.
///
/// BTree containers keep iteration deterministic, so diff output and
/// report rendering are reproducible run to run.
pub type FieldMap = BTreeMap<String, BTreeSet<String>>;

/// Direction of a detected field change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    /// Field present in "after" but not "before"
    Add,

    /// Field present in "before" but not "after"
    Delete,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Add => write!(f, "ADD"),
            ChangeKind::Delete => write!(f, "DELETE"),
        }
    }
}

/// One field added to or deleted from a record type between snapshots.
///
/// A rename is not a distinct kind; it surfaces as one DELETE plus one ADD.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Change {
    /// Whether the field was added or deleted
    pub kind: ChangeKind,

    /// Name of the changed field
    pub field: String,

    /// Record type the field belongs to
    pub type_name: String,
}

impl Change {
    /// A field newly present in the "after" snapshot.
    pub fn added(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Add,
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// A field no longer present in the "after" snapshot.
    pub fn deleted(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Delete,
            field: field.into(),
            type_name: type_name.into(),
        }
    }
}

/// Class of contract inconsistency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    /// Contract still promises a field the code deleted
    Outdated,

    /// Code exposes a field the contract does not document
    Mismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::Outdated => write!(f, "OUTDATED"),
            ViolationKind::Mismatch => write!(f, "MISMATCH"),
        }
    }
}

/// One detected inconsistency between a code change and the contract.
///
/// Terminal output of the pipeline; the reporting side renders these,
/// the core never does.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    /// Class of violation
    pub kind: ViolationKind,

    /// Name of the offending field
    pub field: String,

    /// Contract schema the field was checked against
    pub schema: String,

    /// Human-readable explanation
    pub details: String,
}

impl Violation {
    /// Contract promises a field the code no longer has.
    pub fn outdated(field: impl Into<String>, schema: impl Into<String>) -> Self {
        let field = field.into();
        let schema = schema.into();
        let details = format!("Field deleted in code but remains in contract ({schema}).");
        Self {
            kind: ViolationKind::Outdated,
            field,
            schema,
            details,
        }
    }

    /// Code exposes a field the contract does not document.
    pub fn mismatch(field: impl Into<String>, schema: impl Into<String>) -> Self {
        let field = field.into();
        let schema = schema.into();
        let details = format!("Field added in code but missing from contract ({schema}).");
        Self {
            kind: ViolationKind::Mismatch,
            field,
            schema,
            details,
        }
    }
}
