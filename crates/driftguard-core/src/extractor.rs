//! Structural field extraction from Python source.
//!
//! Parses one module into an AST and collects, per top-level class, the
//! set of field names declared in the class's immediate body. Only two
//! statement shapes qualify:
//!
//! - annotated assignments with a simple name target (`id: int`)
//! - plain assignments with simple name targets (`id = None`)
//!
//! Attribute paths, tuple targets, subscripts, and anything inside
//! methods or nested classes are ignored. Only simple, statically-named
//! fields are tracked; the tradeoff is precision over recall.

use rustpython_parser::{ast, Parse};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;

use crate::types::FieldMap;

/// Errors that can occur during field extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to parse Python source: {0}")]
    Parse(#[from] rustpython_parser::ParseError),
}

/// Extract the tracked field set of every top-level class in `source`.
///
/// A class with no qualifying assignments still appears in the result,
/// with an empty field set. A module with no classes yields an empty map.
///
/// # Errors
///
/// Returns [`ExtractError::Parse`] if the source is not valid Python.
/// Parse failures are never recovered; the caller must abort the run
/// rather than diff against a malformed snapshot.
pub fn extract_fields(source: &str) -> Result<FieldMap, ExtractError> {
    let module = ast::Suite::parse(source, "<module>")?;

    let mut classes = FieldMap::new();
    for stmt in &module {
        if let ast::Stmt::ClassDef(class) = stmt {
            let fields = class_fields(&class.body);
            debug!(
                class = class.name.as_str(),
                fields = fields.len(),
                "extracted record type"
            );
            classes.insert(class.name.as_str().to_owned(), fields);
        }
    }

    Ok(classes)
}

/// Collect simple-name assignment targets from a class body.
///
/// Tagged-union match over the two recognized statement variants;
/// everything else (methods, docstrings, nested classes) falls through.
fn class_fields(body: &[ast::Stmt]) -> BTreeSet<String> {
    let mut fields = BTreeSet::new();

    for stmt in body {
        match stmt {
            ast::Stmt::AnnAssign(ann) => {
                if let ast::Expr::Name(name) = ann.target.as_ref() {
                    fields.insert(name.id.as_str().to_owned());
                }
            }
            ast::Stmt::Assign(assign) => {
                for target in &assign.targets {
                    if let ast::Expr::Name(name) = target {
                        fields.insert(name.id.as_str().to_owned());
                    }
                }
            }
            _ => {}
        }
    }

    fields
}
