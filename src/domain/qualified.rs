//! Composite names used to tell same-named tables apart across schemas.

use super::schema_ref::SchemaRef;

pub const SEPARATOR: &str = "->";

/// `schema->table` for a named schema; the bare table name otherwise.
pub fn composite(schema: &SchemaRef, table: &str) -> String {
    match schema {
        SchemaRef::Named(name) => format!("{}{}{}", name, SEPARATOR, table),
        SchemaRef::Unqualified => table.to_string(),
    }
}

/// Splits a listing entry back into its schema and table parts.
pub fn split_composite(entry: &str) -> (Option<&str>, &str) {
    match entry.split_once(SEPARATOR) {
        Some((schema, rest)) => {
            let table = rest.split(SEPARATOR).next().unwrap_or(rest);
            (Some(schema), table)
        }
        None => (None, entry),
    }
}
