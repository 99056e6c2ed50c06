use std::collections::BTreeMap;

use serde::Serialize;

use super::column::Column;
use super::qualified::composite;
use super::schema_ref::SchemaRef;

/// A cached table.
///
/// `columns` stays `None` until the first lookup that needs them.
/// `foreign_keys` is present only when the table imports at least one key;
/// such a table is treated as a fact table. It maps the foreign-key column to
/// the name of the referenced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub schema: SchemaRef,
    pub name: String,
    /// Only the first key column is kept; composite keys collapse to one.
    pub primary_key: Option<String>,
    pub columns: Option<BTreeMap<String, Column>>,
    pub foreign_keys: Option<BTreeMap<String, String>>,
}

impl Table {
    pub fn new(schema: SchemaRef, name: impl Into<String>) -> Self {
        Self {
            schema,
            name: name.into(),
            primary_key: None,
            columns: None,
            foreign_keys: None,
        }
    }

    pub fn is_fact_table(&self) -> bool {
        self.foreign_keys.is_some()
    }

    pub fn columns_loaded(&self) -> bool {
        self.columns.is_some()
    }

    pub fn composite_name(&self) -> String {
        composite(&self.schema, &self.name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.as_ref()?.get(name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .as_ref()
            .map(|cols| cols.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn foreign_key_columns(&self) -> Vec<String> {
        self.foreign_keys
            .as_ref()
            .map(|fks| fks.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Referenced tables in foreign-key column order, without repeats.
    pub fn referenced_tables(&self) -> Vec<String> {
        let mut referenced: Vec<String> = Vec::new();
        if let Some(fks) = &self.foreign_keys {
            for pk_table in fks.values() {
                if !referenced.contains(pk_table) {
                    referenced.push(pk_table.clone());
                }
            }
        }
        referenced
    }

    pub fn set_columns(&mut self, columns: impl IntoIterator<Item = Column>) {
        self.columns = Some(
            columns
                .into_iter()
                .map(|col| (col.name.clone(), col))
                .collect(),
        );
    }

    pub fn add_foreign_key(&mut self, fk_column: impl Into<String>, pk_table: impl Into<String>) {
        self.foreign_keys
            .get_or_insert_with(BTreeMap::new)
            .insert(fk_column.into(), pk_table.into());
    }
}
