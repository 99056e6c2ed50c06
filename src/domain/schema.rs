use std::collections::BTreeMap;

use serde::Serialize;

use super::schema_ref::SchemaRef;
use super::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Schema {
    pub name: SchemaRef,
    pub tables: BTreeMap<String, Table>,
}

impl Schema {
    pub fn new(name: SchemaRef) -> Self {
        Self {
            name,
            tables: BTreeMap::new(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}
