use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::schema::Schema;
use super::schema_ref::SchemaRef;
use super::table::Table;

/// Schemas holding a table of a given name, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TableTracker {
    schemas: Vec<SchemaRef>,
}

impl TableTracker {
    pub fn schemas(&self) -> &[SchemaRef] {
        &self.schemas
    }

    pub fn is_ambiguous(&self) -> bool {
        self.schemas.len() > 1
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// In-memory model of one connected database: schemas, their tables, and a
/// by-name index across schemas.
///
/// Every table added through [`Database::add_table`] lives in exactly one
/// schema and is listed exactly once in the tracker for its name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Database {
    pub catalog_name: String,
    pub product_name: String,
    pub product_version: String,
    schemas: BTreeMap<SchemaRef, Schema>,
    tables: HashMap<String, TableTracker>,
}

impl Database {
    pub fn new(
        catalog_name: impl Into<String>,
        product_name: impl Into<String>,
        product_version: impl Into<String>,
    ) -> Self {
        Self {
            catalog_name: catalog_name.into(),
            product_name: product_name.into(),
            product_version: product_version.into(),
            ..Self::default()
        }
    }

    pub fn add_schema(&mut self, name: SchemaRef) -> &mut Schema {
        self.schemas
            .entry(name.clone())
            .or_insert_with(|| Schema::new(name))
    }

    pub fn add_table(&mut self, table: Table) {
        let tracker = self.tables.entry(table.name.clone()).or_default();
        if !tracker.schemas.contains(&table.schema) {
            tracker.schemas.push(table.schema.clone());
        }
        self.add_schema(table.schema.clone())
            .tables
            .insert(table.name.clone(), table);
    }

    pub fn schema(&self, name: &SchemaRef) -> Option<&Schema> {
        self.schemas.get(name)
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn table(&self, schema: &SchemaRef, name: &str) -> Option<&Table> {
        self.schemas.get(schema)?.tables.get(name)
    }

    pub fn table_mut(&mut self, schema: &SchemaRef, name: &str) -> Option<&mut Table> {
        self.schemas.get_mut(schema)?.tables.get_mut(name)
    }

    pub fn tracker(&self, name: &str) -> Option<&TableTracker> {
        self.tables.get(name)
    }

    /// All tables carrying `name`, in tracker order.
    pub fn tables_named(&self, name: &str) -> Vec<&Table> {
        self.tracker(name)
            .map(|tracker| {
                tracker
                    .schemas
                    .iter()
                    .filter_map(|schema| self.table(schema, name))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn table_count(&self) -> usize {
        self.schemas.values().map(|s| s.tables.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_schema_db() -> Database {
        let mut db = Database::new("warehouse", "PostgreSQL", "16.2");
        db.add_table(Table::new(SchemaRef::named("S1"), "ORDERS"));
        db.add_table(Table::new(SchemaRef::named("S2"), "ORDERS"));
        db.add_table(Table::new(SchemaRef::named("S1"), "CUSTOMER"));
        db
    }

    mod add_table {
        use super::*;

        #[test]
        fn registers_in_schema_and_tracker() {
            let db = two_schema_db();

            assert!(db.table(&SchemaRef::named("S1"), "ORDERS").is_some());
            assert!(db.table(&SchemaRef::named("S2"), "ORDERS").is_some());
            assert_eq!(
                db.tracker("ORDERS").unwrap().schemas(),
                &[SchemaRef::named("S1"), SchemaRef::named("S2")]
            );
            assert_eq!(db.table_count(), 3);
        }

        #[test]
        fn re_adding_same_table_does_not_duplicate_tracker_entry() {
            let mut db = two_schema_db();
            let mut replacement = Table::new(SchemaRef::named("S1"), "CUSTOMER");
            replacement.primary_key = Some("id".to_string());

            db.add_table(replacement);

            assert_eq!(db.tracker("CUSTOMER").unwrap().len(), 1);
            assert_eq!(
                db.table(&SchemaRef::named("S1"), "CUSTOMER")
                    .unwrap()
                    .primary_key
                    .as_deref(),
                Some("id")
            );
        }

        #[test]
        fn creates_missing_schema() {
            let mut db = Database::default();
            db.add_table(Table::new(SchemaRef::Unqualified, "t"));

            assert_eq!(db.schema_count(), 1);
            assert!(db.schema(&SchemaRef::Unqualified).is_some());
        }
    }

    mod tracker {
        use super::*;

        #[test]
        fn ambiguous_only_with_multiple_schemas() {
            let db = two_schema_db();

            assert!(db.tracker("ORDERS").unwrap().is_ambiguous());
            assert!(!db.tracker("CUSTOMER").unwrap().is_ambiguous());
            assert!(db.tracker("MISSING").is_none());
        }

        #[test]
        fn tables_named_follows_tracker_order() {
            let db = two_schema_db();
            let schemas: Vec<_> = db
                .tables_named("ORDERS")
                .iter()
                .map(|t| t.schema.to_string())
                .collect();

            assert_eq!(schemas, vec!["S1", "S2"]);
        }
    }

    #[test]
    fn schemas_iterate_in_name_order() {
        let mut db = Database::default();
        db.add_schema(SchemaRef::named("zeta"));
        db.add_schema(SchemaRef::named("alpha"));

        let names: Vec<_> = db.schemas().map(|s| s.name.to_string()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
