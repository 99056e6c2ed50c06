//! In-memory driver for exercising the cache without a database.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::{Column, ConnectionSettings};
use crate::driver_registry::DriverRegistry;
use crate::ports::{
    ImportedKey, MetadataDriver, MetadataError, MetadataSession, ServerInfo, TableKind,
};

pub const FAKE_DRIVER: &str = "fake";

#[derive(Debug, Clone)]
pub struct FakeTable {
    pub schema: Option<String>,
    pub name: String,
    pub kind: TableKind,
    pub primary_keys: Vec<String>,
    pub imported_keys: Vec<ImportedKey>,
    pub columns: Vec<Column>,
}

impl FakeTable {
    pub fn new(schema: Option<&str>, name: &str) -> Self {
        Self {
            schema: schema.map(str::to_string),
            name: name.to_string(),
            kind: TableKind::Table,
            primary_keys: Vec::new(),
            imported_keys: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: TableKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn pk(mut self, columns: &[&str]) -> Self {
        self.primary_keys = columns.iter().map(|c| (*c).to_string()).collect();
        self
    }

    pub fn fk(mut self, fk_column: &str, pk_table: &str) -> Self {
        self.imported_keys.push(ImportedKey::new(fk_column, pk_table));
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    pub server: ServerInfo,
    pub schemas: Vec<String>,
    pub tables: Vec<FakeTable>,
    pub fail_connect: Option<MetadataError>,
    pub fail_schemas: bool,
    pub reject_materialized_views: bool,
    pub fail_imported_keys_for: Vec<String>,
    pub fail_columns_for: Vec<String>,
    pub fail_close: bool,
}

impl FakeCatalog {
    pub fn new(schemas: &[&str]) -> Self {
        Self {
            server: ServerInfo {
                product_name: "FakeDB".to_string(),
                product_version: "1.0".to_string(),
                catalog_name: "fake_catalog".to_string(),
            },
            schemas: schemas.iter().map(|s| (*s).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn table(mut self, table: FakeTable) -> Self {
        self.tables.push(table);
        self
    }
}

/// Number of calls made against the fake, summed over every session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub connects: usize,
    pub schemas: usize,
    pub tables: usize,
    pub imported_keys: usize,
    pub primary_keys: usize,
    pub columns: usize,
    pub closes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeDriver {
    catalog: Rc<RefCell<FakeCatalog>>,
    calls: Rc<RefCell<CallCounts>>,
}

impl FakeDriver {
    pub fn new(catalog: FakeCatalog) -> Self {
        Self {
            catalog: Rc::new(RefCell::new(catalog)),
            calls: Rc::default(),
        }
    }

    pub fn calls(&self) -> CallCounts {
        *self.calls.borrow()
    }

    pub fn reset_calls(&self) {
        *self.calls.borrow_mut() = CallCounts::default();
    }

    /// Changes what later sessions see.
    pub fn update(&self, f: impl FnOnce(&mut FakeCatalog)) {
        f(&mut self.catalog.borrow_mut());
    }

    pub fn registry(&self) -> DriverRegistry {
        DriverRegistry::new().with(Rc::new(self.clone()), &["org.fake.Driver"])
    }
}

impl MetadataDriver for FakeDriver {
    fn name(&self) -> &str {
        FAKE_DRIVER
    }

    fn connect(
        &self,
        _settings: &ConnectionSettings,
    ) -> Result<Box<dyn MetadataSession>, MetadataError> {
        self.calls.borrow_mut().connects += 1;
        if let Some(err) = self.catalog.borrow().fail_connect.clone() {
            return Err(err);
        }
        Ok(Box::new(FakeSession {
            catalog: self.catalog.borrow().clone(),
            calls: Rc::clone(&self.calls),
        }))
    }
}

struct FakeSession {
    catalog: FakeCatalog,
    calls: Rc<RefCell<CallCounts>>,
}

impl FakeSession {
    fn find(&self, schema: Option<&str>, table: &str) -> Option<&FakeTable> {
        self.catalog
            .tables
            .iter()
            .find(|t| t.name == table && (schema.is_none() || t.schema.as_deref() == schema))
    }
}

impl MetadataSession for FakeSession {
    fn server_info(&self) -> ServerInfo {
        self.catalog.server.clone()
    }

    fn schemas(&self) -> Result<Vec<String>, MetadataError> {
        self.calls.borrow_mut().schemas += 1;
        if self.catalog.fail_schemas {
            return Err(MetadataError::Unsupported("schemas".to_string()));
        }
        Ok(self.catalog.schemas.clone())
    }

    fn tables(
        &self,
        schema: Option<&str>,
        kinds: &[TableKind],
    ) -> Result<Vec<String>, MetadataError> {
        self.calls.borrow_mut().tables += 1;
        if self.catalog.reject_materialized_views && kinds.contains(&TableKind::MaterializedView)
        {
            return Err(MetadataError::Unsupported(
                "table type MATERIALIZED VIEW".to_string(),
            ));
        }
        Ok(self
            .catalog
            .tables
            .iter()
            .filter(|t| schema.is_none() || t.schema.as_deref() == schema)
            .filter(|t| kinds.contains(&t.kind))
            .map(|t| t.name.clone())
            .collect())
    }

    fn imported_keys(
        &self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKey>, MetadataError> {
        self.calls.borrow_mut().imported_keys += 1;
        if self.catalog.fail_imported_keys_for.iter().any(|t| t == table) {
            return Err(MetadataError::QueryFailed(format!("imported keys of {}", table)));
        }
        Ok(self
            .find(schema, table)
            .map(|t| t.imported_keys.clone())
            .unwrap_or_default())
    }

    fn primary_keys(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError> {
        self.calls.borrow_mut().primary_keys += 1;
        Ok(self
            .find(schema, table)
            .map(|t| t.primary_keys.clone())
            .unwrap_or_default())
    }

    fn columns(&self, schema: Option<&str>, table: &str) -> Result<Vec<Column>, MetadataError> {
        self.calls.borrow_mut().columns += 1;
        if self.catalog.fail_columns_for.iter().any(|t| t == table) {
            return Err(MetadataError::QueryFailed(format!("columns of {}", table)));
        }
        Ok(self
            .find(schema, table)
            .map(|t| t.columns.clone())
            .unwrap_or_default())
    }

    fn close(&mut self) -> Result<(), MetadataError> {
        self.calls.borrow_mut().closes += 1;
        if self.catalog.fail_close {
            return Err(MetadataError::ConnectionFailed("close refused".to_string()));
        }
        Ok(())
    }
}
