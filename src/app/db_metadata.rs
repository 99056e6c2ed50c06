//! Read API over the cached database metadata, used by the schema editor to
//! fill drop-downs and to check that stored table and column references
//! still resolve.
//!
//! Schema arguments are optional; `None` or a blank string means "any
//! schema". When a table name exists in more than one schema and no schema
//! was given, entries are prefixed with `schema->table->` so the caller can
//! tell them apart.

use tracing::{debug, warn};

use crate::connection::ConnectionManager;
use crate::domain::{
    Column, ConnectionSettings, Database, SEPARATOR, SchemaFilter, SchemaRef, Table,
    split_composite,
};
use crate::driver_registry::DriverRegistry;
use crate::loader::{load_columns, load_database};
use crate::ports::{DefaultMessages, MessageFormatter};

#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    pub settings: ConnectionSettings,
    /// Comma- or semicolon-separated schema allow-list.
    pub schema_filter: String,
    /// Carried for the editor; not enforced here.
    pub require_schema: bool,
}

impl MetadataOptions {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn schema_filter(mut self, filter: impl Into<String>) -> Self {
        self.schema_filter = filter.into();
        self
    }

    pub fn require_schema(mut self, require: bool) -> Self {
        self.require_schema = require;
        self
    }
}

pub struct DbMetaData {
    connection: ConnectionManager,
    filter: SchemaFilter,
    require_schema: bool,
    database: Database,
    loaded: bool,
}

fn given(schema: Option<&str>) -> Option<SchemaRef> {
    match SchemaRef::from_input(schema) {
        SchemaRef::Unqualified => None,
        named => Some(named),
    }
}

impl DbMetaData {
    /// Connects, reads schemas and tables, and disconnects. Failures are
    /// reported through [`DbMetaData::err_msg`], never returned.
    pub fn new(options: MetadataOptions, registry: DriverRegistry) -> Self {
        Self::with_messages(options, registry, Box::new(DefaultMessages))
    }

    pub fn with_messages(
        options: MetadataOptions,
        registry: DriverRegistry,
        messages: Box<dyn MessageFormatter>,
    ) -> Self {
        let mut metadata = Self {
            connection: ConnectionManager::with_messages(registry, options.settings, messages),
            filter: SchemaFilter::parse(&options.schema_filter),
            require_schema: options.require_schema,
            database: Database::default(),
            loaded: false,
        };
        metadata.load();
        metadata
    }

    /// Throws away everything cached and reads it again.
    pub fn reset(&mut self) {
        debug!("resetting metadata cache");
        self.load();
    }

    fn load(&mut self) {
        self.database = Database::default();
        self.loaded = false;

        if let Ok(session) = self.connection.open_connection() {
            self.database = load_database(session, &self.filter);
            self.loaded = true;
        }
        self.connection.close_connection();
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Whether the last load reached the database.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn err_msg(&self) -> Option<&str> {
        self.connection.err_msg()
    }

    pub fn db_catalog_name(&self) -> &str {
        &self.database.catalog_name
    }

    pub fn database_product_name(&self) -> &str {
        &self.database.product_name
    }

    pub fn database_product_version(&self) -> &str {
        &self.database.product_version
    }

    pub fn jdbc_connection_url(&self) -> &str {
        &self.connection.settings().url
    }

    pub fn require_schema(&self) -> bool {
        self.require_schema
    }

    pub fn schema_filter(&self) -> &SchemaFilter {
        &self.filter
    }

    /// Schema names in order; the unqualified bucket is listed as `""`.
    pub fn get_all_schemas(&self) -> Vec<String> {
        self.database
            .schemas()
            .map(|schema| schema.name.to_string())
            .collect()
    }

    /// Bare table names of one schema, or `schema->table` entries across all
    /// schemas when none is given.
    pub fn get_all_tables(&self, schema: Option<&str>) -> Vec<String> {
        self.table_listing(schema, |_| true)
    }

    /// Like [`DbMetaData::get_all_tables`] without `exclude`. An entry is
    /// dropped when it ends with `exclude` and starts with the given schema,
    /// so other tables sharing that suffix are dropped too.
    pub fn get_all_tables_excluding(&self, schema: Option<&str>, exclude: &str) -> Vec<String> {
        let prefix = given(schema);
        self.get_all_tables(schema)
            .into_iter()
            .filter(|entry| {
                let excluded = entry.ends_with(exclude)
                    && prefix
                        .as_ref()
                        .is_none_or(|prefix| entry.starts_with(prefix.as_str()));
                !excluded
            })
            .collect()
    }

    pub fn get_fact_tables(&self, schema: Option<&str>) -> Vec<String> {
        self.table_listing(schema, Table::is_fact_table)
    }

    /// Tables referenced by the fact table's foreign keys.
    pub fn get_dimension_tables(&self, schema: Option<&str>, fact_table: &str) -> Vec<String> {
        self.per_table(schema, fact_table, Table::referenced_tables)
    }

    /// Foreign-key column names of the fact table.
    pub fn get_fact_table_fks(&self, schema: Option<&str>, fact_table: &str) -> Vec<String> {
        self.per_table(schema, fact_table, Table::foreign_key_columns)
    }

    pub fn get_table_pk(&self, schema: Option<&str>, table: &str) -> Option<String> {
        self.locate(schema, table)?.primary_key.clone()
    }

    pub fn is_table_exists(&self, schema: Option<&str>, table: &str) -> bool {
        match given(schema) {
            Some(schema) => self.database.table(&schema, table).is_some(),
            None => self.database.tracker(table).is_some(),
        }
    }

    /// Loads the table's columns on first use.
    pub fn is_col_exists(&mut self, schema: Option<&str>, table: &str, column: &str) -> bool {
        let targets = self.targets(schema, table);
        targets.iter().any(|target| {
            self.ensure_columns(target, table);
            self.database
                .table(target, table)
                .is_some_and(|t| t.column(column).is_some())
        })
    }

    /// With a table: its column names (loaded on first use). Without one:
    /// `table->column - TYPE` entries for every table listed by
    /// [`DbMetaData::get_all_tables`].
    pub fn get_all_columns(&mut self, schema: Option<&str>, table: Option<&str>) -> Vec<String> {
        match table {
            Some(table) => {
                for target in self.targets(schema, table) {
                    self.ensure_columns(&target, table);
                }
                self.per_table(schema, table, Table::column_names)
            }
            None => self.all_columns_described(schema),
        }
    }

    pub fn get_all_db_columns(&mut self, schema: Option<&str>, table: &str) -> Vec<Column> {
        let Some(target) = self.targets(schema, table).into_iter().next() else {
            return Vec::new();
        };
        self.ensure_columns(&target, table);
        self.database
            .table(&target, table)
            .and_then(|t| t.columns.as_ref())
            .map(|cols| cols.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn get_column_definition(
        &mut self,
        schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> Option<Column> {
        let target = self.targets(schema, table).into_iter().next()?;
        self.ensure_columns(&target, table);
        self.database.table(&target, table)?.column(column).cloned()
    }

    /// Raw type code of the column.
    pub fn get_column_data_type(
        &mut self,
        schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> Option<i32> {
        self.get_column_definition(schema, table, column)
            .map(|col| col.data_type)
    }

    fn table_listing(&self, schema: Option<&str>, keep: impl Fn(&Table) -> bool) -> Vec<String> {
        match given(schema) {
            Some(schema) => self
                .database
                .schema(&schema)
                .map(|s| {
                    s.tables
                        .values()
                        .filter(|t| keep(*t))
                        .map(|t| t.name.clone())
                        .collect()
                })
                .unwrap_or_default(),
            None => self
                .database
                .schemas()
                .flat_map(|s| s.tables.values())
                .filter(|t| keep(*t))
                .map(Table::composite_name)
                .collect(),
        }
    }

    /// Applies `items` to the named table. Without a schema and with the
    /// name present in several schemas, each item is prefixed with
    /// `schema->table->`.
    fn per_table(
        &self,
        schema: Option<&str>,
        table: &str,
        items: impl Fn(&Table) -> Vec<String>,
    ) -> Vec<String> {
        if let Some(schema) = given(schema) {
            return self
                .database
                .table(&schema, table)
                .map(items)
                .unwrap_or_default();
        }

        match self.database.tables_named(table).as_slice() {
            [] => Vec::new(),
            [only] => items(*only),
            many => many
                .iter()
                .flat_map(|t| {
                    let prefix = t.composite_name();
                    items(*t)
                        .into_iter()
                        .map(move |item| format!("{}{}{}", prefix, SEPARATOR, item))
                })
                .collect(),
        }
    }

    fn locate(&self, schema: Option<&str>, table: &str) -> Option<&Table> {
        match given(schema) {
            Some(schema) => self.database.table(&schema, table),
            None => self.database.tables_named(table).into_iter().next(),
        }
    }

    /// Schemas holding `table` that a lookup should consider.
    fn targets(&self, schema: Option<&str>, table: &str) -> Vec<SchemaRef> {
        match given(schema) {
            Some(schema) if self.database.table(&schema, table).is_some() => vec![schema],
            Some(_) => Vec::new(),
            None => self
                .database
                .tracker(table)
                .map(|tracker| tracker.schemas().to_vec())
                .unwrap_or_default(),
        }
    }

    fn all_columns_described(&mut self, schema: Option<&str>) -> Vec<String> {
        let mut described = Vec::new();
        for entry in self.get_all_tables(schema) {
            let (target, table) = match given(schema) {
                Some(schema) => (schema, entry.clone()),
                None => {
                    let (schema_part, table) = split_composite(&entry);
                    (SchemaRef::from_input(schema_part), table.to_string())
                }
            };

            self.ensure_columns(&target, &table);
            if let Some(cols) = self
                .database
                .table(&target, &table)
                .and_then(|t| t.columns.as_ref())
            {
                described.extend(cols.values().map(|col| {
                    format!("{}{}{} - {}", entry, SEPARATOR, col.name, col.display_type())
                }));
            }
        }
        described
    }

    /// Opens a connection just for this table's columns unless they are
    /// already cached. If the connection fails the table stays unloaded.
    fn ensure_columns(&mut self, schema: &SchemaRef, table: &str) {
        let needs_load = self
            .database
            .table(schema, table)
            .is_some_and(|t| !t.columns_loaded());
        if !needs_load {
            return;
        }

        let columns = match self.connection.open_connection() {
            Ok(session) => load_columns(session, schema, table),
            Err(err) => {
                warn!(table, error = %err, "cannot load columns");
                return;
            }
        };
        self.connection.close_connection();

        if let Some(t) = self.database.table_mut(schema, table) {
            t.set_columns(columns);
        }
    }
}
