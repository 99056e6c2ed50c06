//! Populates a [`Database`] from an open metadata session.
//!
//! Every catalog call is best-effort: a failing call is logged and treated as
//! having returned nothing.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::domain::{Column, Database, SchemaFilter, SchemaRef, Table};
use crate::ports::{MetadataSession, TableKind};

const TABLE_KINDS: &[TableKind] = &[
    TableKind::Table,
    TableKind::View,
    TableKind::MaterializedView,
];
const FALLBACK_TABLE_KINDS: &[TableKind] = &[TableKind::Table];

static RECYCLE_BIN_RE: OnceLock<Regex> = OnceLock::new();

/// Oracle keeps dropped tables around as `BIN$...` entries.
fn is_recycle_bin(table: &str) -> bool {
    RECYCLE_BIN_RE
        .get_or_init(|| Regex::new(r"^BIN\$").expect("static pattern compiles"))
        .is_match(table)
}

/// Schemas and tables are read eagerly; columns are left for later.
pub fn load_database(session: &dyn MetadataSession, filter: &SchemaFilter) -> Database {
    let info = session.server_info();
    let mut db = Database::new(info.catalog_name, info.product_name, info.product_version);

    let schemas = discover_schemas(session, filter);
    if schemas.is_empty() {
        debug!("no schemas available, using unqualified tables");
        db.add_schema(SchemaRef::Unqualified);
        load_tables(session, &mut db, &SchemaRef::Unqualified);
    } else {
        for name in schemas {
            let schema = SchemaRef::Named(name);
            db.add_schema(schema.clone());
            load_tables(session, &mut db, &schema);
        }
    }

    info!(
        schemas = db.schema_count(),
        tables = db.table_count(),
        "metadata loaded"
    );
    db
}

fn discover_schemas(session: &dyn MetadataSession, filter: &SchemaFilter) -> Vec<String> {
    let names = match session.schemas() {
        Ok(names) => names,
        Err(err) => {
            // Some databases have no notion of schemas at all.
            debug!(error = %err, "schema listing unavailable");
            return Vec::new();
        }
    };

    names
        .into_iter()
        .filter(|name| !name.is_empty())
        .filter(|name| {
            let allowed = filter.allows(name);
            if !allowed {
                debug!(schema = %name, "schema filtered out");
            }
            allowed
        })
        .collect()
}

fn table_names(session: &dyn MetadataSession, schema: &SchemaRef) -> Vec<String> {
    match session.tables(schema.as_option(), TABLE_KINDS) {
        Ok(names) => names,
        Err(err) => {
            debug!(schema = %schema, error = %err, "table kinds rejected, retrying with TABLE only");
            session
                .tables(schema.as_option(), FALLBACK_TABLE_KINDS)
                .unwrap_or_else(|err| {
                    warn!(schema = %schema, error = %err, "failed to list tables");
                    Vec::new()
                })
        }
    }
}

fn load_tables(session: &dyn MetadataSession, db: &mut Database, schema: &SchemaRef) {
    for name in table_names(session, schema) {
        if is_recycle_bin(&name) {
            continue;
        }

        let mut table = Table::new(schema.clone(), name);

        match session.imported_keys(schema.as_option(), &table.name) {
            Ok(keys) => {
                for key in keys {
                    table.add_foreign_key(key.fk_column, key.pk_table);
                }
            }
            Err(err) => {
                warn!(table = %table.composite_name(), error = %err, "failed to read imported keys");
            }
        }

        table.primary_key = primary_key(session, schema, &table.name);
        db.add_table(table);
    }
}

fn primary_key(session: &dyn MetadataSession, schema: &SchemaRef, table: &str) -> Option<String> {
    match session.primary_keys(schema.as_option(), table) {
        Ok(columns) => columns.into_iter().next(),
        Err(err) => {
            warn!(table, error = %err, "failed to read primary key");
            None
        }
    }
}

/// Columns of one table; an empty list when the driver refuses.
pub fn load_columns(session: &dyn MetadataSession, schema: &SchemaRef, table: &str) -> Vec<Column> {
    match session.columns(schema.as_option(), table) {
        Ok(columns) => {
            debug!(table, count = columns.len(), "columns loaded");
            columns
        }
        Err(err) => {
            warn!(table, error = %err, "failed to read columns");
            Vec::new()
        }
    }
}
