use std::io::ErrorKind;
use std::process::{Command, Output};

use serde::Deserialize;
use tracing::debug;

use crate::adapters::type_mapping::from_postgres;
use crate::app::ports::{
    ImportedKey, MetadataDriver, MetadataError, MetadataSession, ServerInfo, TableKind,
};
use crate::domain::{Column, ConnectionSettings};

/// PostgreSQL via the `psql` client. Every catalog question is one `psql -c`
/// invocation returning a single JSON document.
#[derive(Debug, Clone)]
pub struct PostgresDriver {
    psql: String,
}

impl Default for PostgresDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PostgresDriver {
    pub fn new() -> Self {
        Self {
            psql: "psql".to_string(),
        }
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            psql: program.into(),
        }
    }

    /// Accepts JDBC style URLs and hands anything else to libpq unchanged.
    /// `jdbc:postgresql:foodmart` has no host and becomes `postgresql:///foodmart`.
    pub fn to_dsn(url: &str) -> String {
        let url = url.trim();
        let url = url.strip_prefix("jdbc:").unwrap_or(url);
        if url.starts_with("postgresql://") || url.starts_with("postgres://") {
            return url.to_string();
        }
        match url.strip_prefix("postgresql:") {
            Some(database) => format!("postgresql:///{}", database),
            None => url.to_string(),
        }
    }
}

impl MetadataDriver for PostgresDriver {
    fn name(&self) -> &str {
        "postgres"
    }

    fn connect(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<Box<dyn MetadataSession>, MetadataError> {
        let mut session = PostgresSession {
            psql: self.psql.clone(),
            dsn: Self::to_dsn(&settings.url),
            username: settings.username.clone(),
            password: settings.password.clone(),
            info: ServerInfo::default(),
            closed: false,
        };

        let raw = session.run(&server_info_query()).map_err(|e| match e {
            MetadataError::QueryFailed(msg) => MetadataError::ConnectionFailed(msg),
            other => other,
        })?;
        session.info = parse_server_info(&raw)?;
        debug!(
            version = %session.info.product_version,
            database = %session.info.catalog_name,
            "postgres connection verified"
        );

        Ok(Box::new(session))
    }
}

struct PostgresSession {
    psql: String,
    dsn: String,
    username: Option<String>,
    password: Option<String>,
    info: ServerInfo,
    closed: bool,
}

impl PostgresSession {
    fn run(&self, query: &str) -> Result<String, MetadataError> {
        if self.closed {
            return Err(MetadataError::ConnectionFailed(
                "connection closed".to_string(),
            ));
        }

        let mut command = Command::new(&self.psql);
        command
            .arg(&self.dsn)
            .arg("-X") // ignore .psqlrc
            .arg("-v")
            .arg("ON_ERROR_STOP=1")
            .arg("-t")
            .arg("-A")
            .arg("-c")
            .arg(query);
        if let Some(user) = &self.username {
            command.env("PGUSER", user);
        }
        if let Some(password) = &self.password {
            command.env("PGPASSWORD", password);
        }

        let Output {
            status,
            stdout,
            stderr,
        } = command.output().map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                MetadataError::CommandNotFound(format!("{}: {}", self.psql, e))
            } else {
                MetadataError::QueryFailed(e.to_string())
            }
        })?;

        if !status.success() {
            return Err(MetadataError::QueryFailed(
                String::from_utf8_lossy(&stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

impl MetadataSession for PostgresSession {
    fn server_info(&self) -> ServerInfo {
        self.info.clone()
    }

    fn schemas(&self) -> Result<Vec<String>, MetadataError> {
        parse_json_list(&self.run(&schemas_query())?)
    }

    fn tables(
        &self,
        schema: Option<&str>,
        kinds: &[TableKind],
    ) -> Result<Vec<String>, MetadataError> {
        if kinds.is_empty() {
            return Ok(Vec::new());
        }
        parse_json_list(&self.run(&tables_query(schema, kinds))?)
    }

    fn imported_keys(
        &self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKey>, MetadataError> {
        parse_imported_keys(&self.run(&imported_keys_query(schema, table))?)
    }

    fn primary_keys(&self, schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError> {
        parse_json_list(&self.run(&primary_keys_query(schema, table))?)
    }

    fn columns(&self, schema: Option<&str>, table: &str) -> Result<Vec<Column>, MetadataError> {
        parse_columns(&self.run(&columns_query(schema, table))?)
    }

    fn close(&mut self) -> Result<(), MetadataError> {
        self.closed = true;
        Ok(())
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Restricts `n`/`c` aliases to one schema, or to what the search path sees.
fn schema_condition(schema: Option<&str>) -> String {
    match schema {
        Some(schema) => format!("n.nspname = {}", quote_literal(schema)),
        None => "pg_catalog.pg_table_is_visible(c.oid)".to_string(),
    }
}

fn relkinds(kind: TableKind) -> &'static [&'static str] {
    match kind {
        TableKind::Table => &["'r'", "'p'"],
        TableKind::View => &["'v'"],
        TableKind::MaterializedView => &["'m'"],
    }
}

fn server_info_query() -> String {
    "SELECT json_build_object('version', current_setting('server_version'), 'database', current_database())"
        .to_string()
}

fn schemas_query() -> String {
    r#"
    SELECT json_agg(nspname ORDER BY nspname)
    FROM pg_namespace
    WHERE nspname NOT IN ('pg_catalog', 'information_schema', 'pg_toast')
      AND nspname NOT LIKE 'pg_temp_%'
      AND nspname NOT LIKE 'pg_toast_temp_%'
    "#
    .to_string()
}

fn tables_query(schema: Option<&str>, kinds: &[TableKind]) -> String {
    let kinds = kinds
        .iter()
        .flat_map(|kind| relkinds(*kind).iter().copied())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"
        SELECT json_agg(c.relname ORDER BY c.relname)
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        WHERE c.relkind IN ({})
          AND {}
        "#,
        kinds,
        schema_condition(schema)
    )
}

fn imported_keys_query(schema: Option<&str>, table: &str) -> String {
    format!(
        r#"
        SELECT json_agg(json_build_object('fk_column', a.attname, 'pk_table', rc.relname)
                        ORDER BY con.conname, k.ord)
        FROM pg_constraint con
        JOIN pg_class c ON c.oid = con.conrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_class rc ON rc.oid = con.confrelid
        CROSS JOIN LATERAL unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
        JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
        WHERE con.contype = 'f'
          AND c.relname = {}
          AND {}
        "#,
        quote_literal(table),
        schema_condition(schema)
    )
}

fn primary_keys_query(schema: Option<&str>, table: &str) -> String {
    format!(
        r#"
        SELECT json_agg(a.attname ORDER BY array_position(i.indkey::int2[], a.attnum))
        FROM pg_index i
        JOIN pg_class c ON c.oid = i.indrelid
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN pg_attribute a ON a.attrelid = c.oid AND a.attnum = ANY(i.indkey)
        WHERE i.indisprimary
          AND c.relname = {}
          AND {}
        "#,
        quote_literal(table),
        schema_condition(schema)
    )
}

fn columns_query(schema: Option<&str>, table: &str) -> String {
    format!(
        r#"
        SELECT json_agg(json_build_object(
                   'name', col.column_name,
                   'data_type', col.data_type,
                   'udt_name', col.udt_name,
                   'char_length', col.character_maximum_length,
                   'numeric_precision', col.numeric_precision,
                   'numeric_scale', col.numeric_scale)
               ORDER BY col.ordinal_position)
        FROM pg_class c
        JOIN pg_namespace n ON n.oid = c.relnamespace
        JOIN information_schema.columns col
          ON col.table_schema = n.nspname AND col.table_name = c.relname
        WHERE c.relname = {}
          AND {}
        "#,
        quote_literal(table),
        schema_condition(schema)
    )
}

/// `json_agg` over zero rows yields SQL NULL, which psql prints as nothing.
fn json_payload(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty() && trimmed != "null").then_some(trimmed)
}

fn invalid_json(err: serde_json::Error) -> MetadataError {
    MetadataError::InvalidJson(err.to_string())
}

fn parse_server_info(raw: &str) -> Result<ServerInfo, MetadataError> {
    #[derive(Deserialize)]
    struct RawInfo {
        version: String,
        database: String,
    }

    let payload = json_payload(raw)
        .ok_or_else(|| MetadataError::InvalidJson("empty server info".to_string()))?;
    let info: RawInfo = serde_json::from_str(payload).map_err(invalid_json)?;
    Ok(ServerInfo {
        product_name: "PostgreSQL".to_string(),
        product_version: info.version,
        catalog_name: info.database,
    })
}

fn parse_json_list(raw: &str) -> Result<Vec<String>, MetadataError> {
    match json_payload(raw) {
        Some(payload) => serde_json::from_str(payload).map_err(invalid_json),
        None => Ok(Vec::new()),
    }
}

fn parse_imported_keys(raw: &str) -> Result<Vec<ImportedKey>, MetadataError> {
    #[derive(Deserialize)]
    struct RawKey {
        fk_column: String,
        pk_table: String,
    }

    let Some(payload) = json_payload(raw) else {
        return Ok(Vec::new());
    };
    let keys: Vec<RawKey> = serde_json::from_str(payload).map_err(invalid_json)?;
    Ok(keys
        .into_iter()
        .map(|k| ImportedKey::new(k.fk_column, k.pk_table))
        .collect())
}

fn parse_columns(raw: &str) -> Result<Vec<Column>, MetadataError> {
    #[derive(Deserialize)]
    struct RawColumn {
        name: String,
        data_type: String,
        udt_name: String,
        char_length: Option<i32>,
        numeric_precision: Option<i32>,
        numeric_scale: Option<i32>,
    }

    let Some(payload) = json_payload(raw) else {
        return Ok(Vec::new());
    };
    let columns: Vec<RawColumn> = serde_json::from_str(payload).map_err(invalid_json)?;
    Ok(columns
        .into_iter()
        .map(|c| {
            let (code, size, digits) = from_postgres(
                &c.data_type,
                c.char_length,
                c.numeric_precision,
                c.numeric_scale,
            );
            Column::new(c.name, code, c.udt_name, size, digits)
        })
        .collect())
}
