use rusqlite::{Connection, OpenFlags, params};
use tracing::debug;

use crate::adapters::type_mapping::from_declared_type;
use crate::app::ports::{
    ImportedKey, MetadataDriver, MetadataError, MetadataSession, ServerInfo, TableKind,
};
use crate::domain::{Column, ConnectionSettings};

const URL_PREFIXES: &[&str] = &["jdbc:sqlite:", "sqlite://", "sqlite:"];

/// SQLite database files, opened read-only. SQLite has no schemas, so every
/// table ends up in the unqualified bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDriver;

impl SqliteDriver {
    pub fn new() -> Self {
        Self
    }

    /// `jdbc:sqlite:/data/foodmart.db`, `sqlite:foodmart.db` or a bare path.
    pub fn database_path(url: &str) -> &str {
        let url = url.trim();
        URL_PREFIXES
            .iter()
            .find_map(|prefix| url.strip_prefix(prefix))
            .unwrap_or(url)
    }
}

impl MetadataDriver for SqliteDriver {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn connect(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<Box<dyn MetadataSession>, MetadataError> {
        let path = Self::database_path(&settings.url);
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| MetadataError::ConnectionFailed(format!("{}: {}", path, e)))?;

        let version: String = conn
            .query_row("SELECT sqlite_version()", [], |row| row.get(0))
            .map_err(|e| MetadataError::ConnectionFailed(format!("{}: {}", path, e)))?;
        debug!(path, version = %version, "sqlite database opened");

        Ok(Box::new(SqliteSession {
            conn: Some(conn),
            info: ServerInfo {
                product_name: "SQLite".to_string(),
                product_version: version,
                catalog_name: "main".to_string(),
            },
        }))
    }
}

struct SqliteSession {
    conn: Option<Connection>,
    info: ServerInfo,
}

impl SqliteSession {
    fn conn(&self) -> Result<&Connection, MetadataError> {
        self.conn
            .as_ref()
            .ok_or_else(|| MetadataError::ConnectionFailed("connection closed".to_string()))
    }

    fn query_strings(&self, sql: &str, table: &str) -> Result<Vec<String>, MetadataError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(query_failed)?;
        let rows = stmt
            .query_map(params![table], |row| row.get::<_, String>(0))
            .map_err(query_failed)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }
}

fn query_failed(err: rusqlite::Error) -> MetadataError {
    MetadataError::QueryFailed(err.to_string())
}

fn sqlite_kind(kind: TableKind) -> Result<&'static str, MetadataError> {
    match kind {
        TableKind::Table => Ok("'table'"),
        TableKind::View => Ok("'view'"),
        TableKind::MaterializedView => Err(MetadataError::Unsupported(format!(
            "table type {} is not available in SQLite",
            kind
        ))),
    }
}

impl MetadataSession for SqliteSession {
    fn server_info(&self) -> ServerInfo {
        self.info.clone()
    }

    fn schemas(&self) -> Result<Vec<String>, MetadataError> {
        Err(MetadataError::Unsupported(
            "SQLite has no schemas".to_string(),
        ))
    }

    fn tables(
        &self,
        _schema: Option<&str>,
        kinds: &[TableKind],
    ) -> Result<Vec<String>, MetadataError> {
        let kinds = kinds
            .iter()
            .map(|kind| sqlite_kind(*kind))
            .collect::<Result<Vec<_>, _>>()?;
        if kinds.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT name FROM sqlite_master \
             WHERE type IN ({}) AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
             ORDER BY name",
            kinds.join(", ")
        );
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql).map_err(query_failed)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(query_failed)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }

    fn imported_keys(
        &self,
        _schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKey>, MetadataError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT \"from\", \"table\" FROM pragma_foreign_key_list(?1) ORDER BY id, seq",
            )
            .map_err(query_failed)?;
        let rows = stmt
            .query_map(params![table], |row| {
                Ok(ImportedKey::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                ))
            })
            .map_err(query_failed)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }

    fn primary_keys(&self, _schema: Option<&str>, table: &str) -> Result<Vec<String>, MetadataError> {
        self.query_strings(
            "SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk",
            table,
        )
    }

    fn columns(&self, _schema: Option<&str>, table: &str) -> Result<Vec<Column>, MetadataError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(query_failed)?;
        let rows = stmt
            .query_map(params![table], |row| {
                let name: String = row.get(0)?;
                let declared: String = row.get(1)?;
                let (data_type, size, digits) = from_declared_type(&declared);
                Ok(Column::new(name, data_type, declared, size, digits))
            })
            .map_err(query_failed)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(query_failed)
    }

    fn close(&mut self) -> Result<(), MetadataError> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| MetadataError::ConnectionFailed(e.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sql_type::types;
    use rstest::rstest;
    use tempfile::TempDir;

    fn create_db(dir: &TempDir) -> String {
        let path = dir.path().join("foodmart.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE product (
                 product_id INTEGER PRIMARY KEY,
                 product_name VARCHAR(60) NOT NULL,
                 price DECIMAL(10, 2)
             );
             CREATE TABLE store (store_id INTEGER, region CHAR(2), PRIMARY KEY (store_id, region));
             CREATE TABLE sales_fact (
                 product_id INTEGER REFERENCES product(product_id),
                 store_id INTEGER,
                 region CHAR(2),
                 amount NUMERIC(12, 4),
                 FOREIGN KEY (store_id, region) REFERENCES store(store_id, region)
             );
             CREATE VIEW big_sales AS SELECT * FROM sales_fact WHERE amount > 100;",
        )
        .unwrap();
        format!("jdbc:sqlite:{}", path.display())
    }

    fn open(url: &str) -> Box<dyn MetadataSession> {
        SqliteDriver::new()
            .connect(&ConnectionSettings::new("sqlite", url))
            .unwrap()
    }

    #[rstest]
    #[case("jdbc:sqlite:/data/fm.db", "/data/fm.db")]
    #[case("sqlite:fm.db", "fm.db")]
    #[case("sqlite:///data/fm.db", "/data/fm.db")]
    #[case(" /data/fm.db ", "/data/fm.db")]
    fn database_path_strips_url_prefix(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(SqliteDriver::database_path(url), expected);
    }

    #[test]
    fn missing_file_is_a_connection_error() {
        let dir = TempDir::new().unwrap();
        let url = format!("jdbc:sqlite:{}", dir.path().join("absent.db").display());

        let err = SqliteDriver::new()
            .connect(&ConnectionSettings::new("sqlite", url))
            .err()
            .unwrap();

        assert_eq!(err.kind(), "ConnectionFailed");
    }

    #[test]
    fn server_info_reports_sqlite() {
        let dir = TempDir::new().unwrap();
        let session = open(&create_db(&dir));

        let info = session.server_info();
        assert_eq!(info.product_name, "SQLite");
        assert_eq!(info.catalog_name, "main");
        assert!(!info.product_version.is_empty());
    }

    #[test]
    fn schemas_are_unsupported() {
        let dir = TempDir::new().unwrap();
        let session = open(&create_db(&dir));

        assert!(matches!(session.schemas(), Err(MetadataError::Unsupported(_))));
    }

    mod tables {
        use super::*;

        #[test]
        fn materialized_views_are_rejected() {
            let dir = TempDir::new().unwrap();
            let session = open(&create_db(&dir));

            let result = session.tables(
                None,
                &[TableKind::Table, TableKind::View, TableKind::MaterializedView],
            );

            assert!(matches!(result, Err(MetadataError::Unsupported(_))));
        }

        #[test]
        fn lists_requested_kinds_sorted() {
            let dir = TempDir::new().unwrap();
            let session = open(&create_db(&dir));

            assert_eq!(
                session.tables(None, &[TableKind::Table]).unwrap(),
                vec!["product", "sales_fact", "store"]
            );
            assert_eq!(
                session
                    .tables(None, &[TableKind::Table, TableKind::View])
                    .unwrap(),
                vec!["big_sales", "product", "sales_fact", "store"]
            );
        }
    }

    #[test]
    fn imported_keys_list_each_column() {
        let dir = TempDir::new().unwrap();
        let session = open(&create_db(&dir));

        let mut keys = session.imported_keys(None, "sales_fact").unwrap();
        keys.sort_by(|a, b| a.fk_column.cmp(&b.fk_column));

        assert_eq!(
            keys,
            vec![
                ImportedKey::new("product_id", "product"),
                ImportedKey::new("region", "store"),
                ImportedKey::new("store_id", "store"),
            ]
        );
        assert!(session.imported_keys(None, "product").unwrap().is_empty());
    }

    #[test]
    fn primary_keys_follow_key_order() {
        let dir = TempDir::new().unwrap();
        let session = open(&create_db(&dir));

        assert_eq!(session.primary_keys(None, "store").unwrap(), vec!["store_id", "region"]);
        assert!(session.primary_keys(None, "sales_fact").unwrap().is_empty());
    }

    #[test]
    fn columns_carry_parsed_types() {
        let dir = TempDir::new().unwrap();
        let session = open(&create_db(&dir));

        let columns = session.columns(None, "product").unwrap();

        assert_eq!(
            columns,
            vec![
                Column::new("product_id", types::INTEGER, "INTEGER", 10, 0),
                Column::new("product_name", types::VARCHAR, "VARCHAR(60)", 60, 0),
                Column::new("price", types::DECIMAL, "DECIMAL(10, 2)", 10, 2),
            ]
        );
    }

    #[test]
    fn close_is_repeatable_and_blocks_queries() {
        let dir = TempDir::new().unwrap();
        let mut session = open(&create_db(&dir));

        session.close().unwrap();
        session.close().unwrap();

        assert!(matches!(
            session.columns(None, "product"),
            Err(MetadataError::ConnectionFailed(_))
        ));
    }
}
