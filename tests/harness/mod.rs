use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

use schema_workbench::app::{DbMetaData, MetadataOptions};
use schema_workbench::domain::ConnectionSettings;
use schema_workbench::infra::default_registry;

pub const STAR_SCHEMA: &str = "
    CREATE TABLE product (
        product_id INTEGER PRIMARY KEY,
        brand VARCHAR(60) NOT NULL,
        price DECIMAL(10, 2)
    );
    CREATE TABLE store (
        store_id INTEGER PRIMARY KEY,
        region CHAR(2)
    );
    CREATE TABLE time_by_day (
        time_id INTEGER PRIMARY KEY,
        the_date DATE
    );
    CREATE TABLE sales_fact (
        product_id INTEGER REFERENCES product(product_id),
        store_id INTEGER REFERENCES store(store_id),
        time_id INTEGER REFERENCES time_by_day(time_id),
        store_sales NUMERIC(10, 4)
    );
    CREATE VIEW big_sales AS SELECT * FROM sales_fact WHERE store_sales > 100;
";

/// A SQLite database file living as long as the fixture.
pub struct SqliteFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl SqliteFixture {
    pub fn star_schema() -> Self {
        Self::with_sql(STAR_SCHEMA)
    }

    pub fn with_sql(sql: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("foodmart.db");
        Connection::open(&path).unwrap().execute_batch(sql).unwrap();
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> String {
        format!("jdbc:sqlite:{}", self.path.display())
    }

    pub fn execute(&self, sql: &str) {
        Connection::open(&self.path)
            .unwrap()
            .execute_batch(sql)
            .unwrap();
    }

    pub fn options(&self) -> MetadataOptions {
        MetadataOptions::new(ConnectionSettings::new("org.sqlite.JDBC", self.url()))
    }

    pub fn metadata(&self) -> DbMetaData {
        DbMetaData::new(self.options(), default_registry())
    }
}
