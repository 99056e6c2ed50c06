pub mod postgres;
pub mod sqlite;
pub mod type_mapping;

pub use postgres::PostgresDriver;
pub use sqlite::SqliteDriver;
