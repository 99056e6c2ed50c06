pub mod column;
pub mod connection_settings;
pub mod database;
pub mod qualified;
pub mod schema;
pub mod schema_filter;
pub mod schema_ref;
pub mod sql_type;
pub mod table;

pub use column::Column;
pub use connection_settings::ConnectionSettings;
pub use database::{Database, TableTracker};
pub use qualified::{SEPARATOR, composite, split_composite};
pub use schema::Schema;
pub use schema_filter::SchemaFilter;
pub use schema_ref::SchemaRef;
pub use sql_type::display_type;
pub use table::Table;
