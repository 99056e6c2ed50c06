use std::rc::Rc;

use crate::adapters::{PostgresDriver, SqliteDriver};
use crate::app::DriverRegistry;

/// Every driver this build ships, reachable by name or by its JDBC class name.
pub fn default_registry() -> DriverRegistry {
    DriverRegistry::new()
        .with(
            Rc::new(PostgresDriver::new()),
            &["postgresql", "org.postgresql.Driver"],
        )
        .with(Rc::new(SqliteDriver::new()), &["org.sqlite.JDBC"])
}
