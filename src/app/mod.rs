pub use workbench_domain as domain;

pub mod connection;
pub mod db_metadata;
pub mod driver_registry;
pub mod loader;
pub mod ports;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use connection::{ConnectError, ConnectionManager};
pub use db_metadata::{DbMetaData, MetadataOptions};
pub use driver_registry::DriverRegistry;
