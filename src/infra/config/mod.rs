pub mod workbench_toml;

pub use workbench_toml::{ConfigError, ConnectionSection, MetadataSection, WorkbenchConfig};
