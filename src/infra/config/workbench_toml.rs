use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::app::MetadataOptions;
use crate::domain::ConnectionSettings;

const APP_DIR: &str = "schema-workbench";
const FILE_NAME: &str = "workbench.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },
    #[error("Invalid config format: {0}")]
    InvalidFormat(String),
}

/// ```toml
/// [connection]
/// driver = "postgres"
/// url = "jdbc:postgresql://localhost/foodmart"
///
/// [metadata]
/// schemas = "public, sales"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkbenchConfig {
    pub connection: ConnectionSection,
    pub metadata: MetadataSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionSection {
    pub driver: String,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MetadataSection {
    /// Comma or semicolon separated schema names. Empty keeps every schema.
    pub schemas: String,
    pub require_schema: bool,
}

impl WorkbenchConfig {
    /// `<config dir>/schema-workbench/workbench.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(FILE_NAME))
    }

    /// A missing file yields the default configuration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))
    }

    pub fn to_options(&self) -> MetadataOptions {
        let connection = &self.connection;
        let settings = ConnectionSettings::new(&connection.driver, &connection.url)
            .with_credentials(connection.username.clone(), connection.password.clone());
        MetadataOptions::new(settings)
            .schema_filter(self.metadata.schemas.clone())
            .require_schema(self.metadata.require_schema)
    }
}
