use std::fmt;

use thiserror::Error;

use crate::domain::{Column, ConnectionSettings};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Not supported: {0}")]
    Unsupported(String),
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Command not found: {0}")]
    CommandNotFound(String),
}

impl MetadataError {
    /// Variant name, used as the error kind in user-facing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "ConnectionFailed",
            Self::QueryFailed(_) => "QueryFailed",
            Self::Unsupported(_) => "Unsupported",
            Self::InvalidJson(_) => "InvalidJson",
            Self::CommandNotFound(_) => "CommandNotFound",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ConnectionFailed(msg)
            | Self::QueryFailed(msg)
            | Self::Unsupported(msg)
            | Self::InvalidJson(msg)
            | Self::CommandNotFound(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Table,
    View,
    MaterializedView,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::MaterializedView => "MATERIALIZED VIEW",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServerInfo {
    pub product_name: String,
    pub product_version: String,
    pub catalog_name: String,
}

/// One imported (foreign) key column and the table it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedKey {
    pub fk_column: String,
    pub pk_table: String,
}

impl ImportedKey {
    pub fn new(fk_column: impl Into<String>, pk_table: impl Into<String>) -> Self {
        Self {
            fk_column: fk_column.into(),
            pk_table: pk_table.into(),
        }
    }
}

/// A database driver able to open metadata sessions.
pub trait MetadataDriver {
    fn name(&self) -> &str;

    fn connect(
        &self,
        settings: &ConnectionSettings,
    ) -> Result<Box<dyn MetadataSession>, MetadataError>;
}

/// An open connection answering catalog questions. Every call blocks until
/// the database responds. A `schema` of `None` means an unqualified lookup.
pub trait MetadataSession {
    fn server_info(&self) -> ServerInfo;

    /// Databases without schemas may return an error here.
    fn schemas(&self) -> Result<Vec<String>, MetadataError>;

    fn tables(
        &self,
        schema: Option<&str>,
        kinds: &[TableKind],
    ) -> Result<Vec<String>, MetadataError>;

    fn imported_keys(
        &self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<ImportedKey>, MetadataError>;

    /// Key columns in key-sequence order.
    fn primary_keys(
        &self,
        schema: Option<&str>,
        table: &str,
    ) -> Result<Vec<String>, MetadataError>;

    fn columns(&self, schema: Option<&str>, table: &str) -> Result<Vec<Column>, MetadataError>;

    fn close(&mut self) -> Result<(), MetadataError>;
}
