pub mod messages;
pub mod metadata;

pub use messages::{DefaultMessages, MessageFormatter};
pub use metadata::{
    ImportedKey, MetadataDriver, MetadataError, MetadataSession, ServerInfo, TableKind,
};
