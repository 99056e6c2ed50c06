use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::ConnectionSettings;
use crate::driver_registry::DriverRegistry;
use crate::ports::{DefaultMessages, MessageFormatter, MetadataSession, ServerInfo};

pub const BLANK_SETTINGS_KEY: &str = "jdbcMetaData.blank.exception";
pub const BLANK_SETTINGS_TEXT: &str =
    "Driver={0}\nConnection URL={1}\nUse Preferences menu to set them";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Driver or URL left blank; carries the formatted message.
    #[error("{0}")]
    Configuration(String),
    #[error("DriverLoadError : no driver registered as '{driver}'")]
    DriverLoad { driver: String },
    #[error("{kind} : {message}")]
    Connection { kind: String, message: String },
}

/// Opens and closes the single connection used for metadata lookups.
///
/// Each open attempt overwrites the last error message; a successful open
/// clears it.
pub struct ConnectionManager {
    registry: DriverRegistry,
    settings: ConnectionSettings,
    messages: Box<dyn MessageFormatter>,
    session: Option<Box<dyn MetadataSession>>,
    server_info: Option<ServerInfo>,
    err_msg: Option<String>,
}

impl ConnectionManager {
    pub fn new(registry: DriverRegistry, settings: ConnectionSettings) -> Self {
        Self::with_messages(registry, settings, Box::new(DefaultMessages))
    }

    pub fn with_messages(
        registry: DriverRegistry,
        settings: ConnectionSettings,
        messages: Box<dyn MessageFormatter>,
    ) -> Self {
        Self {
            registry,
            settings,
            messages,
            session: None,
            server_info: None,
            err_msg: None,
        }
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn err_msg(&self) -> Option<&str> {
        self.err_msg.as_deref()
    }

    /// Product and catalog details read on the most recent successful open.
    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn open_connection(&mut self) -> Result<&dyn MetadataSession, ConnectError> {
        let session = match self.session.take() {
            Some(session) => session,
            None => match self.connect() {
                Ok(session) => {
                    let info = session.server_info();
                    info!(
                        product = %info.product_name,
                        version = %info.product_version,
                        catalog = %info.catalog_name,
                        "connected"
                    );
                    self.server_info = Some(info);
                    session
                }
                Err(err) => {
                    self.err_msg = Some(err.to_string());
                    return Err(err);
                }
            },
        };
        self.err_msg = None;

        Ok(&**self.session.insert(session))
    }

    /// Borrow the open session, if any.
    pub fn session(&self) -> Option<&dyn MetadataSession> {
        self.session.as_deref()
    }

    /// No-op when nothing is open. Close failures are logged, not returned.
    pub fn close_connection(&mut self) {
        if let Some(mut session) = self.session.take() {
            match session.close() {
                Ok(()) => debug!("connection closed"),
                Err(err) => warn!(error = %err, "failed to close connection"),
            }
        }
    }

    fn connect(&self) -> Result<Box<dyn MetadataSession>, ConnectError> {
        if self.settings.is_blank() {
            let message = self.messages.format(
                BLANK_SETTINGS_KEY,
                BLANK_SETTINGS_TEXT,
                &[&self.settings.driver, &self.settings.url],
            );
            warn!("driver or connection URL not configured");
            return Err(ConnectError::Configuration(message));
        }

        let driver = self.registry.get(&self.settings.driver).ok_or_else(|| {
            error!(driver = %self.settings.driver, "driver not registered");
            ConnectError::DriverLoad {
                driver: self.settings.driver.clone(),
            }
        })?;

        debug!(driver = driver.name(), url = %self.settings.url, "connecting");
        driver.connect(&self.settings).map_err(|err| {
            error!(error = %err, "connection failed");
            ConnectError::Connection {
                kind: err.kind().to_string(),
                message: err.message().to_string(),
            }
        })
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close_connection();
    }
}
