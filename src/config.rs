//! Connection settings.
//!
//! Settings live in a small `key=value` properties file:
//!
//! ```text
//! db_name=codecoolshop
//! db_url=localhost:5432
//! db_user=shop
//! db_password=secret
//! ```
//!
//! Any key can be overridden with a `SHOP_`-prefixed environment variable
//! (`SHOP_DB_PASSWORD`, ...).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Port used when `db_url` does not carry one.
pub const DEFAULT_PORT: u16 = 5432;

/// The four values needed to open a connection.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub db_name: String,
    /// `host` or `host:port`; IPv6 hosts go in brackets (`[::1]:5432`).
    pub db_url: String,
    pub db_user: String,
    pub db_password: String,
}

impl ConnectionSettings {
    /// Load settings from a properties file, letting `SHOP_*` env vars override it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable, or lacks one of
    /// the four keys.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.to_str().ok_or_else(|| {
            ConfigError::Message(format!("Settings path is not valid UTF-8: {}", path.display()))
        })?;

        let settings = Config::builder()
            .add_source(File::new(path_str, FileFormat::Ini).required(true))
            .add_source(Environment::with_prefix("SHOP").try_parsing(false))
            .build()?;

        settings.try_deserialize::<ConnectionSettings>()
    }

    /// Host part of `db_url`, brackets stripped.
    pub fn host(&self) -> &str {
        let url = self.db_url.trim();
        if let Some(rest) = url.strip_prefix('[') {
            // [v6addr] or [v6addr]:port
            return rest.split(']').next().unwrap_or(rest);
        }
        match url.rsplit_once(':') {
            Some((host, _)) => host,
            None => url,
        }
    }

    /// Port part of `db_url`, or [`DEFAULT_PORT`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a port is present but is not a valid `u16`.
    pub fn port(&self) -> Result<u16, ConfigError> {
        let url = self.db_url.trim();
        let port = if url.starts_with('[') {
            url.rsplit_once("]:").map(|(_, port)| port)
        } else {
            url.rsplit_once(':').map(|(_, port)| port)
        };

        match port {
            None => Ok(DEFAULT_PORT),
            Some(p) => p.parse::<u16>().map_err(|e| {
                ConfigError::Message(format!("Invalid port '{}' in db_url: {}", p, e))
            }),
        }
    }

    /// Render a key-value connection string for the driver.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `db_url` carries an invalid port.
    pub fn connection_string(&self) -> Result<String, ConfigError> {
        Ok(format!(
            "host={} port={} dbname={} user={} password={}",
            quote(self.host()),
            self.port()?,
            quote(&self.db_name),
            quote(&self.db_user),
            quote(&self.db_password),
        ))
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("db_name", &self.db_name)
            .field("db_url", &self.db_url)
            .field("db_user", &self.db_user)
            .field("db_password", &"<redacted>")
            .finish()
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
