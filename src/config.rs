//! Account and transport configuration

use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// An opaque secret. `Debug` never reveals the contents.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The secret bytes, for handing to the service credentials.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(****)")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Server schema version requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServerVersion {
    Exchange2007Sp1,
    Exchange2010,
    Exchange2010Sp1,
    Exchange2010Sp2,
    #[default]
    Exchange2013,
    Exchange2013Sp1,
}

impl ServerVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exchange2007Sp1 => "Exchange2007_SP1",
            Self::Exchange2010 => "Exchange2010",
            Self::Exchange2010Sp1 => "Exchange2010_SP1",
            Self::Exchange2010Sp2 => "Exchange2010_SP2",
            Self::Exchange2013 => "Exchange2013",
            Self::Exchange2013Sp1 => "Exchange2013_SP1",
        }
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [
            Self::Exchange2007Sp1,
            Self::Exchange2010,
            Self::Exchange2010Sp1,
            Self::Exchange2010Sp2,
            Self::Exchange2013,
            Self::Exchange2013Sp1,
        ]
        .into_iter()
        .find(|v| v.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| Error::Config(format!("Unknown server version: {s}")))
    }
}

/// The mailbox account used to open a service handle.
#[derive(Debug, Clone)]
pub struct MailUser {
    pub email_address: String,
    pub password: Secret,
    pub version: ServerVersion,
    /// Service endpoint. `None` means autodiscovery runs on connect and
    /// fills this in.
    pub endpoint: Option<String>,
    /// SMTP address of a mailbox to act on behalf of.
    pub impersonate: Option<String>,
}

impl MailUser {
    #[must_use]
    pub fn new(email_address: impl Into<String>, password: Secret) -> Self {
        Self {
            email_address: email_address.into(),
            password,
            version: ServerVersion::default(),
            endpoint: None,
            impersonate: None,
        }
    }

    /// Load the account from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `GROUPWARE_EMAIL`
    /// - `GROUPWARE_PASSWORD`
    ///
    /// Optional:
    /// - `GROUPWARE_VERSION` (default: `Exchange2013`)
    /// - `GROUPWARE_URL` (skips autodiscovery)
    /// - `GROUPWARE_IMPERSONATE`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or
    /// the version is unknown.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            email_address: env::var("GROUPWARE_EMAIL")
                .map_err(|_| Error::Config("GROUPWARE_EMAIL not set".into()))?,
            password: env::var("GROUPWARE_PASSWORD")
                .map(Secret::from)
                .map_err(|_| Error::Config("GROUPWARE_PASSWORD not set".into()))?,
            version: env::var("GROUPWARE_VERSION")
                .ok()
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
            endpoint: env::var("GROUPWARE_URL").ok().filter(|v| !v.is_empty()),
            impersonate: env::var("GROUPWARE_IMPERSONATE")
                .ok()
                .filter(|v| !v.is_empty()),
        })
    }
}

/// Settings for the shared outbound TLS transport.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    /// PEM bundle of extra trust anchors, added to the bundled roots.
    pub extra_roots: Option<PathBuf>,
}

impl TransportConfig {
    /// Load transport settings from environment variables
    ///
    /// Optional: `GROUPWARE_CA_FILE`.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            extra_roots: env::var_os("GROUPWARE_CA_FILE").map(PathBuf::from),
        }
    }
}
