//! Error types for groupware-mail

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The server certificate failed the trust policy during the handshake.
    #[error("Certificate rejected: {0}")]
    TrustRejected(String),

    /// A member the adapter expects on the opaque library surface is missing.
    ///
    /// Not retryable: the library's internal shape no longer matches.
    #[error("Contract mismatch: cannot find {member} on {owner}")]
    ContractMismatch { owner: String, member: String },

    /// The begin or end primitive reported a failure.
    #[error("Operation fault: {0}")]
    OperationFault(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    pub(crate) fn contract_mismatch(owner: &str, member: impl Into<String>) -> Self {
        Self::ContractMismatch {
            owner: owner.to_string(),
            member: member.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
