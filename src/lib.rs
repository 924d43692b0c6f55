//! Groupware mail submission
//!
//! Sends mail through a groupware server whose client library exposes
//! batch item creation only through a hidden begin/end request. Two
//! pieces make that workable:
//!
//! - [`trust`]: a TLS trust policy that accepts self-signed server
//!   certificates when an untrusted root is the only problem, wired
//!   into rustls through [`TlsTransport`].
//! - [`adapter`]: runtime discovery of the hidden request members,
//!   compiled once per operation and exposed as a future-returning call.
//!
//! [`GroupwareClient`] ties them to message submission and returns a
//! per-item [`ResponseCollection`].

pub mod adapter;
mod client;
mod config;
mod disposition;
mod error;
mod folder;
mod message;
mod response;
mod transport;
pub mod trust;

pub use client::{
    Connector, FieldValue, GroupwareClient, create_items_descriptor, is_secure_redirect,
};
pub use config::{MailUser, Secret, ServerVersion, TransportConfig};
pub use disposition::{MessageDisposition, SendInvitationsMode};
pub use error::{Error, Result};
pub use folder::Folder;
pub use message::{EmailMessage, Importance};
pub use response::{ResponseCollection, ServiceResponse, ServiceResult};
pub use transport::TlsTransport;
pub use trust::{TrustDecision, TrustPolicy};
