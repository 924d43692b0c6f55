//! TLS trust decisions for outbound connections

mod chain;
mod policy;
mod verifier;

pub use chain::{CertificateChain, CertificateIdentity, ChainStatus, ChainStatusEntry, PolicyErrors};
pub use policy::{TrustDecision, TrustPolicy};
pub use verifier::PolicyVerifier;
