//! Certificate acceptance rule
//!
//! Accepts cleanly validated chains, and additionally tolerates a
//! self-signed server certificate when the only problem with the
//! chain is that its root is not trusted. Anything else is rejected.

use super::chain::{CertificateChain, CertificateIdentity, ChainStatus, PolicyErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustDecision {
    Accept,
    Reject,
}

impl TrustDecision {
    #[must_use]
    pub const fn is_accept(self) -> bool {
        matches!(self, Self::Accept)
    }
}

impl From<bool> for TrustDecision {
    fn from(accept: bool) -> Self {
        if accept { Self::Accept } else { Self::Reject }
    }
}

impl From<TrustDecision> for bool {
    fn from(decision: TrustDecision) -> Self {
        decision.is_accept()
    }
}

/// The trust predicate consulted on every handshake of a
/// [`TlsTransport`](crate::TlsTransport).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrustPolicy;

impl TrustPolicy {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decide whether to accept a server certificate.
    ///
    /// A missing `chain` is accepted once chain errors are the only
    /// reported category. This is looser than a strict posture and is
    /// kept for compatibility with existing deployments.
    #[must_use]
    pub fn evaluate(
        &self,
        errors: PolicyErrors,
        chain: Option<&CertificateChain>,
        leaf: &CertificateIdentity,
    ) -> TrustDecision {
        if errors.is_empty() {
            return TrustDecision::Accept;
        }

        if !errors.is_subset_of(PolicyErrors::CHAIN_ERRORS) {
            return TrustDecision::Reject;
        }

        let Some(chain) = chain else {
            return TrustDecision::Accept;
        };

        let self_signed = leaf.is_self_signed();
        chain
            .entries()
            .iter()
            .all(|entry| match entry.status {
                ChainStatus::NoError => true,
                ChainStatus::UntrustedRoot => self_signed,
                _ => false,
            })
            .into()
    }
}
