//! rustls glue for [`TrustPolicy`]
//!
//! Runs the standard webpki verification first, translates its verdict
//! into [`PolicyErrors`] and a [`CertificateChain`], and lets the policy
//! have the final word.

use super::chain::{CertificateChain, CertificateIdentity, ChainStatus, PolicyErrors};
use super::policy::TrustPolicy;
use rustls::client::WebPkiServerVerifier;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{CertificateError, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::sync::Arc;
use tracing::{debug, warn};

/// Certificate verifier that applies a [`TrustPolicy`] on top of
/// webpki chain validation.
#[derive(Debug)]
pub struct PolicyVerifier {
    policy: TrustPolicy,
    inner: Arc<WebPkiServerVerifier>,
}

impl PolicyVerifier {
    /// Build a verifier over the given trust anchors.
    ///
    /// # Errors
    ///
    /// Returns `rustls::Error` if the root store is empty or the
    /// provider cannot back a webpki verifier.
    pub fn new(
        policy: TrustPolicy,
        roots: Arc<RootCertStore>,
        provider: Arc<CryptoProvider>,
    ) -> Result<Self, rustls::Error> {
        let inner = WebPkiServerVerifier::builder_with_provider(roots, provider)
            .build()
            .map_err(|e| {
                rustls::Error::General(format!("Cannot build verifier: {e}"))
            })?;
        Ok(Self { policy, inner })
    }
}

/// Translate the webpki verdict into the policy's inputs.
fn assess(
    outcome: &Result<ServerCertVerified, rustls::Error>,
    end_entity: &CertificateDer<'_>,
    intermediates: &[CertificateDer<'_>],
    server_name: &ServerName<'_>,
) -> (PolicyErrors, CertificateChain) {
    let identity = |der: &CertificateDer<'_>| {
        CertificateIdentity::from_der(der).unwrap_or_else(|| CertificateIdentity::new("", "?"))
    };

    let Err(err) = outcome else {
        let chain = std::iter::once(end_entity)
            .chain(intermediates)
            .fold(CertificateChain::default(), |chain, der| {
                chain.with_entry(identity(der), ChainStatus::NoError)
            });
        return (PolicyErrors::NONE, chain);
    };

    let status = match err {
        rustls::Error::InvalidCertificate(
            CertificateError::NotValidForName | CertificateError::NotValidForNameContext { .. },
        ) => {
            return (PolicyErrors::NAME_MISMATCH, CertificateChain::default());
        }
        rustls::Error::NoCertificatesPresented => {
            return (
                PolicyErrors::CERTIFICATE_NOT_AVAILABLE,
                CertificateChain::default(),
            );
        }
        rustls::Error::InvalidCertificate(e) => chain_status(e),
        _ => ChainStatus::Other,
    };

    let mut errors = PolicyErrors::CHAIN_ERRORS;

    // webpki stops at the first chain problem without looking at the
    // name, so check it separately.
    if !name_matches(end_entity, server_name) {
        errors |= PolicyErrors::NAME_MISMATCH;
    }

    let mut chain = CertificateChain::default();
    let last = intermediates.len();
    for (i, der) in std::iter::once(end_entity).chain(intermediates).enumerate() {
        // Issuer problems belong to the top of the presented chain,
        // everything else to the leaf.
        let blamed = if status == ChainStatus::UntrustedRoot {
            i == last
        } else {
            i == 0
        };
        let s = if blamed { status } else { ChainStatus::NoError };
        chain = chain.with_entry(identity(der), s);
    }

    (errors, chain)
}

fn name_matches(end_entity: &CertificateDer<'_>, server_name: &ServerName<'_>) -> bool {
    rustls::server::ParsedCertificate::try_from(end_entity)
        .and_then(|cert| rustls::client::verify_server_name(&cert, server_name))
        .is_ok()
}

const fn chain_status(err: &CertificateError) -> ChainStatus {
    match err {
        CertificateError::UnknownIssuer => ChainStatus::UntrustedRoot,
        CertificateError::Expired
        | CertificateError::ExpiredContext { .. }
        | CertificateError::NotValidYet
        | CertificateError::NotValidYetContext { .. } => ChainStatus::NotTimeValid,
        CertificateError::Revoked => ChainStatus::Revoked,
        CertificateError::BadSignature => ChainStatus::NotSignatureValid,
        CertificateError::InvalidPurpose | CertificateError::InvalidPurposeContext { .. } => {
            ChainStatus::NotValidForUsage
        }
        CertificateError::UnhandledCriticalExtension => ChainStatus::UnsupportedCriticalExtension,
        _ => ChainStatus::Other,
    }
}

impl ServerCertVerifier for PolicyVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        let outcome =
            self.inner
                .verify_server_cert(end_entity, intermediates, server_name, ocsp_response, now);

        let Some(leaf) = CertificateIdentity::from_der(end_entity) else {
            warn!("Server certificate for {:?} could not be parsed", server_name);
            return Err(outcome.err().unwrap_or(rustls::Error::InvalidCertificate(
                CertificateError::BadEncoding,
            )));
        };

        let (errors, chain) = assess(&outcome, end_entity, intermediates, server_name);

        if self.policy.evaluate(errors, Some(&chain), &leaf).is_accept() {
            if !errors.is_empty() {
                debug!("Accepting self-signed certificate {}", leaf.subject);
            }
            return Ok(ServerCertVerified::assertion());
        }

        warn!(
            "Rejecting certificate {} for {:?}: {:?}",
            leaf.subject, server_name, errors
        );
        Err(outcome.err().unwrap_or(rustls::Error::InvalidCertificate(
            CertificateError::ApplicationVerificationFailure,
        )))
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls12_signature(message, cert, dss)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        self.inner.verify_tls13_signature(message, cert, dss)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.inner.supported_verify_schemes()
    }
}
