//! What a handshake reports about the presented certificate chain

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Categories of problems found while validating the server certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PolicyErrors(u8);

impl PolicyErrors {
    pub const NONE: Self = Self(0);
    /// The server did not present a certificate.
    pub const CERTIFICATE_NOT_AVAILABLE: Self = Self(0b001);
    /// The certificate is not valid for the requested server name.
    pub const NAME_MISMATCH: Self = Self(0b010);
    /// The chain failed to validate; details live in the chain status.
    pub const CHAIN_ERRORS: Self = Self(0b100);

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether every reported category is contained in `other`.
    #[must_use]
    pub const fn is_subset_of(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }
}

impl BitOr for PolicyErrors {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for PolicyErrors {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Status of one certificate in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainStatus {
    NoError,
    /// The chain terminates in a root that is not trusted.
    UntrustedRoot,
    /// No path to any root could be built.
    PartialChain,
    NotTimeValid,
    Revoked,
    NotSignatureValid,
    NotValidForUsage,
    UnsupportedCriticalExtension,
    Other,
}

impl fmt::Display for ChainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoError => "no error",
            Self::UntrustedRoot => "untrusted root",
            Self::PartialChain => "partial chain",
            Self::NotTimeValid => "not time valid",
            Self::Revoked => "revoked",
            Self::NotSignatureValid => "invalid signature",
            Self::NotValidForUsage => "not valid for usage",
            Self::UnsupportedCriticalExtension => "unsupported critical extension",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// Subject and issuer distinguished names of a certificate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CertificateIdentity {
    pub subject: String,
    pub issuer: String,
}

impl CertificateIdentity {
    #[must_use]
    pub fn new(subject: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            issuer: issuer.into(),
        }
    }

    /// Parse the names out of a DER-encoded X.509 certificate.
    #[must_use]
    pub fn from_der(der: &[u8]) -> Option<Self> {
        let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;
        Some(Self {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
        })
    }

    #[must_use]
    pub fn is_self_signed(&self) -> bool {
        self.subject == self.issuer
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStatusEntry {
    pub certificate: CertificateIdentity,
    pub status: ChainStatus,
}

/// Status entries reported for a chain, leaf first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateChain {
    entries: Vec<ChainStatusEntry>,
}

impl CertificateChain {
    #[must_use]
    pub const fn new(entries: Vec<ChainStatusEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn with_entry(mut self, certificate: CertificateIdentity, status: ChainStatus) -> Self {
        self.entries.push(ChainStatusEntry {
            certificate,
            status,
        });
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[ChainStatusEntry] {
        &self.entries
    }
}
