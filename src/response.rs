//! Per-item results of a batch submission
//!
//! A mix of successes and failures is a normal outcome, not an error.
//! Callers inspect [`ResponseCollection::overall_result`] and then the
//! individual responses.

use serde::{Deserialize, Serialize};

/// Outcome of one submitted item, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ServiceResult {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    pub result: ServiceResult,
    /// Server error code, `NoError` on success.
    pub error_code: String,
    pub error_message: String,
}

impl ServiceResponse {
    #[must_use]
    pub fn success() -> Self {
        Self {
            result: ServiceResult::Success,
            error_code: "NoError".to_string(),
            error_message: String::new(),
        }
    }

    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            result: ServiceResult::Error,
            error_code: code.into(),
            error_message: message.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == ServiceResult::Success
    }
}

/// One response per submitted item, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseCollection {
    responses: Vec<ServiceResponse>,
}

impl ResponseCollection {
    #[must_use]
    pub const fn new(responses: Vec<ServiceResponse>) -> Self {
        Self { responses }
    }

    /// The most severe result across all items. Empty collections
    /// count as success.
    #[must_use]
    pub fn overall_result(&self) -> ServiceResult {
        self.responses
            .iter()
            .map(|r| r.result)
            .max()
            .unwrap_or(ServiceResult::Success)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ServiceResponse> {
        self.responses.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceResponse> {
        self.responses.iter()
    }

    /// Responses that did not succeed, with their submission index.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ServiceResponse)> {
        self.responses
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_success())
    }
}

impl<'a> IntoIterator for &'a ResponseCollection {
    type Item = &'a ServiceResponse;
    type IntoIter = std::slice::Iter<'a, ServiceResponse>;

    fn into_iter(self) -> Self::IntoIter {
        self.responses.iter()
    }
}

impl FromIterator<ServiceResponse> for ResponseCollection {
    fn from_iter<I: IntoIterator<Item = ServiceResponse>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
