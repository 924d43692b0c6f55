//! Outgoing message model
//!
//! Only the fields the create-items operation needs to submit a
//! message. The server-side object model stays with the vendor library.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Importance {
    Low,
    #[default]
    Normal,
    High,
}

/// An email message to be created on the server.
///
/// # Examples
///
/// ```
/// use groupware_mail::{EmailMessage, Importance};
///
/// let msg = EmailMessage::new("Status", "All green.")
///     .importance(Importance::High)
///     .to("ops@example.com");
/// assert_eq!(msg.to_recipients, vec!["ops@example.com"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub importance: Importance,
    pub to_recipients: Vec<String>,
    pub cc_recipients: Vec<String>,
}

impl EmailMessage {
    #[must_use]
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to_recipients.push(address.into());
        self
    }

    #[must_use]
    pub fn cc(mut self, address: impl Into<String>) -> Self {
        self.cc_recipients.push(address.into());
        self
    }

    /// A message with no recipients can be saved but not sent.
    #[must_use]
    pub fn has_recipients(&self) -> bool {
        !self.to_recipients.is_empty() || !self.cc_recipients.is_empty()
    }
}
