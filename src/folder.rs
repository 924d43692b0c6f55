//! Target folder types
//!
//! Provides a strongly-typed enum for the folder a created item lands
//! in. Well-known folders map to the server's distinguished folder
//! names. Folders addressed by server-assigned id use the `Id`
//! variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A mailbox folder used as the parent of created items.
///
/// # Examples
///
/// ```
/// use groupware_mail::Folder;
///
/// assert_eq!(Folder::Drafts.as_str(), "drafts");
///
/// let by_id = Folder::id("AAMkADk=");
/// assert_eq!(by_id.as_str(), "AAMkADk=");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Folder {
    Inbox,
    Drafts,
    SentItems,
    DeletedItems,
    Outbox,
    JunkEmail,
    Calendar,
    Contacts,
    /// A folder addressed by its server-assigned id.
    Id(String),
}

impl Folder {
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// The distinguished folder name, or the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inbox => "inbox",
            Self::Drafts => "drafts",
            Self::SentItems => "sentitems",
            Self::DeletedItems => "deleteditems",
            Self::Outbox => "outbox",
            Self::JunkEmail => "junkemail",
            Self::Calendar => "calendar",
            Self::Contacts => "contacts",
            Self::Id(id) => id,
        }
    }

    #[must_use]
    pub const fn is_well_known(&self) -> bool {
        !matches!(self, Self::Id(_))
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Folder {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "inbox" => Self::Inbox,
            "drafts" => Self::Drafts,
            "sentitems" => Self::SentItems,
            "deleteditems" => Self::DeletedItems,
            "outbox" => Self::Outbox,
            "junkemail" => Self::JunkEmail,
            "calendar" => Self::Calendar,
            "contacts" => Self::Contacts,
            _ => Self::Id(s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinguished_names() {
        assert_eq!(Folder::Drafts.as_str(), "drafts");
        assert_eq!(Folder::SentItems.as_str(), "sentitems");
    }

    #[test]
    fn from_str_case_insensitive() {
        assert_eq!(Folder::from("Drafts"), Folder::Drafts);
        assert_eq!(Folder::from("SENTITEMS"), Folder::SentItems);
    }

    #[test]
    fn unknown_becomes_id() {
        let f = Folder::from("AAMkAGI2");
        assert_eq!(f, Folder::Id("AAMkAGI2".to_string()));
        assert!(!f.is_well_known());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Folder::Outbox), "outbox");
        assert_eq!(format!("{}", Folder::id("xyz")), "xyz");
    }
}
