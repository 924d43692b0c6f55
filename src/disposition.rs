//! Submission modes for created items
//!
//! Strongly-typed enums for the two mode switches of the create-items
//! operation instead of raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the server does with a created email message.
///
/// Required whenever the submitted items contain at least one
/// message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageDisposition {
    /// Store the message in the parent folder without sending.
    SaveOnly,
    /// Send the message without keeping a copy.
    SendOnly,
    /// Send the message and keep a copy in Sent Items.
    SendAndSaveCopy,
}

impl MessageDisposition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SaveOnly => "SaveOnly",
            Self::SendOnly => "SendOnly",
            Self::SendAndSaveCopy => "SendAndSaveCopy",
        }
    }

    /// Whether the server transmits the message.
    #[must_use]
    pub const fn sends(self) -> bool {
        !matches!(self, Self::SaveOnly)
    }
}

impl fmt::Display for MessageDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// If and how meeting invitations go out for created appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SendInvitationsMode {
    SendToNone,
    SendOnlyToAll,
    SendToAllAndSaveCopy,
}

impl SendInvitationsMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SendToNone => "SendToNone",
            Self::SendOnlyToAll => "SendOnlyToAll",
            Self::SendToAllAndSaveCopy => "SendToAllAndSaveCopy",
        }
    }
}

impl fmt::Display for SendInvitationsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
