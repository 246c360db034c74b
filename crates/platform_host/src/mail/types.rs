//! Mailbox records.

use serde::{Deserialize, Serialize};

/// Stable email identifier assigned by the mailbox service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailId(pub String);

impl std::fmt::Display for EmailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mailbox folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailFolder {
    /// Received mail.
    Inbox,
    /// Starred mail from any folder.
    Starred,
    /// Mail sent from this account.
    Sent,
    /// Deleted mail.
    Trash,
}

impl MailFolder {
    /// Folders in sidebar order.
    pub const ALL: [Self; 4] = [Self::Inbox, Self::Starred, Self::Sent, Self::Trash];

    /// Sidebar label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inbox => "Inbox",
            Self::Starred => "Starred",
            Self::Sent => "Sent",
            Self::Trash => "Trash",
        }
    }

    /// Path/query token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "inbox",
            Self::Starred => "starred",
            Self::Sent => "sent",
            Self::Trash => "trash",
        }
    }
}

/// One message in a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRecord {
    /// Stable id.
    pub id: EmailId,
    /// Display sender (or recipient, for sent mail).
    pub sender: String,
    /// Subject line.
    pub subject: String,
    /// One-line preview.
    #[serde(default)]
    pub snippet: String,
    /// Full body.
    #[serde(default)]
    pub body: String,
    /// Display date.
    #[serde(default)]
    pub date: String,
    /// Read flag.
    #[serde(default)]
    pub is_read: bool,
}

/// Message submitted from the compose form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub body: String,
}

impl OutgoingEmail {
    /// Returns the preview line shown in folder listings.
    pub fn snippet(&self) -> String {
        const MAX: usize = 60;
        let first_line = self.body.lines().next().unwrap_or_default().trim();
        if first_line.chars().count() <= MAX {
            first_line.to_string()
        } else {
            let cut: String = first_line.chars().take(MAX).collect();
            format!("{cut}...")
        }
    }
}
