//! Deleted-message retention entities

use crate::mailbox::MailboxId;
use crate::search::types::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message held in the deleted-message vault.
///
/// Snapshot of the structural fields taken at deletion time; the payload
/// itself lives in blob storage and is out of scope here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedMessage {
    pub message_id: MessageId,
    /// Mailboxes the message was deleted from.
    pub origin_mailboxes: Vec<MailboxId>,
    pub owner: String,
    pub delivery_date: DateTime<Utc>,
    pub deletion_date: DateTime<Utc>,
    /// Envelope sender; absent for null-sender bounces.
    pub sender: Option<String>,
    pub recipients: Vec<String>,
    pub has_attachment: bool,
    pub subject: Option<String>,
}
