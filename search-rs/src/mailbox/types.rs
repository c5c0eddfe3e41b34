//! Mailbox identity types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace holding a user's own mailboxes.
pub const USER_NAMESPACE: &str = "#private";

/// Default hierarchy delimiter between a mailbox and its children.
pub const DEFAULT_DELIMITER: char = '.';

/// Opaque mailbox identifier, stable across renames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MailboxId(Uuid);

impl MailboxId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn of(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Canonical string form, as stored in backend documents.
    pub fn serialize(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for MailboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MailboxId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Fully qualified mailbox location: namespace, owning user, hierarchical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MailboxPath {
    pub namespace: String,
    pub user: String,
    pub name: String,
}

impl MailboxPath {
    pub fn new(
        namespace: impl Into<String>,
        user: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            user: user.into(),
            name: name.into(),
        }
    }

    /// A path in the user's own namespace.
    pub fn private(user: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(USER_NAMESPACE, user, name)
    }
}

impl fmt::Display for MailboxPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.user, self.name)
    }
}
