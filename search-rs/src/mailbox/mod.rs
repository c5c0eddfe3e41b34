//! Mailbox naming and selection
//!
//! Pattern matching over mailbox names and scoped queries over mailbox
//! paths. Everything here is pure and freely shareable between threads.

pub mod expression;
pub mod query;
pub mod types;

pub use expression::{NameExpression, PrefixedRegex, FREE_WILDCARD, LOCAL_WILDCARD};
pub use query::{MailboxQuery, MailboxQueryBuilder};
pub use types::{MailboxId, MailboxPath, DEFAULT_DELIMITER, USER_NAMESPACE};
