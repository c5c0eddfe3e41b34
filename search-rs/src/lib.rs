//! search-rs: Query and search core for a mail-store platform
//!
//! Turns user-level requests — "find mailboxes matching a pattern", "find
//! messages matching criteria", "find deleted messages matching criteria" —
//! into pure in-process matching decisions or requests against a remote
//! full-text search backend.
//!
//! # Features
//!
//! - **Mailbox name patterns**: the `*`/`%` wildcard algebra with exact,
//!   prefix and compiled-pattern matchers
//! - **Scoped mailbox queries**: namespace/owner scoping combined with a
//!   name expression
//! - **Backend search**: request assembly (routing keys, size capping,
//!   scroll keep-alive), lazy hit streams over a scroll cursor, highlighted
//!   snippet extraction with HTML-safe re-encoding
//! - **Vault criteria**: typed field predicates AND-combined into queries
//!   over the deleted-message retention store
//!
//! The backend itself stays behind narrow traits: query/sort translation,
//! routing key derivation, scroll execution and mailbox-scope resolution are
//! injected collaborators.
//!
//! # Example
//!
//! ```
//! use search_rs::mailbox::{MailboxPath, MailboxQuery, NameExpression};
//!
//! let query = MailboxQuery::builder()
//!     .namespace("#private")
//!     .user("alice")
//!     .expression(NameExpression::prefixed_wildcard("Archive"))
//!     .build()
//!     .unwrap();
//!
//! assert!(query.matches(&MailboxPath::private("alice", "Archive/2024")));
//! ```
//!
//! # Modules
//!
//! - [`mailbox`]: name pattern algebra and scoped queries
//! - [`search`]: backend request building, execution and highlighting
//! - [`vault`]: criterion engine for the deleted-message vault
//! - [`config`]: search tunables
//! - [`error`]: error types and handling

pub mod config;
pub mod error;
pub mod mailbox;
pub mod search;
pub mod vault;

// Re-export commonly used types
pub use config::SearchConfiguration;
pub use error::{Result, SearchError};
