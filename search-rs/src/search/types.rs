//! Search types and data structures

use crate::error::{Result, SearchError};
use crate::mailbox::MailboxId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Opaque message identifier, stable across mailbox moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
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

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A single message-matching condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchCriterion {
    /// Matches every message.
    All,
    /// Messages with the string in the subject.
    Subject(String),
    /// Messages with the string in the body.
    Body(String),
    /// Messages with the string anywhere (headers or body).
    Text(String),
    /// Messages from the given sender.
    From(String),
    /// Messages addressed to the given recipient.
    To(String),
    /// Messages sent strictly before the given instant.
    SentBefore(DateTime<Utc>),
    /// Messages sent strictly after the given instant.
    SentAfter(DateTime<Utc>),
    /// Messages carrying at least one attachment.
    HasAttachment,
}

/// What to sort hits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Arrival,
    SentDate,
    Subject,
    Size,
    Uid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Natural,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}

/// Structured, protocol-agnostic search query.
///
/// Translation into the backend's native query language is the job of an
/// injected [`QueryConverter`](crate::search::backend::QueryConverter).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SearchQuery {
    pub criteria: Vec<SearchCriterion>,
    #[serde(default)]
    pub sorts: Vec<SortSpec>,
}

impl SearchQuery {
    pub fn of(criteria: Vec<SearchCriterion>) -> Self {
        Self {
            criteria,
            sorts: Vec::new(),
        }
    }

    pub fn sorted_by(mut self, sorts: Vec<SortSpec>) -> Self {
        self.sorts = sorts;
        self
    }
}

/// A search query scoped to a set of mailboxes.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMailboxSearchQuery {
    pub query: SearchQuery,
    pub in_mailboxes: Vec<MailboxId>,
}

/// The requesting user, as seen by this core.
///
/// Authentication happens elsewhere; collaborators only need to know on
/// whose behalf mailbox scopes are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxSession {
    pub user: String,
}

impl MailboxSession {
    pub fn of(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

/// Stored-field names of the backend index mapping.
pub mod fields {
    pub const MESSAGE_ID: &str = "messageId";
    pub const SUBJECT: &str = "subject";
    pub const TEXT_BODY: &str = "textBody";
    pub const HTML_BODY: &str = "htmlBody";
    pub const ATTACHMENT_TEXT_CONTENT: &str = "attachments.textContent";
}

/// Shard-targeting hint derived from a mailbox identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutingKey(String);

impl RoutingKey {
    pub fn of(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Backend-native query AST, produced by the injected converters.
pub type BackendQuery = serde_json::Value;

/// Backend-native sort AST.
pub type BackendSort = serde_json::Value;

/// Snippet highlighting block attached to a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightRequest {
    pub pre_tag: String,
    pub post_tag: String,
    pub fragment_size: usize,
    pub number_of_fragments: usize,
    /// Fields the backend should produce highlighted fragments for.
    pub fields: Vec<String>,
    /// Highlighter implementation the backend should use.
    pub highlighter_type: String,
    /// Fragment encoder; `html` keeps the markers safe inside HTML output.
    pub encoder: String,
}

/// A fully assembled backend search request.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: BackendQuery,
    /// Number of hits the caller will consume at most.
    pub size: usize,
    /// Stored fields to return with each hit.
    pub fields: Vec<String>,
    pub sorts: Vec<BackendSort>,
    /// Shard routing; `None` targets every shard.
    pub routing: Option<Vec<RoutingKey>>,
    /// How long the backend keeps the scroll cursor alive between fetches.
    pub scroll_keep_alive: Duration,
    pub highlight: Option<HighlightRequest>,
}

/// One raw hit as returned by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendHit {
    /// Backend document identifier.
    pub id: String,
    /// Stored field values.
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
    /// Highlighted fragments per field, present when highlighting was
    /// requested and the field matched.
    #[serde(default)]
    pub highlights: HashMap<String, Vec<String>>,
}

/// A hit as published to consumers of the searcher.
#[derive(Debug, Clone)]
pub struct SearchHit {
    hit: BackendHit,
}

impl SearchHit {
    pub fn new(hit: BackendHit) -> Self {
        Self { hit }
    }

    pub fn backend_id(&self) -> &str {
        &self.hit.id
    }

    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.hit.fields.get(name)
    }

    pub fn highlights(&self, name: &str) -> Option<&[String]> {
        self.hit.highlights.get(name).map(Vec::as_slice)
    }

    /// The message id stored with the hit.
    ///
    /// A missing or unparsable value signals an index inconsistency and is
    /// surfaced as an error naming the offending backend document.
    pub fn message_id(&self) -> Result<MessageId> {
        let value = self
            .field(fields::MESSAGE_ID)
            .and_then(|v| v.as_str())
            .ok_or_else(|| SearchError::MissingMessageId {
                hit_id: self.hit.id.clone(),
            })?;
        value
            .parse()
            .map_err(|_| SearchError::InvalidMessageId {
                hit_id: self.hit.id.clone(),
                value: value.to_string(),
            })
    }
}

/// Highlighted excerpt of a single matched message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSnippet {
    pub message_id: MessageId,
    /// Highlighted subject, when the subject matched.
    pub subject: Option<String>,
    /// Highlighted body excerpt, when any body field matched.
    pub body: Option<String>,
}
