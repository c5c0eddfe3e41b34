//! Search backend collaborator contracts
//!
//! The core never speaks the backend's query language itself; everything
//! backend-specific enters through these narrow traits.

use crate::error::Result;
use crate::mailbox::MailboxId;
use crate::search::types::{
    BackendHit, BackendQuery, BackendSort, MailboxSession, MultiMailboxSearchQuery, RoutingKey,
    SearchQuery, SearchRequest, SortSpec,
};
use async_trait::async_trait;

/// Translates the structured query model into the backend's native query AST.
pub trait QueryConverter: Send + Sync {
    fn convert(&self, mailbox_ids: &[MailboxId], query: &SearchQuery) -> BackendQuery;
}

/// Translates one sort specification into the backend's native sort AST.
pub trait SortConverter: Send + Sync {
    fn convert(&self, sort: &SortSpec) -> BackendSort;
}

/// Derives the shard routing key for a mailbox.
///
/// Must be deterministic: the same mailbox id always yields the same key.
pub trait RoutingKeyFactory: Send + Sync {
    fn key_of(&self, mailbox_id: &MailboxId) -> RoutingKey;
}

/// Routing by serialized mailbox id, the default document routing scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdRoutingKeyFactory;

impl RoutingKeyFactory for IdRoutingKeyFactory {
    fn key_of(&self, mailbox_id: &MailboxId) -> RoutingKey {
        RoutingKey::of(mailbox_id.serialize())
    }
}

/// Executes assembled requests against the remote search service.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Open a scroll cursor for the request.
    ///
    /// The caller owns the returned handle and must close it on every exit
    /// path.
    async fn open_scroll(&self, request: &SearchRequest) -> Result<Box<dyn ScrollHandle>>;
}

/// An open backend cursor.
#[async_trait]
pub trait ScrollHandle: Send {
    /// Fetch the next page of hits; an empty page signals exhaustion.
    async fn next_page(&mut self) -> Result<Vec<BackendHit>>;

    /// Release the backend-side scroll context.
    async fn close(&mut self) -> Result<()>;
}

/// Resolves the concrete mailbox-id scope of a cross-mailbox query.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailboxScopeResolver: Send + Sync {
    async fn resolve_in_mailboxes(
        &self,
        query: &MultiMailboxSearchQuery,
        session: &MailboxSession,
    ) -> Result<Vec<MailboxId>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_routing_should_be_deterministic() {
        let factory = IdRoutingKeyFactory;
        let id = MailboxId::random();

        assert_eq!(factory.key_of(&id), factory.key_of(&id));
        assert_eq!(factory.key_of(&id).as_str(), id.serialize());
    }
}
