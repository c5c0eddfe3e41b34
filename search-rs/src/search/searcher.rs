//! Backend search execution
//!
//! Runs assembled requests against the search backend and exposes the hits
//! as a lazy pull-based stream. Results are fetched page by page through a
//! scroll cursor; the cursor is released on every exit path, including the
//! consumer dropping the stream early.

use crate::error::{Result, SearchError};
use crate::mailbox::MailboxId;
use crate::search::backend::{ScrollHandle, SearchBackend};
use crate::search::request::SearchRequestBuilder;
use crate::search::types::{SearchHit, SearchQuery, SearchRequest};
use futures::stream::{self, Stream, TryStreamExt};
use std::sync::Arc;

/// Executes searches against the backend.
///
/// Each call opens its own cursor; concurrent searches do not contend.
/// A fresh call re-issues a fresh cursor, streams are not restartable.
#[derive(Clone)]
pub struct Searcher {
    backend: Arc<dyn SearchBackend>,
    request_builder: SearchRequestBuilder,
}

impl Searcher {
    pub fn new(backend: Arc<dyn SearchBackend>, request_builder: SearchRequestBuilder) -> Self {
        Self {
            backend,
            request_builder,
        }
    }

    pub fn request_builder(&self) -> &SearchRequestBuilder {
        &self.request_builder
    }

    /// Stream the hits matching `query` within the given mailboxes.
    ///
    /// Backend errors are terminal: the stream yields the error and ends,
    /// hits already yielded stay valid.
    pub fn search(
        &self,
        mailbox_ids: &[MailboxId],
        query: &SearchQuery,
        limit: Option<usize>,
        fields: &[&str],
    ) -> impl Stream<Item = Result<SearchHit>> + Send + 'static {
        self.scroll(self.request_builder.build(mailbox_ids, query, limit, fields, false))
    }

    /// Same as [`Searcher::search`], with highlighted fragments attached to
    /// every hit.
    pub fn search_highlighting(
        &self,
        mailbox_ids: &[MailboxId],
        query: &SearchQuery,
        limit: Option<usize>,
        fields: &[&str],
    ) -> impl Stream<Item = Result<SearchHit>> + Send + 'static {
        self.scroll(self.request_builder.build(mailbox_ids, query, limit, fields, true))
    }

    fn scroll(
        &self,
        request: SearchRequest,
    ) -> impl Stream<Item = Result<SearchHit>> + Send + 'static {
        let session = ScrollSession {
            backend: Arc::clone(&self.backend),
            remaining: request.size,
            request,
            handle: None,
        };
        stream::try_unfold(session, |mut session| async move {
            Ok::<_, SearchError>(session.next_batch().await?.map(|batch| (batch, session)))
        })
        .map_ok(|batch| stream::iter(batch.into_iter().map(Ok)))
        .try_flatten()
    }
}

/// One scroll traversal over the backend.
///
/// The cursor is acquired on the first pull and released exactly once: when
/// the backend reports exhaustion, when enough hits were delivered, when a
/// fetch fails, or when the session is dropped mid-traversal.
struct ScrollSession {
    backend: Arc<dyn SearchBackend>,
    request: SearchRequest,
    handle: Option<Box<dyn ScrollHandle>>,
    remaining: usize,
}

impl ScrollSession {
    async fn next_batch(&mut self) -> Result<Option<Vec<SearchHit>>> {
        if self.remaining == 0 {
            self.release().await?;
            return Ok(None);
        }
        if self.handle.is_none() {
            tracing::debug!(
                "opening scroll cursor (size {}, routed: {})",
                self.request.size,
                self.request.routing.is_some()
            );
            self.handle = Some(self.backend.open_scroll(&self.request).await?);
        }

        let mut page = Vec::new();
        if let Some(handle) = self.handle.as_mut() {
            page = match handle.next_page().await {
                Ok(page) => page,
                Err(e) => {
                    self.release_quietly().await;
                    return Err(e);
                }
            };
        }
        tracing::debug!("fetched scroll page of {} hits", page.len());

        if page.is_empty() {
            self.release().await?;
            return Ok(None);
        }
        page.truncate(self.remaining);
        self.remaining -= page.len();
        if self.remaining == 0 {
            self.release().await?;
        }
        Ok(Some(page.into_iter().map(SearchHit::new).collect()))
    }

    async fn release(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(mut handle) => handle.close().await,
            None => Ok(()),
        }
    }

    async fn release_quietly(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.close().await {
                tracing::warn!("failed to release scroll cursor: {}", e);
            }
        }
    }
}

impl Drop for ScrollSession {
    fn drop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        if let Err(e) = handle.close().await {
                            tracing::warn!("failed to release scroll cursor on drop: {}", e);
                        }
                    });
                }
                Err(_) => {
                    tracing::warn!("scroll cursor dropped outside a runtime, cannot release it")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfiguration;
    use crate::error::SearchError;
    use crate::search::backend::{
        IdRoutingKeyFactory, QueryConverter, SortConverter,
    };
    use crate::search::types::{fields, BackendHit, BackendQuery, BackendSort, SortSpec};
    use async_trait::async_trait;
    use futures::StreamExt;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubQueryConverter;

    impl QueryConverter for StubQueryConverter {
        fn convert(&self, _mailbox_ids: &[MailboxId], _query: &SearchQuery) -> BackendQuery {
            json!({ "match_all": {} })
        }
    }

    struct StubSortConverter;

    impl SortConverter for StubSortConverter {
        fn convert(&self, _sort: &SortSpec) -> BackendSort {
            json!({})
        }
    }

    #[derive(Default)]
    struct BackendProbe {
        opened: AtomicUsize,
        closed: AtomicUsize,
        last_size: AtomicUsize,
    }

    struct FakeBackend {
        pages: Vec<Vec<BackendHit>>,
        fail_on_page: Option<usize>,
        probe: Arc<BackendProbe>,
    }

    #[async_trait]
    impl SearchBackend for FakeBackend {
        async fn open_scroll(&self, request: &SearchRequest) -> Result<Box<dyn ScrollHandle>> {
            self.probe.opened.fetch_add(1, Ordering::SeqCst);
            self.probe.last_size.store(request.size, Ordering::SeqCst);
            Ok(Box::new(FakeScroll {
                pages: self.pages.clone().into(),
                fail_on_page: self.fail_on_page,
                served: 0,
                probe: Arc::clone(&self.probe),
            }))
        }
    }

    struct FakeScroll {
        pages: VecDeque<Vec<BackendHit>>,
        fail_on_page: Option<usize>,
        served: usize,
        probe: Arc<BackendProbe>,
    }

    #[async_trait]
    impl ScrollHandle for FakeScroll {
        async fn next_page(&mut self) -> Result<Vec<BackendHit>> {
            if self.fail_on_page == Some(self.served) {
                return Err(SearchError::Backend("page fetch failed".to_string()));
            }
            self.served += 1;
            Ok(self.pages.pop_front().unwrap_or_default())
        }

        async fn close(&mut self) -> Result<()> {
            self.probe.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn hit(id: &str) -> BackendHit {
        BackendHit {
            id: id.to_string(),
            fields: [(
                fields::MESSAGE_ID.to_string(),
                json!(uuid::Uuid::new_v4().to_string()),
            )]
            .into(),
            highlights: Default::default(),
        }
    }

    fn searcher(
        pages: Vec<Vec<BackendHit>>,
        fail_on_page: Option<usize>,
    ) -> (Searcher, Arc<BackendProbe>) {
        let probe = Arc::new(BackendProbe::default());
        let backend = FakeBackend {
            pages,
            fail_on_page,
            probe: Arc::clone(&probe),
        };
        let request_builder = SearchRequestBuilder::new(
            Arc::new(StubQueryConverter),
            Arc::new(StubSortConverter),
            Arc::new(IdRoutingKeyFactory),
            SearchConfiguration::default(),
        );
        (Searcher::new(Arc::new(backend), request_builder), probe)
    }

    #[tokio::test]
    async fn hits_should_be_streamed_across_pages_in_backend_order() {
        let (searcher, probe) = searcher(
            vec![
                vec![hit("a"), hit("b")],
                vec![hit("c"), hit("d")],
            ],
            None,
        );

        let hits: Vec<_> = searcher
            .search(&[MailboxId::random()], &SearchQuery::default(), None, &[])
            .map(|hit| hit.unwrap().backend_id().to_string())
            .collect()
            .await;

        assert_eq!(hits, vec!["a", "b", "c", "d"]);
        assert_eq!(probe.opened.load(Ordering::SeqCst), 1);
        assert_eq!(probe.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn limit_should_cap_the_stream_and_the_request_size() {
        let (searcher, probe) = searcher(
            vec![
                vec![hit("a"), hit("b")],
                vec![hit("c"), hit("d")],
            ],
            None,
        );

        let hits: Vec<_> = searcher
            .search(
                &[MailboxId::random()],
                &SearchQuery::default(),
                Some(3),
                &[],
            )
            .map(|hit| hit.unwrap().backend_id().to_string())
            .collect()
            .await;

        assert_eq!(hits, vec!["a", "b", "c"]);
        assert_eq!(probe.last_size.load(Ordering::SeqCst), 3);
        assert_eq!(probe.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn backend_error_should_be_terminal_but_keep_earlier_hits() {
        let (searcher, probe) = searcher(vec![vec![hit("a")]], Some(1));

        let results: Vec<_> = searcher
            .search(&[MailboxId::random()], &SearchQuery::default(), None, &[])
            .collect()
            .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(
            matches!(results[1], Err(SearchError::Backend(ref msg)) if msg.contains("page fetch"))
        );
        assert_eq!(probe.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cursor_should_be_released_when_the_consumer_stops_early() {
        let (searcher, probe) = searcher(
            vec![
                vec![hit("a")],
                vec![hit("b")],
                vec![hit("c")],
            ],
            None,
        );

        let mut stream = Box::pin(searcher.search(
            &[MailboxId::random()],
            &SearchQuery::default(),
            None,
            &[],
        ));
        let first = stream.next().await;
        assert!(first.is_some());
        drop(stream);

        // The release runs on a spawned task.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(probe.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_result_should_still_release_the_cursor() {
        let (searcher, probe) = searcher(vec![], None);

        let hits: Vec<_> = searcher
            .search(&[MailboxId::random()], &SearchQuery::default(), None, &[])
            .collect()
            .await;

        assert!(hits.is_empty());
        assert_eq!(probe.opened.load(Ordering::SeqCst), 1);
        assert_eq!(probe.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_limit_should_not_touch_the_backend() {
        let (searcher, probe) = searcher(vec![vec![hit("a")]], None);

        let hits: Vec<_> = searcher
            .search(
                &[MailboxId::random()],
                &SearchQuery::default(),
                Some(0),
                &[],
            )
            .collect()
            .await;

        assert!(hits.is_empty());
        assert_eq!(probe.opened.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn each_search_should_open_its_own_cursor() {
        let (searcher, probe) = searcher(vec![vec![hit("a")]], None);

        let _: Vec<_> = searcher
            .search(&[MailboxId::random()], &SearchQuery::default(), None, &[])
            .collect()
            .await;
        let _: Vec<_> = searcher
            .search(&[MailboxId::random()], &SearchQuery::default(), None, &[])
            .collect()
            .await;

        assert_eq!(probe.opened.load(Ordering::SeqCst), 2);
        assert_eq!(probe.closed.load(Ordering::SeqCst), 2);
    }
}
