//! Backend request assembly

use crate::config::SearchConfiguration;
use crate::mailbox::MailboxId;
use crate::search::backend::{QueryConverter, RoutingKeyFactory, SortConverter};
use crate::search::types::{fields, HighlightRequest, RoutingKey, SearchQuery, SearchRequest};
use std::sync::Arc;

/// Mailbox sets of this size or larger fall back to global routing instead
/// of an unbounded routing-key list.
pub const ROUTING_KEY_LIMIT: usize = 5;

/// Assembles [`SearchRequest`]s from the domain query model.
///
/// Query and sort translation is delegated to the injected converters; this
/// builder only owns sizing, routing and the fixed request plumbing (scroll
/// keep-alive, highlight block).
#[derive(Clone)]
pub struct SearchRequestBuilder {
    query_converter: Arc<dyn QueryConverter>,
    sort_converter: Arc<dyn SortConverter>,
    routing_key_factory: Arc<dyn RoutingKeyFactory>,
    config: SearchConfiguration,
}

impl SearchRequestBuilder {
    pub fn new(
        query_converter: Arc<dyn QueryConverter>,
        sort_converter: Arc<dyn SortConverter>,
        routing_key_factory: Arc<dyn RoutingKeyFactory>,
        config: SearchConfiguration,
    ) -> Self {
        Self {
            query_converter,
            sort_converter,
            routing_key_factory,
            config,
        }
    }

    pub fn build(
        &self,
        mailbox_ids: &[MailboxId],
        query: &SearchQuery,
        limit: Option<usize>,
        fields: &[&str],
        highlight: bool,
    ) -> SearchRequest {
        SearchRequest {
            query: self.query_converter.convert(mailbox_ids, query),
            size: self.effective_size(limit),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            sorts: query
                .sorts
                .iter()
                .map(|sort| self.sort_converter.convert(sort))
                .collect(),
            routing: self.routing(mailbox_ids),
            scroll_keep_alive: self.config.scroll_keep_alive(),
            highlight: highlight.then(|| self.highlight_request()),
        }
    }

    pub fn max_search_size(&self) -> usize {
        self.config.max_search_size
    }

    fn effective_size(&self, limit: Option<usize>) -> usize {
        let max = self.config.max_search_size;
        limit.map_or(max, |limit| limit.min(max))
    }

    fn routing(&self, mailbox_ids: &[MailboxId]) -> Option<Vec<RoutingKey>> {
        if mailbox_ids.len() >= ROUTING_KEY_LIMIT {
            return None;
        }
        Some(
            mailbox_ids
                .iter()
                .map(|id| self.routing_key_factory.key_of(id))
                .collect(),
        )
    }

    fn highlight_request(&self) -> HighlightRequest {
        let highlight = &self.config.highlight;
        HighlightRequest {
            pre_tag: highlight.pre_tag.clone(),
            post_tag: highlight.post_tag.clone(),
            fragment_size: highlight.fragment_size,
            number_of_fragments: highlight.number_of_fragments,
            fields: vec![
                fields::SUBJECT.to_string(),
                fields::TEXT_BODY.to_string(),
                fields::HTML_BODY.to_string(),
                fields::ATTACHMENT_TEXT_CONTENT.to_string(),
            ],
            highlighter_type: "plain".to_string(),
            encoder: "html".to_string(),
        }
    }
}
