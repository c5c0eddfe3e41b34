//! Search result highlighting
//!
//! Re-runs a search with highlighting enabled and turns the returned
//! fragments into transport-safe snippets. Fragment text is HTML-escaped
//! while the backend-inserted highlight markers are preserved verbatim.

use crate::config::HighlightConfiguration;
use crate::error::{Result, SearchError};
use crate::search::backend::MailboxScopeResolver;
use crate::search::searcher::Searcher;
use crate::search::types::{
    fields, MailboxSession, MessageId, MultiMailboxSearchQuery, SearchHit, SearchSnippet,
};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::sync::Arc;
use uuid::Uuid;

/// Stored fields requested for highlight searches.
const HIGHLIGHT_FIELDS: [&str; 4] = [
    fields::MESSAGE_ID,
    fields::SUBJECT,
    fields::TEXT_BODY,
    fields::ATTACHMENT_TEXT_CONTENT,
];

/// Body resolution order: first present wins.
const BODY_FIELDS: [&str; 3] = [
    fields::TEXT_BODY,
    fields::HTML_BODY,
    fields::ATTACHMENT_TEXT_CONTENT,
];

/// Produces highlighted snippets for a set of already-identified messages.
#[derive(Clone)]
pub struct Highlighter {
    searcher: Searcher,
    scope_resolver: Arc<dyn MailboxScopeResolver>,
    markers: SafeMarkers,
}

impl Highlighter {
    pub fn new(
        searcher: Searcher,
        scope_resolver: Arc<dyn MailboxScopeResolver>,
        highlight: &HighlightConfiguration,
    ) -> Self {
        Self {
            searcher,
            scope_resolver,
            markers: SafeMarkers::new(&highlight.pre_tag, &highlight.post_tag),
        }
    }

    /// Stream one snippet per message the highlight search matches.
    ///
    /// With no message ids or no criteria there is nothing to highlight and
    /// the backend is not contacted at all. A hit whose message id cannot be
    /// resolved surfaces as an error: its absence signals an index
    /// inconsistency, not an empty result.
    pub fn highlight(
        &self,
        message_ids: Vec<MessageId>,
        query: MultiMailboxSearchQuery,
        session: MailboxSession,
    ) -> BoxStream<'static, Result<SearchSnippet>> {
        if message_ids.is_empty() || query.query.criteria.is_empty() {
            return stream::empty().boxed();
        }
        let searcher = self.searcher.clone();
        let scope_resolver = Arc::clone(&self.scope_resolver);
        let markers = self.markers.clone();
        stream::once(async move {
            let mailbox_ids = scope_resolver.resolve_in_mailboxes(&query, &session).await?;
            tracing::debug!(
                "highlighting {} messages across {} mailboxes",
                message_ids.len(),
                mailbox_ids.len()
            );
            Ok::<_, SearchError>(
                searcher
                    .search_highlighting(
                        &mailbox_ids,
                        &query.query,
                        Some(message_ids.len()),
                        &HIGHLIGHT_FIELDS,
                    )
                    .map(move |hit| hit.and_then(|hit| build_snippet(&markers, &hit))),
            )
        })
        .try_flatten()
        .boxed()
    }
}

fn build_snippet(markers: &SafeMarkers, hit: &SearchHit) -> Result<SearchSnippet> {
    let message_id = hit.message_id()?;
    let subject = first_fragment(hit, fields::SUBJECT).map(|raw| markers.escape(raw));
    let body = BODY_FIELDS
        .iter()
        .find_map(|field| first_fragment(hit, field))
        .map(|raw| markers.escape(raw));
    Ok(SearchSnippet {
        message_id,
        subject,
        body,
    })
}

fn first_fragment<'a>(hit: &'a SearchHit, field: &str) -> Option<&'a str> {
    hit.highlights(field)
        .and_then(|fragments| fragments.first())
        .map(String::as_str)
}

/// HTML escaping that leaves the highlight marker strings untouched.
///
/// Markers are swapped for placeholder tokens, the text is escaped, then
/// the markers are restored. The tokens derive from a random identifier
/// drawn once per highlighter. The substitutions must bracket the escaping:
/// escaping first corrupts the markers, restoring first lets document text
/// spelled like a marker bypass escaping.
#[derive(Clone)]
struct SafeMarkers {
    open: String,
    close: String,
    open_token: String,
    close_token: String,
}

impl SafeMarkers {
    fn new(open: &str, close: &str) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        Self {
            open: open.to_string(),
            close: close.to_string(),
            open_token: format!("{id}-open"),
            close_token: format!("{id}-close"),
        }
    }

    fn escape(&self, raw: &str) -> String {
        raw.replace(&self.open, &self.open_token)
            .replace(&self.close, &self.close_token)
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace(&self.open_token, &self.open)
            .replace(&self.close_token, &self.close)
    }
}
