//! Scoped mailbox queries
//!
//! Combines an optional namespace, an optional owning user and a name
//! expression into a single matcher over mailbox paths.

use crate::error::{Result, SearchError};
use crate::mailbox::expression::NameExpression;
use crate::mailbox::types::MailboxPath;

/// A query over mailbox paths.
///
/// A path matches when every scope field that is present is equal and the
/// name expression matches the path name. Absent fields constrain nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxQuery {
    namespace: Option<String>,
    user: Option<String>,
    expression: NameExpression,
}

impl MailboxQuery {
    pub fn builder() -> MailboxQueryBuilder {
        MailboxQueryBuilder::default()
    }

    pub fn matches(&self, path: &MailboxPath) -> bool {
        self.namespace
            .as_deref()
            .map_or(true, |namespace| namespace == path.namespace)
            && self.user.as_deref().map_or(true, |user| user == path.user)
            && self.expression.is_match(&path.name)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn expression(&self) -> &NameExpression {
        &self.expression
    }
}

/// Builder for [`MailboxQuery`].
///
/// Namespace and user may each be supplied once, either directly or through
/// [`MailboxQueryBuilder::from_base`]; a second assignment is reported as an
/// error by [`MailboxQueryBuilder::build`] rather than silently overwritten.
#[derive(Debug, Default)]
pub struct MailboxQueryBuilder {
    namespace: Option<String>,
    user: Option<String>,
    expression: Option<NameExpression>,
    duplicate_fields: Vec<&'static str>,
}

impl MailboxQueryBuilder {
    /// Scope the query to the namespace and user of an existing path.
    pub fn from_base(self, base: &MailboxPath) -> Self {
        self.namespace(base.namespace.clone()).user(base.user.clone())
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        if self.namespace.is_some() {
            self.duplicate_fields.push("namespace");
        }
        self.namespace = Some(namespace.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        if self.user.is_some() {
            self.duplicate_fields.push("user");
        }
        self.user = Some(user.into());
        self
    }

    pub fn expression(mut self, expression: NameExpression) -> Self {
        self.expression = Some(expression);
        self
    }

    /// Match every mailbox name within the configured scope.
    pub fn match_all(self) -> Self {
        self.expression(NameExpression::MatchAll)
    }

    pub fn build(self) -> Result<MailboxQuery> {
        if !self.duplicate_fields.is_empty() {
            return Err(SearchError::QueryBuilder(format!(
                "field(s) set more than once: {}",
                self.duplicate_fields.join(", ")
            )));
        }
        Ok(MailboxQuery {
            namespace: self.namespace,
            user: self.user,
            expression: self.expression.unwrap_or(NameExpression::MatchAll),
        })
    }
}
