//! Mailbox name matching expressions
//!
//! Implements the two-character wildcard language used when listing and
//! searching mailboxes: `*` matches any run of characters, `%` matches any
//! run of characters stopping at the hierarchy delimiter.

use crate::error::{Result, SearchError};
use regex::Regex;

/// Matches any sequence of characters, hierarchy delimiter included.
pub const FREE_WILDCARD: char = '*';

/// Matches any sequence of characters up to the next hierarchy delimiter.
pub const LOCAL_WILDCARD: char = '%';

/// A matcher over mailbox names.
///
/// Expressions are immutable value objects; matching is pure and never
/// fails. Anything that can go wrong (pattern compilation) happens at
/// construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameExpression {
    /// Case-insensitive full-name equality.
    Exact { name: String },
    /// Case-insensitive prefix match, any suffix accepted.
    PrefixedWildcard { prefix: String },
    /// Wildcard pattern anchored under a literal prefix.
    PrefixedRegex(PrefixedRegex),
    /// Matches every name.
    MatchAll,
}

impl NameExpression {
    pub fn exact(name: impl Into<String>) -> Self {
        Self::Exact { name: name.into() }
    }

    pub fn prefixed_wildcard(prefix: impl Into<String>) -> Self {
        Self::PrefixedWildcard {
            prefix: prefix.into(),
        }
    }

    pub fn prefixed_regex(
        prefix: impl Into<String>,
        pattern: impl Into<String>,
        delimiter: char,
    ) -> Result<Self> {
        Ok(Self::PrefixedRegex(PrefixedRegex::new(
            prefix, pattern, delimiter,
        )?))
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            Self::Exact { name: expected } => name.to_lowercase() == expected.to_lowercase(),
            Self::PrefixedWildcard { prefix } => {
                name.to_lowercase().starts_with(&prefix.to_lowercase())
            }
            Self::PrefixedRegex(regex) => regex.is_match(name),
            Self::MatchAll => true,
        }
    }

    /// Whether the expression can match more than one exact name.
    pub fn is_wild(&self) -> bool {
        match self {
            Self::Exact { .. } => false,
            Self::PrefixedWildcard { .. } => true,
            Self::PrefixedRegex(regex) => regex.is_wild(),
            Self::MatchAll => true,
        }
    }

    /// Prefix and pattern joined back into a single listable name.
    pub fn combined_name(&self) -> String {
        match self {
            Self::Exact { name } => name.clone(),
            Self::PrefixedWildcard { prefix } => format!("{prefix}{FREE_WILDCARD}"),
            Self::PrefixedRegex(regex) => regex.combined_name(),
            Self::MatchAll => FREE_WILDCARD.to_string(),
        }
    }

    /// Widen the expression so descendants of matched names match too.
    pub fn include_children(&self) -> NameExpression {
        match self {
            Self::Exact { name } => Self::PrefixedWildcard {
                prefix: name.clone(),
            },
            Self::PrefixedWildcard { .. } => self.clone(),
            Self::PrefixedRegex(regex) => Self::PrefixedRegex(regex.include_children()),
            Self::MatchAll => Self::MatchAll,
        }
    }
}

/// Wildcard pattern matched against the part of a name following a literal
/// prefix.
///
/// The pattern is tokenized on the two wildcard characters; every literal
/// segment is escaped, so pattern text can never inject regex syntax. When
/// the pattern holds no wildcard at all, matching falls back to plain string
/// equality and no regex is compiled.
#[derive(Debug, Clone)]
pub struct PrefixedRegex {
    prefix: String,
    expression: String,
    delimiter: char,
    pattern: Option<Regex>,
    children_pattern: Regex,
}

impl PrefixedRegex {
    pub fn new(
        prefix: impl Into<String>,
        expression: impl Into<String>,
        delimiter: char,
    ) -> Result<Self> {
        let prefix = prefix.into();
        let expression = expression.into();

        let is_wild =
            expression.contains(FREE_WILDCARD) || expression.contains(LOCAL_WILDCARD);
        let pattern = if is_wild {
            Some(compile_wildcards(&expression, delimiter)?)
        } else {
            None
        };
        let children_pattern =
            compile_wildcards(&format!("{expression}{FREE_WILDCARD}"), delimiter)?;

        Ok(Self {
            prefix,
            expression,
            delimiter,
            pattern,
            children_pattern,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn is_wild(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn is_match(&self, name: &str) -> bool {
        let Some(rest) = name.strip_prefix(&self.prefix) else {
            return false;
        };
        match &self.pattern {
            Some(pattern) => pattern.is_match(rest),
            // A name may reach the expression through one extra hierarchy
            // level, so tolerate a single leading delimiter.
            None => {
                rest == self.expression
                    || rest.strip_prefix(self.delimiter) == Some(self.expression.as_str())
            }
        }
    }

    pub fn combined_name(&self) -> String {
        if self.prefix.is_empty() {
            return self.expression.clone();
        }
        if self.expression.is_empty() {
            return self.prefix.clone();
        }
        let trimmed = self
            .expression
            .strip_prefix(self.delimiter)
            .unwrap_or(&self.expression);
        if self.prefix.ends_with(self.delimiter) {
            format!("{}{}", self.prefix, trimmed)
        } else {
            format!("{}{}{}", self.prefix, self.delimiter, trimmed)
        }
    }

    pub fn include_children(&self) -> PrefixedRegex {
        if self.expression.ends_with(FREE_WILDCARD) {
            return self.clone();
        }
        PrefixedRegex {
            prefix: self.prefix.clone(),
            expression: format!("{}{}", self.expression, FREE_WILDCARD),
            delimiter: self.delimiter,
            pattern: Some(self.children_pattern.clone()),
            // Appending further free wildcards does not change the language.
            children_pattern: self.children_pattern.clone(),
        }
    }
}

// The compiled patterns are derived from the other fields and excluded from
// comparisons.
impl PartialEq for PrefixedRegex {
    fn eq(&self, other: &Self) -> bool {
        self.prefix == other.prefix
            && self.expression == other.expression
            && self.delimiter == other.delimiter
    }
}

impl Eq for PrefixedRegex {}

/// Translate the wildcard mini-language into an anchored regex.
fn compile_wildcards(expression: &str, delimiter: char) -> Result<Regex> {
    let mut pattern = String::from(r"(?s)\A");
    let mut literal = String::new();
    for ch in expression.chars() {
        match ch {
            FREE_WILDCARD => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str(".*");
            }
            LOCAL_WILDCARD => {
                pattern.push_str(&regex::escape(&literal));
                literal.clear();
                pattern.push_str("[^");
                pattern.push_str(&regex::escape(&delimiter.to_string()));
                pattern.push_str("]*");
            }
            other => literal.push(other),
        }
    }
    pattern.push_str(&regex::escape(&literal));
    pattern.push_str(r"\z");

    Regex::new(&pattern).map_err(|e| SearchError::Pattern(e.to_string()))
}
