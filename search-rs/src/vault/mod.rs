//! Deleted-message vault filtering
//!
//! A generic criterion/query engine plus named criterion factories for the
//! structural fields of retained deleted messages.

pub mod criteria;
pub mod query;
pub mod types;

pub use query::{Criterion, CriterionBuilder, FieldName, Operator, Query};
pub use types::DeletedMessage;
