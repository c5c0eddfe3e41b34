//! Criterion factories for the deleted-message vault
//!
//! Thin naming layer over the generic engine: one factory per searchable
//! field of [`DeletedMessage`].

use crate::mailbox::MailboxId;
use crate::vault::query::{
    self, for_field, Criterion, CriterionBuilder, FieldName, Operator,
};
use crate::vault::types::DeletedMessage;
use chrono::{DateTime, Utc};

/// Criteria over the deletion date.
pub fn deletion_date() -> DateCriterionFactory {
    DateCriterionFactory {
        field: FieldName::DeletionDate,
        extract: |message| Some(&message.deletion_date),
    }
}

/// Criteria over the original delivery date.
pub fn delivery_date() -> DateCriterionFactory {
    DateCriterionFactory {
        field: FieldName::DeliveryDate,
        extract: |message| Some(&message.delivery_date),
    }
}

pub struct DateCriterionFactory {
    field: FieldName,
    extract: fn(&DeletedMessage) -> Option<&DateTime<Utc>>,
}

impl DateCriterionFactory {
    pub fn before_or_equals(self, bound: DateTime<Utc>) -> Criterion<DeletedMessage> {
        for_field(self.field, self.extract).matching(
            Operator::BeforeOrEquals,
            bound.to_rfc3339(),
            query::before_or_equals(bound),
        )
    }

    pub fn after_or_equals(self, bound: DateTime<Utc>) -> Criterion<DeletedMessage> {
        for_field(self.field, self.extract).matching(
            Operator::AfterOrEquals,
            bound.to_rfc3339(),
            query::after_or_equals(bound),
        )
    }
}

/// Criteria over the subject line. A message without a subject never
/// matches.
pub fn subject() -> SubjectCriterionFactory {
    SubjectCriterionFactory
}

pub struct SubjectCriterionFactory;

impl SubjectCriterionFactory {
    fn builder(self) -> CriterionBuilder<DeletedMessage, String> {
        for_field(FieldName::Subject, |message: &DeletedMessage| {
            message.subject.as_ref()
        })
    }

    pub fn contains(self, expected: &str) -> Criterion<DeletedMessage> {
        self.builder()
            .matching(Operator::Contains, expected, query::contains(expected))
    }

    pub fn contains_ignore_case(self, expected: &str) -> Criterion<DeletedMessage> {
        self.builder().matching(
            Operator::ContainsIgnoreCase,
            expected,
            query::contains_ignore_case(expected),
        )
    }

    pub fn equals(self, expected: &str) -> Criterion<DeletedMessage> {
        self.builder()
            .matching(Operator::Equals, expected, query::equals(expected))
    }

    pub fn equals_ignore_case(self, expected: &str) -> Criterion<DeletedMessage> {
        self.builder().matching(
            Operator::EqualsIgnoreCase,
            expected,
            query::equals_ignore_case(expected),
        )
    }
}

/// Messages sent by the given envelope sender. Null-sender messages never
/// match.
pub fn has_sender(address: &str) -> Criterion<DeletedMessage> {
    for_field(FieldName::Sender, |message: &DeletedMessage| {
        message.sender.as_ref()
    })
    .matching(Operator::Equals, address, query::equals(address))
}

/// Messages carrying at least one attachment.
pub fn has_attachment() -> Criterion<DeletedMessage> {
    for_field(FieldName::HasAttachment, |message: &DeletedMessage| {
        Some(&message.has_attachment)
    })
    .matching(Operator::Equals, "true", |value: &bool| *value)
}

/// Messages carrying no attachment at all.
pub fn has_no_attachment() -> Criterion<DeletedMessage> {
    for_field(FieldName::HasAttachment, |message: &DeletedMessage| {
        Some(&message.has_attachment)
    })
    .matching(Operator::Equals, "false", |value: &bool| !*value)
}

/// Messages addressed to the given recipient.
pub fn contains_recipient(address: &str) -> Criterion<DeletedMessage> {
    for_field(FieldName::RecipientList, |message: &DeletedMessage| {
        Some(&message.recipients)
    })
    .matching(
        Operator::Contains,
        address,
        query::list_contains(address.to_string()),
    )
}

/// Messages deleted from the given mailbox.
pub fn contains_origin_mailbox(mailbox_id: MailboxId) -> Criterion<DeletedMessage> {
    for_field(FieldName::OriginMailboxList, |message: &DeletedMessage| {
        Some(&message.origin_mailboxes)
    })
    .matching(
        Operator::Contains,
        mailbox_id.serialize(),
        query::list_contains(mailbox_id),
    )
}
