//! Deleted-message vault search scenarios against an in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use search_rs::mailbox::MailboxId;
use search_rs::search::types::MessageId;
use search_rs::vault::criteria;
use search_rs::vault::{DeletedMessage, Query};

struct Fixture {
    mailbox_1: MailboxId,
    mailbox_2: MailboxId,
    messages: Vec<DeletedMessage>,
}

const SENDER: &str = "sender@example.com";
const SENDER_2: &str = "sender2@example.com";
const RECIPIENT_1: &str = "recipient1@example.org";
const RECIPIENT_2: &str = "recipient2@example.org";
const RECIPIENT_3: &str = "recipient3@example.org";

fn delivery_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn deletion_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
}

fn fixture() -> Fixture {
    let mailbox_1 = MailboxId::random();
    let mailbox_2 = MailboxId::random();
    let message_1 = DeletedMessage {
        message_id: MessageId::random(),
        origin_mailboxes: vec![mailbox_1],
        owner: "owner@example.org".to_string(),
        delivery_date: delivery_date(),
        deletion_date: deletion_date(),
        sender: Some(SENDER.to_string()),
        recipients: vec![RECIPIENT_1.to_string(), RECIPIENT_2.to_string()],
        has_attachment: false,
        subject: Some("Weekly Team Meeting".to_string()),
    };
    let message_2 = DeletedMessage {
        message_id: MessageId::random(),
        origin_mailboxes: vec![mailbox_2],
        owner: "owner@example.org".to_string(),
        delivery_date: delivery_date() + Duration::minutes(45),
        deletion_date: deletion_date() + Duration::hours(2),
        sender: Some(SENDER_2.to_string()),
        recipients: vec![RECIPIENT_3.to_string()],
        has_attachment: true,
        subject: Some("Open Source Software".to_string()),
    };
    Fixture {
        mailbox_1,
        mailbox_2,
        messages: vec![message_1, message_2],
    }
}

fn search(fixture: &Fixture, query: Query<DeletedMessage>) -> Vec<&DeletedMessage> {
    fixture
        .messages
        .iter()
        .filter(|message| query.matches(message))
        .collect()
}

fn ids(messages: &[&DeletedMessage]) -> Vec<MessageId> {
    messages.iter().map(|m| m.message_id).collect()
}

#[test]
fn delivery_date_before_or_equals_should_include_the_bound() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![criteria::delivery_date().before_or_equals(delivery_date())]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[0].message_id]);
}

#[test]
fn delivery_date_before_or_equals_should_cover_later_bounds() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![
            criteria::delivery_date().before_or_equals(delivery_date() + Duration::hours(1)),
        ]),
    );

    assert_eq!(results.len(), 2);
}

#[test]
fn delivery_date_after_or_equals_should_exclude_earlier_messages() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![
            criteria::delivery_date().after_or_equals(delivery_date() + Duration::minutes(30)),
        ]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[1].message_id]);
}

#[test]
fn deletion_date_bounds_should_be_inclusive() {
    let fixture = fixture();

    let at_bound = search(
        &fixture,
        Query::of(vec![criteria::deletion_date().after_or_equals(deletion_date())]),
    );

    assert_eq!(at_bound.len(), 2);

    let none_before = search(
        &fixture,
        Query::of(vec![
            criteria::deletion_date().before_or_equals(deletion_date() - Duration::minutes(1)),
        ]),
    );

    assert!(none_before.is_empty());
}

#[test]
fn contains_recipient_should_match_any_listed_recipient() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![criteria::contains_recipient(RECIPIENT_2)]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[0].message_id]);

    let results = search(
        &fixture,
        Query::of(vec![criteria::contains_recipient(RECIPIENT_3)]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[1].message_id]);
}

#[test]
fn has_sender_should_match_the_exact_address() {
    let fixture = fixture();

    let results = search(&fixture, Query::of(vec![criteria::has_sender(SENDER)]));

    assert_eq!(ids(&results), vec![fixture.messages[0].message_id]);
}

#[test]
fn has_sender_should_skip_null_sender_messages() {
    let mut fixture = fixture();
    fixture.messages[0].sender = None;

    let results = search(&fixture, Query::of(vec![criteria::has_sender(SENDER)]));

    assert!(results.is_empty());
}

#[test]
fn attachment_criteria_should_partition_the_store() {
    let fixture = fixture();

    let with_attachment = search(&fixture, Query::of(vec![criteria::has_attachment()]));
    let without_attachment = search(&fixture, Query::of(vec![criteria::has_no_attachment()]));

    assert_eq!(ids(&with_attachment), vec![fixture.messages[1].message_id]);
    assert_eq!(ids(&without_attachment), vec![fixture.messages[0].message_id]);
}

#[test]
fn contains_origin_mailbox_should_match_per_mailbox() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![criteria::contains_origin_mailbox(fixture.mailbox_1)]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[0].message_id]);

    let results = search(
        &fixture,
        Query::of(vec![criteria::contains_origin_mailbox(fixture.mailbox_2)]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[1].message_id]);
}

#[test]
fn subject_contains_should_be_case_sensitive() {
    let fixture = fixture();

    let results = search(&fixture, Query::of(vec![criteria::subject().contains("Team")]));
    assert_eq!(results.len(), 1);

    let results = search(&fixture, Query::of(vec![criteria::subject().contains("team")]));
    assert!(results.is_empty());
}

#[test]
fn subject_contains_ignore_case_should_match_across_cases() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![criteria::subject().contains_ignore_case("TEaM")]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[0].message_id]);

    let results = search(
        &fixture,
        Query::of(vec![criteria::subject().contains_ignore_case("SouRCE")]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[1].message_id]);
}

#[test]
fn subject_equals_should_require_the_full_subject() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![criteria::subject().equals("Weekly Team Meeting")]),
    );
    assert_eq!(results.len(), 1);

    let results = search(&fixture, Query::of(vec![criteria::subject().equals("Team")]));
    assert!(results.is_empty());

    let results = search(
        &fixture,
        Query::of(vec![criteria::subject().equals_ignore_case("weekly team MEETING")]),
    );
    assert_eq!(results.len(), 1);
}

#[test]
fn combined_criteria_should_all_have_to_hold() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![
            criteria::contains_origin_mailbox(fixture.mailbox_1),
            criteria::has_sender(SENDER),
            criteria::deletion_date().after_or_equals(deletion_date()),
        ]),
    );

    assert_eq!(ids(&results), vec![fixture.messages[0].message_id]);

    let results = search(
        &fixture,
        Query::of(vec![
            criteria::contains_origin_mailbox(fixture.mailbox_1),
            criteria::has_sender(SENDER_2),
        ]),
    );

    assert!(results.is_empty());
}

#[test]
fn contradictory_date_range_should_match_nothing() {
    let fixture = fixture();

    let results = search(
        &fixture,
        Query::of(vec![
            criteria::deletion_date().after_or_equals(deletion_date() + Duration::hours(1)),
            criteria::deletion_date().before_or_equals(deletion_date() - Duration::hours(1)),
        ]),
    );

    assert!(results.is_empty());
}

#[test]
fn the_all_query_should_return_the_full_store() {
    let fixture = fixture();

    let results = search(&fixture, Query::all());

    assert_eq!(results.len(), 2);
}
