//! Integration tests for push delivery and the polling backstop.

mod helpers;

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};

use medhub_core::events::{ChangeEvent, EntityType};
use medhub_core::types::SubjectId;
use medhub_entity::user::Role;

use helpers::{TestApp, appointment, appointments, wait_until};

/// Scopes a doctor session subscribes to: appointments, payments, tickets.
const DOCTOR_SCOPES: usize = 3;

fn insert(appt: &medhub_entity::appointment::Appointment) -> ChangeEvent {
    ChangeEvent::insert(
        EntityType::Appointment,
        serde_json::to_value(appt).expect("appointment serializes"),
    )
}

#[tokio::test]
async fn test_duplicate_push_is_absorbed() {
    let app = TestApp::push_only();
    let doctor = SubjectId::new();
    let session = app.engine.activate(Role::Doctor, doctor).await;
    wait_until("subscriptions", || app.changes.subscriber_count() == DOCTOR_SCOPES).await;

    let first = appointment(SubjectId::new(), doctor, Utc::now() + Duration::days(1));
    app.changes.publish(insert(&first)).await;
    wait_until("first push", || session.feed().len() == 1).await;

    // Redelivery of the same insert, then a distinct one on the same stream.
    app.changes.publish(insert(&first)).await;
    let second = appointment(SubjectId::new(), doctor, Utc::now() + Duration::days(2));
    app.changes.publish(insert(&second)).await;
    wait_until("second push", || session.feed().len() >= 2).await;

    assert_eq!(session.feed().len(), 2);
}

#[tokio::test]
async fn test_push_ignores_other_subjects() {
    let app = TestApp::push_only();
    let doctor = SubjectId::new();
    let session = app.engine.activate(Role::Doctor, doctor).await;
    wait_until("subscriptions", || app.changes.subscriber_count() == DOCTOR_SCOPES).await;

    let foreign = appointment(SubjectId::new(), SubjectId::new(), Utc::now() + Duration::days(1));
    assert_eq!(app.changes.publish(insert(&foreign)).await, 0);
    assert!(session.feed().is_empty());
}

#[tokio::test]
async fn test_push_reports_only_transitions() {
    let app = TestApp::push_only();
    let doctor = SubjectId::new();
    let session = app.engine.activate(Role::Doctor, doctor).await;
    wait_until("subscriptions", || app.changes.subscriber_count() == DOCTOR_SCOPES).await;

    let mut before = appointment(SubjectId::new(), doctor, Utc::now() + Duration::days(1));
    before.read_by_doctor = true;
    let mut after = before.clone();
    after.patient_response = Some(medhub_entity::appointment::PatientResponse::Cancelled);

    app.changes
        .publish(ChangeEvent::update(
            EntityType::Appointment,
            serde_json::to_value(&before).unwrap(),
            serde_json::to_value(&after).unwrap(),
        ))
        .await;
    wait_until("cancellation", || session.feed().len() == 1).await;
    assert_eq!(session.feed()[0].id, format!("patient-cancelled-{}", after.id));
}

#[tokio::test(start_paused = true)]
async fn test_push_resubscribes_after_drop() {
    let app = TestApp::push_only();
    let doctor = SubjectId::new();
    let session = app.engine.activate(Role::Doctor, doctor).await;
    wait_until("subscriptions", || app.changes.subscriber_count() == DOCTOR_SCOPES).await;

    assert_eq!(app.changes.disconnect_all(), DOCTOR_SCOPES);
    wait_until("resubscription", || app.changes.subscriber_count() == DOCTOR_SCOPES).await;

    let appt = appointment(SubjectId::new(), doctor, Utc::now() + Duration::days(1));
    app.changes.publish(insert(&appt)).await;
    wait_until("push after resubscribe", || session.feed().len() == 1).await;
}

#[tokio::test]
async fn test_teardown_releases_subscriptions() {
    let app = TestApp::push_only();
    app.engine.activate(Role::Admin, SubjectId::new()).await;
    wait_until("subscriptions", || app.changes.subscriber_count() == 3).await;

    app.engine.shutdown().await;
    wait_until("release", || app.changes.subscriber_count() == 0).await;
}

#[tokio::test(start_paused = true)]
async fn test_poller_picks_up_new_records() {
    let app = TestApp::poll_only();
    let doctor = SubjectId::new();
    let session = app.engine.activate(Role::Doctor, doctor).await;
    wait_until("first poll", || app.source.fetches() >= 1).await;
    assert!(session.feed().is_empty());

    app.source.set(appointments(vec![appointment(
        SubjectId::new(),
        doctor,
        Utc::now() + Duration::days(1),
    )]));
    tokio::time::sleep(StdDuration::from_secs(31)).await;

    wait_until("second poll", || session.feed().len() == 1).await;
}

#[tokio::test(start_paused = true)]
async fn test_poller_survives_fetch_failures() {
    let app = TestApp::poll_only();
    let doctor = SubjectId::new();
    app.source.fail(true);
    let session = app.engine.activate(Role::Doctor, doctor).await;
    wait_until("failed poll", || app.source.fetches() >= 1).await;

    app.source.fail(false);
    app.source.set(appointments(vec![appointment(
        SubjectId::new(),
        doctor,
        Utc::now() + Duration::days(1),
    )]));
    tokio::time::sleep(StdDuration::from_secs(31)).await;

    wait_until("recovered poll", || session.feed().len() == 1).await;
}

#[tokio::test]
async fn test_refresh_fetches_immediately() {
    let app = TestApp::manual();
    let doctor = SubjectId::new();
    app.source.set(appointments(vec![appointment(
        SubjectId::new(),
        doctor,
        Utc::now() + Duration::days(1),
    )]));

    let session = app.engine.activate(Role::Doctor, doctor).await;
    assert_eq!(session.refresh().await, 1);
    assert_eq!(app.source.fetches(), 1);
}

#[tokio::test]
async fn test_watch_feed_sees_merges() {
    let app = TestApp::manual();
    let doctor = SubjectId::new();
    let session = app.engine.activate(Role::Doctor, doctor).await;
    let mut rx = session.watch_feed();

    session
        .on_new_events(&appointments(vec![appointment(
            SubjectId::new(),
            doctor,
            Utc::now() + Duration::days(1),
        )]))
        .await;

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow().len(), 1);
}
