//! Integration tests for the reservation management flow.
//!
//! Drives the full runtime: actions go through the store, effects execute
//! against the in-memory mocks, and subtree notifications feed the live
//! list back in.

#![allow(clippy::unwrap_used)]

use quadra_booking::mocks::{MockIdentity, MockRealtimeStore};
use quadra_booking::providers::RealtimeStore;
use quadra_booking::{
    BookingAction, BookingConfig, BookingEnvironment, BookingError, BookingReducer, BookingState,
    DraftField, FormPhase, ReservationId, UserId,
};
use quadra_runtime::Store;
use quadra_testing::test_clock;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

type BookingStore = Store<
    BookingState,
    BookingAction,
    BookingEnvironment<MockIdentity, MockRealtimeStore>,
    BookingReducer<MockIdentity, MockRealtimeStore>,
>;

const WAIT: Duration = Duration::from_secs(2);

fn harness() -> (BookingStore, MockIdentity, MockRealtimeStore) {
    let identity = MockIdentity::with_user(UserId::new("u1"));
    let remote = MockRealtimeStore::new();
    let env = BookingEnvironment::new(
        identity.clone(),
        remote.clone(),
        Arc::new(test_clock()),
        BookingConfig::default(),
    );
    let store = Store::new(BookingState::new(), BookingReducer::new(), env);
    (store, identity, remote)
}

/// Start observing auth state and wait until the first subtree snapshot
/// resolves the live list.
async fn sign_in_and_sync(store: &BookingStore) {
    store
        .send_and_wait_for(
            BookingAction::ObserveAuthState,
            |action| matches!(action, BookingAction::ReservationsSnapshot { .. }),
            WAIT,
        )
        .await
        .unwrap();
}

async fn wait_until<F>(store: &BookingStore, description: &str, predicate: F)
where
    F: Fn(&BookingState) -> bool,
{
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        if store.state(|state| predicate(state)).await {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for: {description}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn fill_draft(store: &BookingStore, date: &str, name: &str, phone: &str, staff: &str) {
    let fields = [
        (DraftField::ReservationDate, date),
        (DraftField::CustomerName, name),
        (DraftField::CustomerPhone, phone),
        (DraftField::StaffName, staff),
    ];
    for (field, value) in fields {
        store
            .send(BookingAction::DraftEdited {
                field,
                value: value.to_string(),
            })
            .await
            .unwrap();
    }
}

async fn save_and_wait(store: &BookingStore) -> ReservationId {
    let saved = store
        .send_and_wait_for(
            BookingAction::SaveReservation,
            |action| matches!(action, BookingAction::ReservationSaved { .. }),
            WAIT,
        )
        .await
        .unwrap();
    match saved {
        BookingAction::ReservationSaved { id } => id,
        other => panic!("expected ReservationSaved, got {other:?}"),
    }
}

#[tokio::test]
async fn an_empty_subtree_resolves_to_an_empty_list() {
    let (store, _identity, _remote) = harness();
    sign_in_and_sync(&store).await;

    let reservations = store.state(|s| s.reservations.clone()).await;
    assert!(reservations.reservations.is_empty());
    assert!(!reservations.loading);
}

#[tokio::test]
async fn saving_appends_a_stamped_record_and_updates_the_live_list() {
    let (store, _identity, remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Ana", "11912345678", "Joao").await;
    let id = save_and_wait(&store).await;

    // The store received exactly the wire record, stamped from the clock
    let written = remote
        .value_at(&format!("reservas/u1/{}", id.as_str()))
        .unwrap();
    assert_eq!(written["DataDaReserva"], "05/01/2025");
    assert_eq!(written["DataRegistro"], "01/01/2025");
    assert_eq!(written["NomeDoCliente"], "Ana");
    assert_eq!(written["TelefoneDoCliente"], "(11) 91234-5678");
    assert_eq!(written["FuncionarioResponsavel"], "Joao");

    // The acknowledged save cleared the form
    let reservations = store.state(|s| s.reservations.clone()).await;
    assert!(reservations.draft.is_clear());
    assert_eq!(reservations.form, FormPhase::Idle);

    // The list catches up with the next notification
    wait_until(&store, "list reflects the append", |s| {
        s.reservations.count() == 1
    })
    .await;
}

#[tokio::test]
async fn a_second_reservation_on_the_same_date_is_rejected() {
    let (store, _identity, remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Ana", "11912345678", "Joao").await;
    save_and_wait(&store).await;
    wait_until(&store, "first record lands", |s| s.reservations.count() == 1).await;
    let writes_so_far = remote.write_count();

    // Same date, different customer: rejected before any store call
    fill_draft(&store, "05/01/2025", "Bruno", "11955550000", "Joao").await;
    store.send(BookingAction::SaveReservation).await.unwrap();

    let reservations = store.state(|s| s.reservations.clone()).await;
    assert_eq!(
        reservations.last_error,
        Some(BookingError::DuplicateDate {
            date: "05/01/2025".to_string()
        })
    );
    assert_eq!(reservations.count(), 1);
    assert_eq!(remote.write_count(), writes_so_far);
}

#[tokio::test]
async fn editing_overwrites_in_place_without_self_collision() {
    let (store, _identity, remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Ana", "11912345678", "Joao").await;
    let id = save_and_wait(&store).await;
    wait_until(&store, "record lands", |s| s.reservations.count() == 1).await;

    // Load the record into the draft, keep the date, change the name
    store
        .send(BookingAction::BeginEdit { id: id.clone() })
        .await
        .unwrap();
    store
        .send(BookingAction::DraftEdited {
            field: DraftField::CustomerName,
            value: "Ana Clara".to_string(),
        })
        .await
        .unwrap();

    let saved_id = save_and_wait(&store).await;
    assert_eq!(saved_id, id);

    let written = remote
        .value_at(&format!("reservas/u1/{}", id.as_str()))
        .unwrap();
    assert_eq!(written["NomeDoCliente"], "Ana Clara");
    assert_eq!(written["DataDaReserva"], "05/01/2025");

    // Still a single record: the edit replaced, not appended
    wait_until(&store, "list reflects the edit", |s| {
        s.reservations.count() == 1
            && s.reservations.reservations[0].record.customer_name == "Ana Clara"
    })
    .await;
}

#[tokio::test]
async fn deleting_removes_the_record_from_the_next_snapshot() {
    let (store, _identity, _remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Ana", "11912345678", "Joao").await;
    let id = save_and_wait(&store).await;
    wait_until(&store, "record lands", |s| s.reservations.count() == 1).await;

    store
        .send_and_wait_for(
            BookingAction::DeleteReservation { id },
            |action| matches!(action, BookingAction::ReservationDeleted { .. }),
            WAIT,
        )
        .await
        .unwrap();

    wait_until(&store, "list reflects the delete", |s| {
        s.reservations.count() == 0
    })
    .await;
}

#[tokio::test]
async fn a_failed_write_preserves_the_draft_for_retry() {
    let (store, _identity, remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Ana", "11912345678", "Joao").await;

    remote.fail_writes(true);
    store
        .send_and_wait_for(
            BookingAction::SaveReservation,
            |action| matches!(action, BookingAction::SaveFailed { .. }),
            WAIT,
        )
        .await
        .unwrap();

    let reservations = store.state(|s| s.reservations.clone()).await;
    assert_eq!(reservations.form, FormPhase::Editing);
    assert_eq!(reservations.draft.customer_name, "Ana");
    assert!(matches!(
        reservations.last_error,
        Some(BookingError::Store { .. })
    ));

    // Manual resubmission succeeds once the store recovers
    remote.fail_writes(false);
    save_and_wait(&store).await;
    wait_until(&store, "record lands after retry", |s| {
        s.reservations.count() == 1
    })
    .await;
}

#[tokio::test]
async fn unsubscribing_detaches_the_live_list() {
    let (store, _identity, remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Ana", "11912345678", "Joao").await;
    save_and_wait(&store).await;
    wait_until(&store, "record lands", |s| s.reservations.count() == 1).await;

    store
        .send(BookingAction::UnsubscribeReservations)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // A write from elsewhere no longer reaches this consumer
    remote
        .push(
            "reservas/u1",
            &json!({
                "DataDaReserva": "09/01/2025",
                "DataRegistro": "01/01/2025",
                "NomeDoCliente": "Bruno",
                "TelefoneDoCliente": "(11) 95555-0000",
                "FuncionarioResponsavel": "Joao",
            }),
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(store.state(|s| s.reservations.count()).await, 1);
}

#[tokio::test]
async fn signing_out_clears_the_working_set_and_detaches() {
    let (store, identity, remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Ana", "11912345678", "Joao").await;
    save_and_wait(&store).await;
    wait_until(&store, "record lands", |s| s.reservations.count() == 1).await;

    identity.sign_out();
    wait_until(&store, "session resets", |s| s.session.current_user.is_none()).await;

    let reservations = store.state(|s| s.reservations.clone()).await;
    assert!(reservations.reservations.is_empty());
    assert!(!reservations.loading);

    // Writes after sign-out stay invisible
    remote
        .push(
            "reservas/u1",
            &json!({
                "DataDaReserva": "09/01/2025",
                "DataRegistro": "01/01/2025",
                "NomeDoCliente": "Bruno",
                "TelefoneDoCliente": "(11) 95555-0000",
                "FuncionarioResponsavel": "Joao",
            }),
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(store.state(|s| s.reservations.count()).await, 0);
}

#[tokio::test]
async fn search_filters_the_live_list_without_touching_it() {
    let (store, _identity, _remote) = harness();
    sign_in_and_sync(&store).await;

    fill_draft(&store, "05/01/2025", "Lucas Silva", "11912345678", "Joao").await;
    save_and_wait(&store).await;
    fill_draft(&store, "06/01/2025", "Ana Souza", "11955550000", "Joao").await;
    save_and_wait(&store).await;
    wait_until(&store, "both records land", |s| s.reservations.count() == 2).await;

    // Below the threshold: no filtering
    store
        .send(BookingAction::SearchChanged {
            term: "ab".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(store.state(|s| s.reservations.filtered().len()).await, 2);

    store
        .send(BookingAction::SearchChanged {
            term: "lucas".to_string(),
        })
        .await
        .unwrap();
    let (filtered, total) = store
        .state(|s| (s.reservations.filtered().len(), s.reservations.count()))
        .await;
    assert_eq!(filtered, 1);
    assert_eq!(total, 2);
}
