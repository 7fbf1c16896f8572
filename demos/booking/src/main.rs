//! CLI demo for the booking core.
//!
//! Wires the reducers to the in-memory mock providers and drives a full
//! session: sign-in, live subscription, create, search, edit, delete.

use quadra_booking::mocks::{MockIdentity, MockRealtimeStore};
use quadra_booking::{
    BookingAction, BookingConfig, BookingEnvironment, BookingReducer, BookingState, DraftField,
    UserId,
};
use quadra_core::environment::SystemClock;
use quadra_runtime::Store;
use std::sync::Arc;
use std::time::Duration;

type DemoStore = Store<
    BookingState,
    BookingAction,
    BookingEnvironment<MockIdentity, MockRealtimeStore>,
    BookingReducer<MockIdentity, MockRealtimeStore>,
>;

const WAIT: Duration = Duration::from_secs(5);

async fn fill_draft(
    store: &DemoStore,
    date: &str,
    name: &str,
    phone: &str,
    staff: &str,
) -> anyhow::Result<()> {
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
            .await?;
    }
    Ok(())
}

async fn save(store: &DemoStore) -> anyhow::Result<()> {
    store
        .send_and_wait_for(
            BookingAction::SaveReservation,
            |action| {
                matches!(
                    action,
                    BookingAction::ReservationSaved { .. } | BookingAction::SaveFailed { .. }
                )
            },
            WAIT,
        )
        .await?;
    Ok(())
}

async fn wait_for_count(store: &DemoStore, count: usize) {
    while store.state(|s| s.reservations.count()).await != count {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn print_list(store: &DemoStore) {
    let (filtered, total) = store
        .state(|s| {
            let filtered: Vec<String> = s
                .reservations
                .filtered()
                .iter()
                .map(|r| {
                    format!(
                        "  {} — {} ({}, {})",
                        r.record.date_of_reservation,
                        r.record.customer_name,
                        r.record.customer_phone,
                        r.record.responsible_staff,
                    )
                })
                .collect();
            (filtered, s.reservations.count())
        })
        .await;
    println!("Reservations ({total}):");
    for line in filtered {
        println!("{line}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Quadra Booking Demo ===\n");

    let identity = MockIdentity::new();
    let remote = MockRealtimeStore::new();
    let env = BookingEnvironment::new(
        identity.clone(),
        remote,
        Arc::new(SystemClock),
        BookingConfig::default(),
    );
    let store = Store::new(BookingState::new(), BookingReducer::new(), env);

    // Observe auth state, then sign in; the reservations subscription and
    // profile fetch follow from the auth change
    store.send(BookingAction::ObserveAuthState).await?;
    identity.sign_in(UserId::new("demo-user"));
    while !store.state(|s| s.session.current_user.is_some()).await {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    println!("Signed in as demo-user\n");

    println!("Creating reservations...");
    fill_draft(&store, "15012026", "Lucas Silva", "11912345678", "Joao").await?;
    save(&store).await?;
    fill_draft(&store, "16012026", "Ana Souza", "11955550000", "Maria").await?;
    save(&store).await?;
    wait_for_count(&store, 2).await;
    print_list(&store).await;

    // A duplicate date is rejected before any store call
    println!("\nTrying a duplicate date...");
    fill_draft(&store, "15012026", "Bruno Costa", "11944440000", "Maria").await?;
    store.send(BookingAction::SaveReservation).await?;
    if let Some(error) = store.state(|s| s.reservations.last_error.clone()).await {
        println!("  rejected: {error}");
    }
    store.send(BookingAction::CancelEdit).await?;

    println!("\nSearching for \"lucas\"...");
    store
        .send(BookingAction::SearchChanged {
            term: "lucas".to_string(),
        })
        .await?;
    print_list(&store).await;
    store
        .send(BookingAction::SearchChanged {
            term: String::new(),
        })
        .await?;

    println!("\nEditing Ana's reservation...");
    let id = store
        .state(|s| {
            s.reservations
                .reservations
                .iter()
                .find(|r| r.record.customer_name == "Ana Souza")
                .map(|r| r.id.clone())
        })
        .await;
    if let Some(id) = id {
        store.send(BookingAction::BeginEdit { id }).await?;
        store
            .send(BookingAction::DraftEdited {
                field: DraftField::ReservationValue,
                value: "25000".to_string(),
            })
            .await?;
        save(&store).await?;
    }
    print_list(&store).await;

    println!("\nDeleting Lucas's reservation...");
    let id = store
        .state(|s| s.reservations.reservations.last().map(|r| r.id.clone()))
        .await;
    if let Some(id) = id {
        store
            .send_and_wait_for(
                BookingAction::DeleteReservation { id },
                |action| matches!(action, BookingAction::ReservationDeleted { .. }),
                WAIT,
            )
            .await?;
    }
    wait_for_count(&store, 1).await;
    print_list(&store).await;

    println!("\nSigning out...");
    identity.sign_out();
    while store.state(|s| s.session.current_user.is_some()).await {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    println!(
        "Working set after sign-out: {} reservations",
        store.state(|s| s.reservations.count()).await
    );

    store.shutdown(WAIT).await?;
    println!("\n=== Demo Complete ===");
    Ok(())
}
