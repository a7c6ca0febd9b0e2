//! End-to-end command flow against the in-memory store: hold expiry through
//! the sweep, fact publication order, and the purchase lifecycle.

use std::sync::Arc;

use chrono::{Duration, Utc};
use seat_inventory::clock::FixedClock;
use seat_inventory::commands::SeatMapCommands;
use seat_inventory::error::{CommandError, DomainError};
use seat_inventory::models::{Fact, SeatStatus};
use seat_inventory::services::sweep::ExpirySweep;
use seat_inventory::AppState;

#[tokio::test]
async fn expired_hold_is_swept_and_seat_becomes_reservable_again() {
    let clock = Arc::new(FixedClock::at(Utc::now()));
    let state = AppState::for_tests(clock.clone());
    let commands = SeatMapCommands::new(state.clone());
    let sweep = ExpirySweep::new(state.clone());

    let map_id = commands.create_seat_map(1).await.unwrap();
    commands
        .add_category(map_id, "General", Some(20.0), false)
        .await
        .unwrap();
    let seat_id = commands.add_seat(map_id, 1, 1, "General").await.unwrap().id;
    commands.reserve_seat(map_id, seat_id, "user1").await.unwrap();

    // Before the hold runs out the sweep must not touch the seat.
    clock.advance(Duration::minutes(14));
    assert_eq!(sweep.run_once().await, 0);
    let map = commands.get_seat_map(map_id).await.unwrap();
    assert_eq!(map.seat(seat_id).unwrap().status, SeatStatus::Reserved);

    // hold_duration + 1s past the reservation timestamp.
    clock.advance(Duration::minutes(1) + Duration::seconds(1));
    assert_eq!(sweep.run_once().await, 1);

    let map = commands.get_seat_map(map_id).await.unwrap();
    let seat = map.seat(seat_id).unwrap();
    assert_eq!(seat.status, SeatStatus::Available);
    assert!(seat.holder.is_none());

    // The freed seat is reservable by the next holder.
    commands.reserve_seat(map_id, seat_id, "user2").await.unwrap();
    let map = commands.get_seat_map(map_id).await.unwrap();
    assert_eq!(map.seat(seat_id).unwrap().holder.as_deref(), Some("user2"));

    // Idempotent follow-up sweep finds nothing.
    assert_eq!(sweep.run_once().await, 0);
}

#[tokio::test]
async fn occupied_seats_are_never_swept() {
    let clock = Arc::new(FixedClock::at(Utc::now()));
    let state = AppState::for_tests(clock.clone());
    let commands = SeatMapCommands::new(state.clone());
    let sweep = ExpirySweep::new(state.clone());

    let map_id = commands.create_seat_map(1).await.unwrap();
    commands
        .add_category(map_id, "General", Some(20.0), false)
        .await
        .unwrap();
    let seat_id = commands.add_seat(map_id, 1, 1, "General").await.unwrap().id;
    commands.reserve_seat(map_id, seat_id, "user1").await.unwrap();
    commands.confirm_purchase(map_id, seat_id, "user1").await.unwrap();

    clock.advance(Duration::hours(24));
    assert_eq!(sweep.run_once().await, 0);

    let map = commands.get_seat_map(map_id).await.unwrap();
    assert_eq!(map.seat(seat_id).unwrap().status, SeatStatus::Occupied);
    assert_eq!(map.seat(seat_id).unwrap().holder.as_deref(), Some("user1"));
}

#[tokio::test]
async fn facts_are_published_in_transition_order_after_commit() {
    let clock = Arc::new(FixedClock::at(Utc::now()));
    let state = AppState::for_tests(clock);
    let commands = SeatMapCommands::new(state.clone());

    let mut rx = state.realtime.subscribe(9);

    let map_id = commands.create_seat_map(9).await.unwrap();
    commands
        .add_category(map_id, "VIP", Some(100.0), true)
        .await
        .unwrap();
    let seat_id = commands.add_seat(map_id, 2, 5, "VIP").await.unwrap().id;
    commands.reserve_seat(map_id, seat_id, "user1").await.unwrap();
    commands.release_seat(map_id, seat_id).await.unwrap();
    // Idempotent second release publishes nothing.
    commands.release_seat(map_id, seat_id).await.unwrap();
    commands.reserve_seat(map_id, seat_id, "user2").await.unwrap();
    commands.confirm_purchase(map_id, seat_id, "user2").await.unwrap();

    let mut facts = Vec::new();
    while let Ok(fact) = rx.try_recv() {
        facts.push(fact);
    }

    assert!(matches!(facts[0], Fact::SeatMapCreated { event_id: 9, .. }));
    assert!(facts.iter().all(|f| f.seat_map_id() == map_id && f.event_id() == 9));
    assert!(matches!(facts[1], Fact::CategoryAdded { ref name, has_priority: true, .. } if name == "VIP"));
    assert!(matches!(facts[2], Fact::SeatAdded { row: 2, number: 5, .. }));
    assert!(matches!(facts[3], Fact::SeatReserved { ref holder_id, .. } if holder_id == "user1"));
    assert!(matches!(facts[4], Fact::SeatReleased { .. }));
    assert!(matches!(facts[5], Fact::SeatReserved { ref holder_id, .. } if holder_id == "user2"));
    assert!(matches!(facts[6], Fact::SeatPurchaseConfirmed { ref holder_id, .. } if holder_id == "user2"));
    assert_eq!(facts.len(), 7);
}

#[tokio::test]
async fn purchase_then_mark_paid_settles_the_seat() {
    let clock = Arc::new(FixedClock::at(Utc::now()));
    let state = AppState::for_tests(clock);
    let commands = SeatMapCommands::new(state.clone());

    let map_id = commands.create_seat_map(1).await.unwrap();
    commands
        .add_category(map_id, "General", Some(20.0), false)
        .await
        .unwrap();
    let seat_id = commands.add_seat(map_id, 1, 1, "General").await.unwrap().id;

    commands.reserve_seat(map_id, seat_id, "user1").await.unwrap();
    commands.confirm_purchase(map_id, seat_id, "user1").await.unwrap();

    let map = commands.get_seat_map(map_id).await.unwrap();
    assert!(!map.seat(seat_id).unwrap().paid, "payment settles separately");

    commands.mark_paid(map_id, seat_id).await.unwrap();
    let map = commands.get_seat_map(map_id).await.unwrap();
    let seat = map.seat(seat_id).unwrap();
    assert!(seat.paid);
    assert_eq!(seat.status, SeatStatus::Occupied);
}

#[tokio::test]
async fn commands_against_unknown_map_fail_not_found() {
    let clock = Arc::new(FixedClock::at(Utc::now()));
    let state = AppState::for_tests(clock);
    let commands = SeatMapCommands::new(state);

    let ghost = uuid::Uuid::new_v4();
    let err = commands.reserve_seat(ghost, uuid::Uuid::new_v4(), "user1").await.unwrap_err();
    assert!(matches!(
        err,
        CommandError::Domain(DomainError::SeatMapNotFound(id)) if id == ghost
    ));
}
