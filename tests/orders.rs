mod common;

use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, Set, SqlErr};

use train_station_backend::{
    entities::{order, ticket},
    repository::{
        journey as journeys,
        order::{create_order, get_for_user, insert_ticket, list_for_user, TicketRequest},
    },
    AppError,
};

fn seat(journey: i32, carriage: i32, seat: i32) -> TicketRequest {
    TicketRequest {
        journey,
        carriage,
        seat,
    }
}

fn validation_field(err: AppError) -> String {
    match err {
        AppError::Validation(v) => v.field,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn availability_drops_as_seats_are_booked() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;

    assert_eq!(journey.tickets_available, 20);

    let id = journey.journey.id;
    create_order(&db, buyer.id, &[seat(id, 1, 1), seat(id, 1, 2), seat(id, 2, 10)])
        .await
        .expect("order");

    let refreshed = journeys::get(&db, id).await.expect("journey");
    assert_eq!(refreshed.tickets_available, 17);

    let booked = journeys::booked_counts(&db, &[id]).await.expect("counts");
    assert_eq!(booked.get(&id), Some(&3));
}

#[tokio::test]
async fn order_returns_tickets_in_request_order() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    let id = journey.journey.id;

    let created = create_order(&db, buyer.id, &[seat(id, 2, 4), seat(id, 1, 9)])
        .await
        .expect("order");

    assert_eq!(created.order.user_id, buyer.id);
    let placed: Vec<(i16, i16)> = created.tickets.iter().map(|t| (t.carriage, t.seat)).collect();
    assert_eq!(placed, vec![(2, 4), (1, 9)]);
    assert!(created.tickets.iter().all(|t| t.order_id == created.order.id));
}

#[tokio::test]
async fn carriage_past_the_train_is_rejected() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;

    let err = create_order(&db, buyer.id, &[seat(journey.journey.id, 3, 1)])
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "carriage");
}

#[tokio::test]
async fn one_bad_ticket_rolls_back_the_whole_order() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    let id = journey.journey.id;

    let err = create_order(&db, buyer.id, &[seat(id, 1, 1), seat(id, 1, 11)])
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "seat");
    assert_eq!(order::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(ticket::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn seat_taken_mid_order_rolls_back_the_order() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let first = common::user(&db, "first@example.com", false).await;
    let second = common::user(&db, "second@example.com", false).await;
    let id = journey.journey.id;

    create_order(&db, first.id, &[seat(id, 1, 5)])
        .await
        .expect("first order");

    // The free seat is requested first so the collision happens after a write
    let err = create_order(&db, second.id, &[seat(id, 2, 2), seat(id, 1, 5)])
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "non_field_errors");
    assert_eq!(order::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(ticket::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn same_seat_twice_in_one_order_is_rejected() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    let id = journey.journey.id;

    let err = create_order(&db, buyer.id, &[seat(id, 1, 1), seat(id, 1, 1)])
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "non_field_errors");
    assert_eq!(order::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let db = common::setup_db().await;
    let buyer = common::user(&db, "buyer@example.com", false).await;

    let err = create_order(&db, buyer.id, &[]).await.unwrap_err();

    assert_eq!(validation_field(err), "tickets");
}

#[tokio::test]
async fn unknown_journey_is_rejected() {
    let db = common::setup_db().await;
    let buyer = common::user(&db, "buyer@example.com", false).await;

    let err = create_order(&db, buyer.id, &[seat(404, 1, 1)])
        .await
        .unwrap_err();

    assert_eq!(validation_field(err), "journey");
}

#[tokio::test]
async fn concurrent_bookings_of_one_seat_have_one_winner() {
    let db = common::setup_db().await;
    let kyiv = common::station(&db, "Kyiv").await;
    let odesa = common::station(&db, "Odesa").await;
    let route = common::route_between(&db, &kyiv, &odesa).await;
    let train = common::train_with(&db, "Chornomorets", 4, 30).await;
    for day in 1..=5 {
        common::journey_on(&db, &route, &train, day).await;
    }
    let alice = common::user(&db, "alice@example.com", false).await;
    let bob = common::user(&db, "bob@example.com", false).await;

    let request = [seat(5, 1, 1)];
    let (a, b) = tokio::join!(
        create_order(&db, alice.id, &request),
        create_order(&db, bob.id, &request),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let loser = outcomes
        .into_iter()
        .find_map(Result::err)
        .expect("one booking fails");
    assert_eq!(validation_field(loser), "non_field_errors");
    assert_eq!(ticket::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn store_rejects_duplicate_seat_rows() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    let created = create_order(&db, buyer.id, &[seat(journey.journey.id, 1, 3)])
        .await
        .expect("order");

    // Bypasses the repository to hit the unique index directly
    let err = ticket::ActiveModel {
        journey_id: Set(journey.journey.id),
        order_id: Set(created.order.id),
        carriage: Set(1),
        seat: Set(3),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap_err();

    assert!(matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_))
    ));
}

#[tokio::test]
async fn inserting_a_booked_seat_reports_it_taken() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    let request = seat(journey.journey.id, 2, 6);
    let created = create_order(&db, buyer.id, &[request])
        .await
        .expect("order");

    let err = insert_ticket(&db, created.order.id, &request)
        .await
        .unwrap_err();

    match err {
        AppError::Validation(v) => {
            assert_eq!(v.field, "non_field_errors");
            assert_eq!(
                v.message,
                "The fields journey, carriage, seat must make a unique set."
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(ticket::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn ticket_insert_checks_bounds_like_order_requests() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    let created = create_order(&db, buyer.id, &[seat(journey.journey.id, 1, 1)])
        .await
        .expect("order");

    let bad = seat(journey.journey.id, 1, 0);
    let direct = insert_ticket(&db, created.order.id, &bad).await.unwrap_err();
    let via_order = create_order(&db, buyer.id, &[bad]).await.unwrap_err();

    match (direct, via_order) {
        (AppError::Validation(a), AppError::Validation(b)) => assert_eq!(a, b),
        other => panic!("expected two validation errors, got {other:?}"),
    }
}

#[tokio::test]
async fn deleting_an_order_removes_its_tickets() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    let id = journey.journey.id;
    let created = create_order(&db, buyer.id, &[seat(id, 1, 1), seat(id, 1, 2)])
        .await
        .expect("order");

    created.order.delete(&db).await.expect("delete order");

    assert_eq!(ticket::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(journeys::get(&db, id).await.unwrap().tickets_available, 20);
}

#[tokio::test]
async fn deleting_a_journey_removes_its_tickets() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let buyer = common::user(&db, "buyer@example.com", false).await;
    create_order(&db, buyer.id, &[seat(journey.journey.id, 2, 2)])
        .await
        .expect("order");

    journey.journey.delete(&db).await.expect("delete journey");

    assert_eq!(ticket::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(order::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn orders_are_listed_per_user_newest_first() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let alice = common::user(&db, "alice@example.com", false).await;
    let bob = common::user(&db, "bob@example.com", false).await;
    let id = journey.journey.id;

    for n in 1..=12 {
        create_order(&db, alice.id, &[seat(id, 1 + (n - 1) / 10, 1 + (n - 1) % 10)])
            .await
            .expect("alice order");
    }
    create_order(&db, bob.id, &[seat(id, 2, 10)])
        .await
        .expect("bob order");

    let (first_page, count) = list_for_user(&db, alice.id, 1, 10).await.expect("page 1");
    assert_eq!(count, 12);
    assert_eq!(first_page.len(), 10);
    assert!(first_page.iter().all(|o| o.order.user_id == alice.id));
    assert!(first_page[0].order.id > first_page[9].order.id);

    let (second_page, _) = list_for_user(&db, alice.id, 2, 10).await.expect("page 2");
    assert_eq!(second_page.len(), 2);

    let past_end = list_for_user(&db, alice.id, 3, 10).await.unwrap_err();
    assert!(matches!(past_end, AppError::NotFound(_)));

    let (bobs, bob_count) = list_for_user(&db, bob.id, 1, 10).await.expect("bob page");
    assert_eq!(bob_count, 1);
    assert_eq!(bobs[0].tickets.len(), 1);
}

#[tokio::test]
async fn another_users_order_is_forbidden() {
    let db = common::setup_db().await;
    let journey = common::small_journey(&db).await;
    let alice = common::user(&db, "alice@example.com", false).await;
    let bob = common::user(&db, "bob@example.com", false).await;
    let created = create_order(&db, alice.id, &[seat(journey.journey.id, 1, 1)])
        .await
        .expect("order");

    let own = get_for_user(&db, alice.id, created.order.id).await.expect("own order");
    assert_eq!(own.tickets.len(), 1);

    let err = get_for_user(&db, bob.id, created.order.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
}
