//! End-to-end console flows against PostgreSQL
//!
//! Each test skips itself when no test database can be reached.

mod helpers;

use axum::http::StatusCode;
use helpers::*;
use serde_json::json;
use serial_test::serial;
use uuid::Uuid;
use HotelConsole::models::Role;

macro_rules! app_or_skip {
    () => {
        match TestApp::try_new().await {
            Some(app) => app,
            None => return,
        }
    };
}

#[tokio::test]
#[serial]
async fn test_booking_prices_the_stay_and_blocks_overlaps() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;

    let (status, first) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 5, 1), date(2030, 5, 4)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", first);
    assert_eq!(first["hotel_id"].as_i64(), Some(hotel_id));
    assert_eq!(first["total_amount"].as_f64(), Some(300.0));
    assert_eq!(first["status"], "pending");

    let (status, body) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 5, 3), date(2030, 5, 6)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["error"], "conflict");

    // check-out day is free for the next guest
    let (status, body) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 5, 4), date(2030, 5, 6)))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    // cancelled bookings do not hold the room
    let mut cancelled = reservation_body(room_id, date(2030, 5, 2), date(2030, 5, 3));
    cancelled["status"] = json!("cancelled");
    let (status, body) = app.post("/reservations", &token, cancelled).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    assert_eq!(app.database.count_records("reservations").await.unwrap(), 3);
}

#[tokio::test]
#[serial]
async fn test_invalid_stays_are_rejected() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (_hotel_id, room_id) = app.hotel_with_room(&token, 80.0).await;

    let (status, body) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 6, 4), date(2030, 6, 4)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let mut crowded = reservation_body(room_id, date(2030, 6, 1), date(2030, 6, 3));
    crowded["guests"] = json!(3);
    let (status, body) = app.post("/reservations", &token, crowded).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert!(body["message"].as_str().unwrap().contains("sleeps 2"));
}

#[tokio::test]
#[serial]
async fn test_partners_only_see_their_own_hotels() {
    let app = app_or_skip!();
    let (_owner, owner_token) = app.user(Role::Partner).await;
    let (_other, other_token) = app.user(Role::Partner).await;
    let (_admin, admin_token) = app.user(Role::Admin).await;

    let (hotel_id, room_id) = app.hotel_with_room(&owner_token, 120.0).await;
    let (status, reservation) = app
        .post("/reservations", &owner_token, reservation_body(room_id, date(2030, 7, 1), date(2030, 7, 3)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let reservation_id = reservation["id"].as_i64().unwrap();

    let (status, _) = app.get(&format!("/hotels/{}", hotel_id), &other_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/reservations/{}", reservation_id), &other_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/rooms/{}", room_id), &other_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, page) = app.get("/reservations", &other_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);

    let (status, page) = app.get("/hotels?per_page=5", &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["per_page"], 5);

    // partners cannot delete hotels, even their own
    let (status, body) = app.delete(&format!("/hotels/{}", hotel_id), &owner_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);
}

#[tokio::test]
#[serial]
async fn test_reservation_detail_tracks_payments_and_notes() {
    let app = app_or_skip!();
    let (partner, token) = app.user(Role::Partner).await;
    let (_hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;

    let (_, reservation) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 8, 10), date(2030, 8, 13)))
        .await;
    let id = reservation["id"].as_i64().unwrap();

    let (status, payment) = app
        .post(
            &format!("/reservations/{}/payments", id),
            &token,
            json!({ "amount": 120.0, "method": "card", "status": "completed" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", payment);
    assert!(payment["paid_at"].is_string());

    let (status, _) = app
        .post(
            &format!("/reservations/{}/notes", id),
            &token,
            json!({ "body": "Late arrival, keep the room" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .put(&format!("/reservations/{}/status", id), &token, json!({ "status": "checked_in" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, detail) = app.get(&format!("/reservations/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK, "{}", detail);
    assert_eq!(detail["nights"], 3);
    assert_eq!(detail["hotel_name"], "Casa do Rio");
    assert_eq!(detail["room_number"], "101");
    assert_eq!(detail["payment_summary"]["total_paid"].as_f64(), Some(120.0));
    assert_eq!(detail["payment_summary"]["balance_due"].as_f64(), Some(180.0));
    assert_eq!(detail["journey"]["cancelled"], false);
    assert_eq!(detail["notes"][0]["author_name"], json!(partner.full_name));
}

#[tokio::test]
#[serial]
async fn test_changing_dates_reprices_the_stay() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (_hotel_id, room_id) = app.hotel_with_room(&token, 90.0).await;

    let (_, reservation) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 9, 1), date(2030, 9, 3)))
        .await;
    let id = reservation["id"].as_i64().unwrap();

    let (status, updated) = app
        .patch(&format!("/reservations/{}", id), &token, json!({ "check_out": "2030-09-05" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["total_amount"].as_f64(), Some(360.0));
}

#[tokio::test]
#[serial]
async fn test_dashboard_counts_within_scope() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (_other, other_token) = app.user(Role::Partner).await;
    let (_hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;

    app.post("/reservations", &token, reservation_body(room_id, date(2030, 10, 1), date(2030, 10, 2)))
        .await;

    let (status, summary) = app.get("/dashboard", &token).await;
    assert_eq!(status, StatusCode::OK, "{}", summary);
    assert_eq!(summary["hotels"], 1);
    assert_eq!(summary["rooms"], 1);
    assert_eq!(summary["reservations"], 1);
    assert_eq!(summary["revenue"]["booked"].as_f64(), Some(100.0));

    let (_, summary) = app.get("/dashboard", &other_token).await;
    assert_eq!(summary["hotels"], 0);
    assert_eq!(summary["occupancy"]["percent"].as_f64(), Some(0.0));
}

#[tokio::test]
#[serial]
async fn test_admin_manages_users_through_auth_service() {
    let app = app_or_skip!();
    let (admin, admin_token) = app.user(Role::Admin).await;
    let (_partner, partner_token) = app.user(Role::Partner).await;

    let new_id = Uuid::new_v4();
    app.auth_mock.mock_create_user(new_id).await;

    let (status, body) = app
        .post("/users", &partner_token, json!({ "email": "x@example.com", "full_name": "X", "role": "partner" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{}", body);

    let (status, created) = app
        .post(
            "/users",
            &admin_token,
            json!({ "email": "New.Partner@Example.com", "full_name": "New Partner", "role": "partner" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["id"], json!(new_id));
    assert_eq!(created["email"], "new.partner@example.com");

    let (status, body) = app.delete(&format!("/users/{}", admin.id), &admin_token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    app.auth_mock.mock_delete_user(new_id, 200).await;
    let (status, _) = app.delete(&format!("/users/{}", new_id), &admin_token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/users/{}", new_id), &admin_token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn test_me_reflects_own_profile() {
    let app = app_or_skip!();
    let (partner, token) = app.user(Role::Partner).await;

    let (status, me) = app.get("/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], json!(partner.id));
    assert_eq!(me["role"], "partner");

    let (status, updated) = app.patch("/me", &token, json!({ "phone": "+351 912 345 678" })).await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["phone"], "+351 912 345 678");
}

#[tokio::test]
#[serial]
async fn test_reservation_list_filters() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;
    let (status, second_room) = app
        .post(&format!("/hotels/{}/rooms", hotel_id), &token, room_body("102", 2, 100.0))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let second_room_id = second_room["id"].as_i64().unwrap();

    let mut ines = reservation_body(room_id, date(2030, 3, 1), date(2030, 3, 4));
    ines["guest_name"] = json!("Ines Albuquerque");
    ines["guest_phone"] = json!("+351 911 000 111");
    let (_, ines) = app.post("/reservations", &token, ines).await;

    let mut confirmed = reservation_body(room_id, date(2030, 3, 10), date(2030, 3, 12));
    confirmed["status"] = json!("confirmed");
    let (_, confirmed) = app.post("/reservations", &token, confirmed).await;

    let (_, other_room) = app
        .post("/reservations", &token, reservation_body(second_room_id, date(2030, 4, 1), date(2030, 4, 2)))
        .await;

    let (status, page) = app.get("/reservations?search=albuquer", &token).await;
    assert_eq!(status, StatusCode::OK, "{}", page);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], ines["id"]);

    let (_, page) = app.get("/reservations?search=911%20000", &token).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], ines["id"]);

    let (_, page) = app.get("/reservations?status=confirmed", &token).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], confirmed["id"]);

    let (_, page) = app.get(&format!("/reservations?room_id={}", second_room_id), &token).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], other_room["id"]);
    assert_eq!(page["items"][0]["room_number"], "102");

    let (_, page) = app.get(&format!("/reservations?hotel_id={}&per_page=2", hotel_id), &token).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    // latest check-in first
    assert_eq!(page["items"][0]["id"], other_room["id"]);

    // stays overlapping [2030-03-03, 2030-03-11)
    let (_, page) = app.get("/reservations?from=2030-03-03&to=2030-03-11", &token).await;
    assert_eq!(page["total"], 2);

    // a stay ending on `from` does not overlap
    let (_, page) = app.get("/reservations?from=2030-03-04&to=2030-03-10", &token).await;
    assert_eq!(page["total"], 0);

    let (status, body) = app.get("/reservations?from=2030-03-10&to=2030-03-01", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
}

#[tokio::test]
#[serial]
async fn test_occupancy_counts_confirmed_and_checked_in_stays() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;
    let (_, second_room) = app
        .post(&format!("/hotels/{}/rooms", hotel_id), &token, room_body("102", 2, 100.0))
        .await;
    let second_room_id = second_room["id"].as_i64().unwrap();

    let today = chrono::Utc::now().date_naive();
    let mut staying = reservation_body(room_id, today, today + chrono::Duration::days(2));
    staying["status"] = json!("confirmed");
    let (status, body) = app.post("/reservations", &token, staying).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    // pending stays do not occupy a room
    app.post(
        "/reservations",
        &token,
        reservation_body(second_room_id, today, today + chrono::Duration::days(1)),
    )
    .await;

    let (status, summary) = app.get("/dashboard", &token).await;
    assert_eq!(status, StatusCode::OK, "{}", summary);
    assert_eq!(summary["occupancy"]["total_rooms"], 2);
    assert_eq!(summary["occupancy"]["occupied_rooms"], 1);
    assert_eq!(summary["occupancy"]["percent"].as_f64(), Some(50.0));
    assert_eq!(summary["arrivals_today"], 2);

    let mut later = reservation_body(second_room_id, date(2030, 5, 1), date(2030, 5, 3));
    later["status"] = json!("checked_in");
    app.post("/reservations", &token, later).await;

    let (status, rows) = app.get("/dashboard/occupancy?date=2030-05-02", &token).await;
    assert_eq!(status, StatusCode::OK, "{}", rows);
    assert_eq!(rows[0]["hotel_id"].as_i64(), Some(hotel_id));
    assert_eq!(rows[0]["date"], "2030-05-02");
    assert_eq!(rows[0]["occupied_rooms"], 1);
    assert_eq!(rows[0]["percent"].as_f64(), Some(50.0));

    // departure day is free again
    let (_, rows) = app.get("/dashboard/occupancy?date=2030-05-03", &token).await;
    assert_eq!(rows[0]["occupied_rooms"], 0);

    let (status, _) = app.get("/dashboard/occupancy?date=not-a-date", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn test_moving_dates_onto_another_booking_conflicts() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (_hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;

    app.post("/reservations", &token, reservation_body(room_id, date(2030, 11, 1), date(2030, 11, 4)))
        .await;
    let (_, movable) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 11, 10), date(2030, 11, 12)))
        .await;
    let id = movable["id"].as_i64().unwrap();

    let (status, body) = app
        .patch(&format!("/reservations/{}", id), &token, json!({ "check_in": "2030-11-03" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    // moving within its own nights is not a clash with itself
    let (status, body) = app
        .patch(&format!("/reservations/{}", id), &token, json!({ "check_in": "2030-11-04" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["total_amount"].as_f64(), Some(800.0));
}

#[tokio::test]
#[serial]
async fn test_reviving_cancelled_booking_checks_the_room() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (_hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;

    let (_, first) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 12, 1), date(2030, 12, 4)))
        .await;
    let first_id = first["id"].as_i64().unwrap();

    let (status, _) = app
        .put(&format!("/reservations/{}/status", first_id), &token, json!({ "status": "cancelled" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 12, 2), date(2030, 12, 5)))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .put(&format!("/reservations/{}/status", first_id), &token, json!({ "status": "confirmed" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);

    let (_, detail) = app.get(&format!("/reservations/{}", first_id), &token).await;
    assert_eq!(detail["status"], "cancelled");
}

#[tokio::test]
#[serial]
async fn test_completing_payment_stamps_paid_at() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (_other, other_token) = app.user(Role::Partner).await;
    let (_hotel_id, room_id) = app.hotel_with_room(&token, 100.0).await;

    let (_, reservation) = app
        .post("/reservations", &token, reservation_body(room_id, date(2030, 2, 1), date(2030, 2, 3)))
        .await;
    let reservation_id = reservation["id"].as_i64().unwrap();

    let (status, payment) = app
        .post(
            &format!("/reservations/{}/payments", reservation_id),
            &token,
            json!({ "amount": 200.0, "method": "transfer" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", payment);
    assert_eq!(payment["status"], "pending");
    assert!(payment["paid_at"].is_null());
    let payment_id = payment["id"].as_i64().unwrap();

    let (status, _) = app
        .put(&format!("/payments/{}/status", payment_id), &other_token, json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, completed) = app
        .put(&format!("/payments/{}/status", payment_id), &token, json!({ "status": "completed" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", completed);
    assert_eq!(completed["status"], "completed");
    assert!(completed["paid_at"].is_string());

    let (_, detail) = app.get(&format!("/reservations/{}", reservation_id), &token).await;
    assert_eq!(detail["payment_summary"]["balance_due"].as_f64(), Some(0.0));
}

#[tokio::test]
#[serial]
async fn test_hotel_update_rejects_blank_fields() {
    let app = app_or_skip!();
    let (_partner, token) = app.user(Role::Partner).await;
    let (hotel_id, _room_id) = app.hotel_with_room(&token, 100.0).await;

    let (status, body) = app
        .patch(&format!("/hotels/{}", hotel_id), &token, json!({ "city": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (_, hotel) = app.get(&format!("/hotels/{}", hotel_id), &token).await;
    assert_eq!(hotel["city"], "Porto");
}
