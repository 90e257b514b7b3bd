use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::models::Course;
use crate::test_support;

async fn paid_course(ctx: &test_support::TestContext) -> Course {
    test_support::insert_course(
        ctx.state.db(),
        json!({
            "name": "Guitar 101",
            "teacher": "Jimi",
            "pricingType": "paid",
            "price": { "original": 100, "sale": 75 }
        }),
    )
    .await
}

async fn free_course(ctx: &test_support::TestContext) -> Course {
    test_support::insert_course(
        ctx.state.db(),
        json!({ "name": "Open Lecture", "teacher": "Ada", "price": { "original": 50 } }),
    )
    .await
}

fn create_request(token: &str, body: serde_json::Value) -> axum::http::Request<axum::body::Body> {
    test_support::json_request(Method::POST, "/api/booking/create", Some(token), Some(body))
}

#[tokio::test]
async fn paid_booking_starts_unpaid_with_server_price() {
    let ctx = test_support::setup_test_context().await;
    let course = paid_course(&ctx).await;
    let token = test_support::bearer_token("student-1", ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(create_request(
            &token,
            json!({
                "courseId": &course.id,
                "studentName": "Sam",
                "email": "sam@example.com",
                "price": 1
            }),
        ))
        .await
        .expect("create booking");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");

    let booking = &body["booking"];
    assert_eq!(booking["price"], 75.0);
    assert_eq!(booking["courseName"], "Guitar 101");
    assert_eq!(booking["teacherName"], "Jimi");
    assert_eq!(booking["userId"], "student-1");
    assert_eq!(booking["paymentStatus"], "Unpaid");
    assert_eq!(booking["orderStatus"], "Pending");
    assert!(booking["paidAt"].is_null());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/booking/check?courseId={}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("check booking");
    let body = test_support::read_json(response).await;
    assert_eq!(body["enrolled"], false);
    assert_eq!(body["booking"]["courseId"], course.id.as_str());
}

#[tokio::test]
async fn free_booking_is_confirmed_immediately() {
    let ctx = test_support::setup_test_context().await;
    let course = free_course(&ctx).await;
    let token = test_support::bearer_token("student-1", ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(create_request(&token, json!({ "courseId": &course.id, "email": "" })))
        .await
        .expect("create booking");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["booking"]["price"], 0.0);
    assert_eq!(body["booking"]["paymentStatus"], "Paid");
    assert_eq!(body["booking"]["orderStatus"], "Confirmed");
    assert!(body["booking"]["paidAt"].is_string());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/booking/check?courseId={}", course.id),
            Some(&token),
            None,
        ))
        .await
        .expect("check booking");
    let body = test_support::read_json(response).await;
    assert_eq!(body["enrolled"], true);
}

#[tokio::test]
async fn duplicate_booking_conflicts() {
    let ctx = test_support::setup_test_context().await;
    let course = paid_course(&ctx).await;
    let token = test_support::bearer_token("student-1", ctx.state.settings());

    let first = ctx
        .app
        .clone()
        .oneshot(create_request(&token, json!({ "courseId": &course.id })))
        .await
        .expect("first booking");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = ctx
        .app
        .clone()
        .oneshot(create_request(&token, json!({ "courseId": &course.id })))
        .await
        .expect("second booking");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = test_support::read_json(second).await;
    assert_eq!(body["message"], "You have already booked this course");
}

#[tokio::test]
async fn booking_validation_and_missing_course() {
    let ctx = test_support::setup_test_context().await;
    let course = paid_course(&ctx).await;
    let token = test_support::bearer_token("student-1", ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(create_request(&token, json!({ "courseId": &course.id, "email": "nope" })))
        .await
        .expect("bad email");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .clone()
        .oneshot(create_request(&token, json!({ "courseId": "missing" })))
        .await
        .expect("missing course");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/booking/create",
            None,
            Some(json!({ "courseId": &course.id })),
        ))
        .await
        .expect("anonymous booking");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_confirms_booking_and_sees_stats() {
    let ctx = test_support::setup_test_context().await;
    let paid = paid_course(&ctx).await;
    let free = free_course(&ctx).await;
    let student = test_support::bearer_token("student-1", ctx.state.settings());
    let other = test_support::bearer_token("student-2", ctx.state.settings());
    let admin = test_support::admin_token("admin-1", ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(create_request(&student, json!({ "courseId": &paid.id })))
        .await
        .expect("paid booking");
    let created = test_support::read_json(response).await;
    let booking_id = created["booking"]["id"].as_str().expect("booking id").to_string();

    ctx.app
        .clone()
        .oneshot(create_request(&other, json!({ "courseId": &paid.id })))
        .await
        .expect("second paid booking");
    ctx.app
        .clone()
        .oneshot(create_request(&student, json!({ "courseId": &free.id })))
        .await
        .expect("free booking");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/booking/confirm?bookingId={booking_id}"),
            Some(&student),
            None,
        ))
        .await
        .expect("student confirm");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/booking/confirm?bookingId={booking_id}"),
            Some(&admin),
            None,
        ))
        .await
        .expect("admin confirm");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["booking"]["paymentStatus"], "Paid");
    assert_eq!(body["booking"]["orderStatus"], "Confirmed");
    let paid_at = body["booking"]["paidAt"].clone();
    assert!(paid_at.is_string());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/booking/confirm?bookingId={booking_id}"),
            Some(&admin),
            None,
        ))
        .await
        .expect("confirm again");
    let body = test_support::read_json(response).await;
    assert_eq!(body["booking"]["paidAt"], paid_at);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/booking/confirm?bookingId=missing",
            Some(&admin),
            None,
        ))
        .await
        .expect("confirm missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/booking/stats", Some(&admin), None))
        .await
        .expect("stats");
    let body = test_support::read_json(response).await;
    assert_eq!(body["stats"]["totalBookings"], 3);
    assert_eq!(body["stats"]["paidBookings"], 2);
    assert_eq!(body["stats"]["unpaidBookings"], 1);
    assert_eq!(body["stats"]["totalRevenue"], 75.0);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/booking?courseId={}", paid.id),
            Some(&admin),
            None,
        ))
        .await
        .expect("list by course");
    let body = test_support::read_json(response).await;
    assert_eq!(body["bookings"].as_array().unwrap().len(), 2);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/booking/my", Some(&student), None))
        .await
        .expect("my bookings");
    let body = test_support::read_json(response).await;
    let mine = body["bookings"].as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|booking| booking["userId"] == "student-1"));
}

#[tokio::test]
async fn malformed_booking_body_uses_error_envelope() {
    let ctx = test_support::setup_test_context().await;
    let token = test_support::bearer_token("student-1", ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::raw_json_request("/api/booking/create", Some(&token), "not json"))
        .await
        .expect("create with malformed body");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], 400);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::raw_json_request(
            "/api/booking/create",
            Some(&token),
            r#"{"courseId": 42}"#,
        ))
        .await
        .expect("create with mistyped body");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], false);
}
