use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::extract::ApiJson;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::core::metrics;
use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::repositories;
use crate::schemas::booking::{
    BookingCheckResponse, BookingCreate, BookingEnvelope, BookingListResponse, BookingResponse,
    BookingStatsEnvelope, ConfirmBookingQuery, CourseIdQuery,
};
use crate::services::bookings;

#[cfg(test)]
mod tests;

const ALREADY_BOOKED: &str = "You have already booked this course";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings))
        .route("/create", post(create_booking))
        .route("/check", get(check_booking))
        .route("/my", get(my_bookings))
        .route("/confirm", get(confirm_booking))
        .route("/stats", get(booking_stats))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

async fn create_booking(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(mut payload): ApiJson<BookingCreate>,
) -> Result<(StatusCode, Json<BookingEnvelope>), ApiError> {
    payload.course_id = payload.course_id.trim().to_string();
    payload.email = non_blank(payload.email);
    payload.student_name = non_blank(payload.student_name);
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let course = repositories::courses::find_by_id(state.db(), &payload.course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    let existing =
        repositories::bookings::find_for_user_course(state.db(), &user.id, &course.id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing booking"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(ALREADY_BOOKED.to_string()));
    }

    let now = now_utc();
    let price = bookings::booking_price(&course);
    let status = bookings::initial_status(price, now);

    let booking = repositories::bookings::create(
        state.db(),
        repositories::bookings::CreateBooking {
            id: &Uuid::new_v4().to_string(),
            course_id: &course.id,
            course_name: &course.name,
            teacher_name: &course.teacher,
            user_id: &user.id,
            student_name: payload.student_name.as_deref().unwrap_or(""),
            email: payload.email.as_deref().unwrap_or(""),
            price,
            payment_status: status.payment_status,
            order_status: status.order_status,
            paid_at: status.paid_at,
            created_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::from_persistence(e, "Failed to create booking"))?
    // Lost a race with a concurrent request from the same user.
    .ok_or_else(|| ApiError::Conflict(ALREADY_BOOKED.to_string()))?;

    metrics::record_booking(booking.payment_status.as_str());
    tracing::info!(
        booking_id = %booking.id,
        course_id = %booking.course_id,
        user_id = %booking.user_id,
        price = booking.price,
        payment_status = booking.payment_status.as_str(),
        "Booking created"
    );

    Ok((
        StatusCode::CREATED,
        Json(BookingEnvelope { success: true, booking: BookingResponse::from_db(booking) }),
    ))
}

async fn check_booking(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<CourseIdQuery>,
) -> Result<Json<BookingCheckResponse>, ApiError> {
    let course_id = non_blank(query.course_id)
        .ok_or_else(|| ApiError::BadRequest("courseId is required".to_string()))?;

    let booking = repositories::bookings::find_for_user_course(state.db(), &user.id, &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check booking"))?;

    let enrolled = booking.as_ref().is_some_and(bookings::is_enrolled);
    Ok(Json(BookingCheckResponse {
        success: true,
        booking: booking.map(BookingResponse::from_db),
        enrolled,
    }))
}

async fn my_bookings(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let bookings = repositories::bookings::list_for_user(state.db(), &user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list bookings"))?;

    Ok(Json(BookingListResponse {
        success: true,
        bookings: bookings.into_iter().map(BookingResponse::from_db).collect(),
    }))
}

async fn confirm_booking(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<ConfirmBookingQuery>,
) -> Result<Json<BookingEnvelope>, ApiError> {
    let booking_id = non_blank(query.booking_id)
        .ok_or_else(|| ApiError::BadRequest("bookingId is required".to_string()))?;

    let booking = repositories::bookings::mark_paid(state.db(), &booking_id, now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to confirm booking"))?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    tracing::info!(booking_id = %booking.id, admin_id = %admin.id, "Booking confirmed");
    Ok(Json(BookingEnvelope { success: true, booking: BookingResponse::from_db(booking) }))
}

async fn list_bookings(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<CourseIdQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let course_id = non_blank(query.course_id);
    let bookings = repositories::bookings::list(state.db(), course_id.as_deref())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list bookings"))?;

    Ok(Json(BookingListResponse {
        success: true,
        bookings: bookings.into_iter().map(BookingResponse::from_db).collect(),
    }))
}

async fn booking_stats(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<BookingStatsEnvelope>, ApiError> {
    let stats = repositories::bookings::stats(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to compute booking stats"))?;

    Ok(Json(BookingStatsEnvelope { success: true, stats: stats.into() }))
}
