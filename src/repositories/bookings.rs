use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::{Booking, BookingStats};
use crate::db::types::{OrderStatus, PaymentStatus};

const BOOKING_COLUMNS: &str = "id, course_id, course_name, teacher_name, user_id, student_name, \
     email, price, payment_status, order_status, paid_at, created_at, updated_at";

pub(crate) struct CreateBooking<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) course_name: &'a str,
    pub(crate) teacher_name: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) student_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) price: f64,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) order_status: OrderStatus,
    pub(crate) paid_at: Option<OffsetDateTime>,
    pub(crate) created_at: OffsetDateTime,
}

/// Inserts a booking; `None` when the user already holds one for the course.
pub(crate) async fn create(
    pool: &PgPool,
    params: CreateBooking<'_>,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "INSERT INTO bookings (
            id, course_id, course_name, teacher_name, user_id, student_name, email, price,
            payment_status, order_status, paid_at, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$12)
         ON CONFLICT (user_id, course_id) DO NOTHING
         RETURNING {BOOKING_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.course_name)
    .bind(params.teacher_name)
    .bind(params.user_id)
    .bind(params.student_name)
    .bind(params.email)
    .bind(params.price)
    .bind(params.payment_status)
    .bind(params.order_status)
    .bind(params.paid_at)
    .bind(params.created_at)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_for_user_course(
    pool: &PgPool,
    user_id: &str,
    course_id: &str,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 AND course_id = $2",
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    course_id: Option<&str>,
) -> Result<Vec<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS}
         FROM bookings
         WHERE ($1::text IS NULL OR course_id = $1)
         ORDER BY created_at DESC, id",
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

/// Marks a booking paid and confirmed. An already-paid booking keeps its original `paid_at`.
pub(crate) async fn mark_paid(
    pool: &PgPool,
    booking_id: &str,
    paid_at: OffsetDateTime,
) -> Result<Option<Booking>, sqlx::Error> {
    sqlx::query_as::<_, Booking>(&format!(
        "UPDATE bookings
         SET payment_status = $2,
             order_status = $3,
             paid_at = COALESCE(paid_at, $4),
             updated_at = $4
         WHERE id = $1
         RETURNING {BOOKING_COLUMNS}",
    ))
    .bind(booking_id)
    .bind(PaymentStatus::Paid)
    .bind(OrderStatus::Confirmed)
    .bind(paid_at)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn stats(pool: &PgPool) -> Result<BookingStats, sqlx::Error> {
    sqlx::query_as::<_, BookingStats>(
        "SELECT
            COUNT(*) AS total_bookings,
            COUNT(*) FILTER (WHERE payment_status = 'paid') AS paid_bookings,
            COUNT(*) FILTER (WHERE payment_status = 'unpaid') AS unpaid_bookings,
            COALESCE(SUM(price) FILTER (WHERE payment_status = 'paid'), 0)::float8 AS total_revenue
         FROM bookings",
    )
    .fetch_one(pool)
    .await
}
