use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_utc;
use crate::db::models::{Booking, BookingStats};
use crate::db::types::{OrderStatus, PaymentStatus};

/// Course name, teacher and price are taken from the stored course, not the client.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookingCreate {
    #[serde(default)]
    #[validate(length(min = 1, message = "courseId is required"))]
    pub(crate) course_id: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub(crate) student_name: Option<String>,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub(crate) email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CourseIdQuery {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmBookingQuery {
    #[serde(default, alias = "id")]
    pub(crate) booking_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookingResponse {
    pub(crate) id: String,
    pub(crate) course_id: String,
    pub(crate) course_name: String,
    pub(crate) teacher_name: String,
    pub(crate) user_id: String,
    pub(crate) student_name: String,
    pub(crate) email: String,
    pub(crate) price: f64,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) order_status: OrderStatus,
    pub(crate) paid_at: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl BookingResponse {
    pub(crate) fn from_db(booking: Booking) -> Self {
        Self {
            id: booking.id,
            course_id: booking.course_id,
            course_name: booking.course_name,
            teacher_name: booking.teacher_name,
            user_id: booking.user_id,
            student_name: booking.student_name,
            email: booking.email,
            price: booking.price,
            payment_status: booking.payment_status,
            order_status: booking.order_status,
            paid_at: booking.paid_at.map(format_utc),
            created_at: format_utc(booking.created_at),
            updated_at: format_utc(booking.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BookingEnvelope {
    pub(crate) success: bool,
    pub(crate) booking: BookingResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct BookingCheckResponse {
    pub(crate) success: bool,
    pub(crate) booking: Option<BookingResponse>,
    pub(crate) enrolled: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct BookingListResponse {
    pub(crate) success: bool,
    pub(crate) bookings: Vec<BookingResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BookingStatsResponse {
    pub(crate) total_bookings: i64,
    pub(crate) paid_bookings: i64,
    pub(crate) unpaid_bookings: i64,
    pub(crate) total_revenue: f64,
}

impl From<BookingStats> for BookingStatsResponse {
    fn from(stats: BookingStats) -> Self {
        Self {
            total_bookings: stats.total_bookings,
            paid_bookings: stats.paid_bookings,
            unpaid_bookings: stats.unpaid_bookings,
            total_revenue: stats.total_revenue,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BookingStatsEnvelope {
    pub(crate) success: bool,
    pub(crate) stats: BookingStatsResponse,
}
