use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::types::{CourseType, OrderStatus, PaymentStatus, PricingType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Duration {
    pub(crate) hours: i64,
    pub(crate) minutes: i64,
}

impl Duration {
    pub(crate) fn total_minutes(self) -> i64 {
        self.hours * 60 + self.minutes
    }

    pub(crate) fn from_minutes(total: i64) -> Self {
        Self { hours: total / 60, minutes: total % 60 }
    }
}

/// Chapters and lectures live only inside a course document's `lectures` column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Chapter {
    pub(crate) name: String,
    pub(crate) topic: String,
    pub(crate) video_url: String,
    pub(crate) duration: Duration,
    pub(crate) total_minutes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Lecture {
    pub(crate) title: String,
    pub(crate) duration: Duration,
    pub(crate) chapters: Vec<Chapter>,
    pub(crate) total_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RatingEntry {
    pub(crate) user_id: String,
    pub(crate) rating: u8,
    #[serde(default)]
    pub(crate) comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) teacher: String,
    pub(crate) image: String,
    pub(crate) pricing_type: PricingType,
    pub(crate) price_original: f64,
    pub(crate) price_sale: f64,
    pub(crate) overview: String,
    pub(crate) lectures: Json<Vec<Lecture>>,
    pub(crate) total_duration_hours: i64,
    pub(crate) total_duration_minutes: i32,
    pub(crate) total_lectures: i32,
    pub(crate) course_type: CourseType,
    pub(crate) category: Option<String>,
    pub(crate) created_by: Option<String>,
    pub(crate) ratings: Json<Vec<RatingEntry>>,
    pub(crate) avg_rating: f64,
    pub(crate) total_ratings: i32,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Booking {
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
    pub(crate) paid_at: Option<OffsetDateTime>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Default, FromRow)]
pub(crate) struct BookingStats {
    pub(crate) total_bookings: i64,
    pub(crate) paid_bookings: i64,
    pub(crate) unpaid_bookings: i64,
    pub(crate) total_revenue: f64,
}
