use time::OffsetDateTime;

use crate::db::models::{Booking, Course};
use crate::db::types::{OrderStatus, PaymentStatus, PricingType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BookingStatus {
    pub(crate) payment_status: PaymentStatus,
    pub(crate) order_status: OrderStatus,
    pub(crate) paid_at: Option<OffsetDateTime>,
}

/// What the student owes: the sale price when one is set, otherwise the original price.
/// Free courses cost nothing whatever prices they carry.
pub(crate) fn booking_price(course: &Course) -> f64 {
    if course.pricing_type == PricingType::Free {
        return 0.0;
    }

    if course.price_sale > 0.0 {
        course.price_sale
    } else {
        course.price_original.max(0.0)
    }
}

/// Nothing to pay means the enrolment is confirmed on the spot.
pub(crate) fn initial_status(price: f64, now: OffsetDateTime) -> BookingStatus {
    if price > 0.0 {
        BookingStatus {
            payment_status: PaymentStatus::Unpaid,
            order_status: OrderStatus::Pending,
            paid_at: None,
        }
    } else {
        paid_status(now)
    }
}

fn paid_status(now: OffsetDateTime) -> BookingStatus {
    BookingStatus {
        payment_status: PaymentStatus::Paid,
        order_status: OrderStatus::Confirmed,
        paid_at: Some(now),
    }
}

pub(crate) fn is_enrolled(booking: &Booking) -> bool {
    booking.payment_status == PaymentStatus::Paid
        || booking.order_status == OrderStatus::Confirmed
        || booking.paid_at.is_some()
}
