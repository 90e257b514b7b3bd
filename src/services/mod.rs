pub(crate) mod bookings;
pub(crate) mod course_normalizer;
pub(crate) mod image_urls;
pub(crate) mod ratings;
pub(crate) mod uploads;
