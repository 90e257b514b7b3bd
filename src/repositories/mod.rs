pub(crate) mod bookings;
pub(crate) mod courses;
pub(crate) mod health;
