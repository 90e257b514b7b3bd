pub(crate) mod bookings;
pub(crate) mod courses;
pub(crate) mod errors;
pub(crate) mod extract;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod origin;
pub(crate) mod router;
pub(crate) mod validation;
