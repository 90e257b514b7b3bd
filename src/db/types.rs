use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "pricingtype", rename_all = "lowercase")]
pub(crate) enum PricingType {
    #[default]
    Free,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "coursetype", rename_all = "lowercase")]
pub(crate) enum CourseType {
    Top,
    #[default]
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "PascalCase")]
#[sqlx(type_name = "paymentstatus", rename_all = "lowercase")]
pub(crate) enum PaymentStatus {
    Unpaid,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "PascalCase")]
#[sqlx(type_name = "orderstatus", rename_all = "lowercase")]
pub(crate) enum OrderStatus {
    Pending,
    Confirmed,
}

impl PricingType {
    /// Anything other than `paid` (case-insensitive) is a free course.
    pub(crate) fn from_loose(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("paid") {
            Self::Paid
        } else {
            Self::Free
        }
    }
}

impl CourseType {
    pub(crate) fn from_loose(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("top") {
            Self::Top
        } else {
            Self::Regular
        }
    }
}

impl PaymentStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}
