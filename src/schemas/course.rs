use serde::{Deserialize, Serialize};

use crate::core::time::format_utc;
use crate::db::models::{Course, Duration, Lecture, RatingEntry};
use crate::db::types::{CourseType, PricingType};
use crate::repositories::courses::CourseFilter;
use crate::services::image_urls::{resolve_image_url, RequestOrigin};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CourseListQuery {
    #[serde(default)]
    pub(crate) home: Option<String>,
    #[serde(default, rename = "type")]
    pub(crate) course_type: Option<String>,
    #[serde(default)]
    pub(crate) limit: Option<String>,
}

impl CourseListQuery {
    /// `type=regular` narrows the listing. `type=top` is accepted but does not narrow it.
    /// `home=true` caps the listing at `home_limit` unless an explicit `limit` is given.
    pub(crate) fn to_filter(&self, home_limit: i64) -> CourseFilter {
        let home = self.home.as_deref().map(str::trim) == Some("true");

        let course_type = match self.course_type.as_deref().map(str::trim) {
            Some(kind) if kind.eq_ignore_ascii_case("regular") => Some(CourseType::Regular),
            _ => None,
        };

        let explicit_limit = self
            .limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0);

        let limit = if home { Some(explicit_limit.unwrap_or(home_limit)) } else { explicit_limit };

        CourseFilter { course_type, limit }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RateCourseRequest {
    #[serde(default)]
    pub(crate) rating: serde_json::Value,
    #[serde(default)]
    pub(crate) comment: serde_json::Value,
}

impl RateCourseRequest {
    /// Non-string comments are treated as absent.
    pub(crate) fn comment_text(&self) -> &str {
        self.comment.as_str().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct PriceResponse {
    pub(crate) original: f64,
    pub(crate) sale: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) teacher: String,
    pub(crate) image: String,
    pub(crate) pricing_type: PricingType,
    pub(crate) price: PriceResponse,
    pub(crate) overview: String,
    pub(crate) lectures: Vec<Lecture>,
    pub(crate) total_duration: Duration,
    pub(crate) total_lectures: i32,
    pub(crate) course_type: CourseType,
    pub(crate) category: Option<String>,
    pub(crate) created_by: Option<String>,
    pub(crate) ratings: Vec<RatingEntry>,
    pub(crate) avg_rating: f64,
    pub(crate) total_ratings: i32,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course, origin: &RequestOrigin) -> Self {
        Self {
            image: resolve_image_url(&course.image, origin),
            id: course.id,
            name: course.name,
            teacher: course.teacher,
            pricing_type: course.pricing_type,
            price: PriceResponse { original: course.price_original, sale: course.price_sale },
            overview: course.overview,
            lectures: course.lectures.0,
            total_duration: Duration {
                hours: course.total_duration_hours,
                minutes: i64::from(course.total_duration_minutes),
            },
            total_lectures: course.total_lectures,
            course_type: course.course_type,
            category: course.category,
            created_by: course.created_by,
            ratings: course.ratings.0,
            avg_rating: course.avg_rating,
            total_ratings: course.total_ratings,
            created_at: format_utc(course.created_at),
            updated_at: format_utc(course.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PublicCoursesResponse {
    pub(crate) success: bool,
    pub(crate) items: Vec<CourseResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CoursesResponse {
    pub(crate) success: bool,
    pub(crate) courses: Vec<CourseResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseEnvelope {
    pub(crate) success: bool,
    pub(crate) course: CourseResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubmittedRating {
    pub(crate) user_id: String,
    pub(crate) rating: u8,
}

/// The recomputed aggregate always travels with the caller's rating; clients should
/// replace any locally cached aggregate with these values.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RateCourseResponse {
    pub(crate) success: bool,
    pub(crate) avg_rating: f64,
    pub(crate) total_ratings: i32,
    pub(crate) my_rating: SubmittedRating,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MyRatingResponse {
    pub(crate) success: bool,
    pub(crate) my_rating: Option<RatingEntry>,
    pub(crate) avg_rating: f64,
    pub(crate) total_ratings: i32,
}
