use sqlx::types::Json;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::{Course, Lecture, RatingEntry};
use crate::db::types::{CourseType, PricingType};

const COURSE_COLUMNS: &str = "id, name, teacher, image, pricing_type, price_original, price_sale, \
     overview, lectures, total_duration_hours, total_duration_minutes, total_lectures, \
     course_type, category, created_by, ratings, avg_rating, total_ratings, created_at, updated_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) teacher: &'a str,
    pub(crate) image: &'a str,
    pub(crate) pricing_type: PricingType,
    pub(crate) price_original: f64,
    pub(crate) price_sale: f64,
    pub(crate) overview: &'a str,
    pub(crate) lectures: &'a [Lecture],
    pub(crate) total_duration_hours: i64,
    pub(crate) total_duration_minutes: i32,
    pub(crate) total_lectures: i32,
    pub(crate) course_type: CourseType,
    pub(crate) category: Option<&'a str>,
    pub(crate) created_by: Option<&'a str>,
    pub(crate) created_at: OffsetDateTime,
}

/// Listing filter. `course_type: None` lists every course; `limit: None` is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct CourseFilter {
    pub(crate) course_type: Option<CourseType>,
    pub(crate) limit: Option<i64>,
}

pub(crate) struct UpdateRatings<'a> {
    pub(crate) ratings: &'a [RatingEntry],
    pub(crate) avg_rating: f64,
    pub(crate) total_ratings: i32,
    pub(crate) updated_at: OffsetDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, name, teacher, image, pricing_type, price_original, price_sale, overview,
            lectures, total_duration_hours, total_duration_minutes, total_lectures,
            course_type, category, created_by, ratings, avg_rating, total_ratings,
            created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14,$15,'[]'::jsonb,0,0,$16,$16)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.teacher)
    .bind(params.image)
    .bind(params.pricing_type)
    .bind(params.price_original)
    .bind(params.price_sale)
    .bind(params.overview)
    .bind(Json(params.lectures))
    .bind(params.total_duration_hours)
    .bind(params.total_duration_minutes)
    .bind(params.total_lectures)
    .bind(params.course_type)
    .bind(params.category)
    .bind(params.created_by)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool, filter: CourseFilter) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS}
         FROM courses
         WHERE ($1::coursetype IS NULL OR course_type = $1)
         ORDER BY created_at DESC, id
         LIMIT $2",
    ))
    .bind(filter.course_type)
    .bind(filter.limit)
    .fetch_all(pool)
    .await
}

/// Writes back a recomputed rating set. `None` when the course vanished in between.
pub(crate) async fn update_ratings(
    pool: &PgPool,
    course_id: &str,
    params: UpdateRatings<'_>,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "UPDATE courses
         SET ratings = $2, avg_rating = $3, total_ratings = $4, updated_at = $5
         WHERE id = $1
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(course_id)
    .bind(Json(params.ratings))
    .bind(params.avg_rating)
    .bind(params.total_ratings)
    .bind(params.updated_at)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, course_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1").bind(course_id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
