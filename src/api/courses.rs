use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::extract::ApiJson;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::origin::ClientOrigin;
use crate::api::validation::validate_image_upload;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::db::models::Course;
use crate::repositories;
use crate::schemas::course::{
    CourseEnvelope, CourseListQuery, CourseResponse, CoursesResponse, MyRatingResponse,
    PublicCoursesResponse, RateCourseRequest, RateCourseResponse, SubmittedRating,
};
use crate::schemas::MessageResponse;
use crate::services::course_normalizer;
use crate::services::ratings;

mod form;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/public", get(list_public_courses))
        .route("/:course_id", get(get_course).delete(delete_course))
        .route("/:course_id/rate", post(rate_course))
        .route("/:course_id/my-rating", get(my_rating))
        .route("/:course_id/rating", get(my_rating))
}

async fn fetch_course(state: &AppState, course_id: &str) -> Result<Course, ApiError> {
    repositories::courses::find_by_id(state.db(), course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))
}

async fn list_public_courses(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<PublicCoursesResponse>, ApiError> {
    let filter = query.to_filter(state.settings().api().home_courses_limit);
    let courses = repositories::courses::list(state.db(), filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list public courses"))?;

    let items = courses.into_iter().map(|course| CourseResponse::from_db(course, &origin)).collect();
    Ok(Json(PublicCoursesResponse { success: true, items }))
}

async fn list_courses(
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
) -> Result<Json<CoursesResponse>, ApiError> {
    let courses = repositories::courses::list(state.db(), Default::default())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list courses"))?;

    let courses =
        courses.into_iter().map(|course| CourseResponse::from_db(course, &origin)).collect();
    Ok(Json(CoursesResponse { success: true, courses }))
}

async fn get_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
) -> Result<Json<CourseEnvelope>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    Ok(Json(CourseEnvelope { success: true, course: CourseResponse::from_db(course, &origin) }))
}

async fn create_course(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    ClientOrigin(origin): ClientOrigin,
    request: Request,
) -> Result<(StatusCode, Json<CourseEnvelope>), ApiError> {
    let submission = form::read_submission(request, &state).await?;
    let mut raw = Value::Object(submission.fields);

    let stored_image = match submission.image {
        Some(upload) => {
            let storage = state.settings().storage();
            validate_image_upload(
                &upload.filename,
                &upload.content_type,
                &storage.allowed_image_extensions,
            )?;

            let stored = state
                .uploads()
                .save_course_image(&upload.filename, &upload.bytes)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to store course image"))?;
            metrics::record_upload(upload.bytes.len());
            Some(stored)
        }
        None => None,
    };

    if let Some(image) = &stored_image {
        raw["image"] = Value::String(image.clone());
    }

    let course = course_normalizer::normalize(&raw);
    let created_by = course.created_by.as_deref().unwrap_or(&admin.id);
    let now = now_utc();

    let created = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            name: &course.name,
            teacher: &course.teacher,
            image: &course.image,
            pricing_type: course.pricing_type,
            price_original: course.price.original,
            price_sale: course.price.sale,
            overview: &course.overview,
            lectures: &course.lectures,
            total_duration_hours: course.total_duration.hours,
            total_duration_minutes: course.total_duration.minutes as i32,
            total_lectures: course.total_lectures,
            course_type: course.course_type,
            category: course.category.as_deref(),
            created_by: Some(created_by),
            created_at: now,
        },
    )
    .await;

    let created = match created {
        Ok(created) => created,
        Err(err) => {
            if let Some(image) = &stored_image {
                state.uploads().remove_course_image(image).await;
            }
            return Err(ApiError::from_persistence(err, "Failed to create course"));
        }
    };

    tracing::info!(
        course_id = %created.id,
        admin_id = %admin.id,
        lectures = created.total_lectures,
        "Course created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CourseEnvelope { success: true, course: CourseResponse::from_db(created, &origin) }),
    ))
}

async fn delete_course(
    Path(course_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;

    let deleted = repositories::courses::delete(state.db(), &course.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?;
    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    state.uploads().remove_course_image(&course.image).await;

    tracing::info!(course_id = %course.id, admin_id = %admin.id, "Course deleted");
    Ok(Json(MessageResponse::ok("Course deleted successfully")))
}

async fn rate_course(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RateCourseRequest>,
) -> Result<Json<RateCourseResponse>, ApiError> {
    let rating = ratings::parse_rating(&payload.rating).map_err(|e| {
        metrics::record_rating("rejected");
        ApiError::BadRequest(e.to_string())
    })?;

    let course = fetch_course(&state, &course_id).await?;
    let mut entries = course.ratings.0;
    let now = now_utc();
    let summary = ratings::apply_rating(&mut entries, &user.id, rating, payload.comment_text(), now);

    let updated = repositories::courses::update_ratings(
        state.db(),
        &course.id,
        repositories::courses::UpdateRatings {
            ratings: &entries,
            avg_rating: summary.avg_rating,
            total_ratings: summary.total_ratings,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::from_persistence(e, "Failed to save course rating"))?
    .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    metrics::record_rating("accepted");
    tracing::info!(
        course_id = %updated.id,
        user_id = %user.id,
        rating,
        avg_rating = updated.avg_rating,
        total_ratings = updated.total_ratings,
        "Course rated"
    );

    Ok(Json(RateCourseResponse {
        success: true,
        avg_rating: updated.avg_rating,
        total_ratings: updated.total_ratings,
        my_rating: SubmittedRating { user_id: user.id, rating },
    }))
}

async fn my_rating(
    Path(course_id): Path<String>,
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<MyRatingResponse>, ApiError> {
    let course = fetch_course(&state, &course_id).await?;
    let my_rating = ratings::find_rating(&course.ratings.0, &user.id).cloned();

    Ok(Json(MyRatingResponse {
        success: true,
        my_rating,
        avg_rating: course.avg_rating,
        total_ratings: course.total_ratings,
    }))
}
