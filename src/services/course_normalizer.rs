//! Turns a loosely-typed course submission into a self-consistent course document.
//!
//! Creation is lenient: numbers may arrive as strings, be empty, or be missing, and
//! `lectures`/`price` may arrive JSON-encoded. Anything that cannot be read degrades to
//! zero, an empty list, or the field default. Nothing here fails.

use serde_json::{Map, Value};

use crate::db::models::{Chapter, Duration, Lecture};
use crate::db::types::{CourseType, PricingType};

pub(crate) const UNTITLED_LECTURE: &str = "Untitled lecture";

// Keeps `hours * 60` and the course-wide sums far away from i64 overflow.
const MAX_DURATION_COMPONENT: f64 = u32::MAX as f64;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Price {
    pub(crate) original: f64,
    pub(crate) sale: f64,
}

/// A course ready to be persisted. Every derived field agrees with `lectures`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CanonicalCourse {
    pub(crate) name: String,
    pub(crate) teacher: String,
    pub(crate) image: String,
    pub(crate) pricing_type: PricingType,
    pub(crate) price: Price,
    pub(crate) overview: String,
    pub(crate) lectures: Vec<Lecture>,
    pub(crate) total_duration: Duration,
    pub(crate) total_lectures: i32,
    pub(crate) course_type: CourseType,
    pub(crate) category: Option<String>,
    pub(crate) created_by: Option<String>,
}

pub(crate) fn normalize(raw: &Value) -> CanonicalCourse {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let lectures: Vec<Lecture> = match decode_structure(fields.get("lectures")) {
        Some(Value::Array(items)) => items.iter().map(normalize_lecture).collect(),
        _ => Vec::new(),
    };

    let (total_duration, total_lectures) = course_totals(&lectures);

    let overview = match text(fields.get("overview")) {
        value if value.is_empty() => text(fields.get("description")),
        value => value,
    };

    CanonicalCourse {
        name: text(fields.get("name")),
        teacher: text(fields.get("teacher")),
        image: text(fields.get("image")),
        pricing_type: PricingType::from_loose(&text(fields.get("pricingType"))),
        price: normalize_price(fields),
        overview,
        lectures,
        total_duration,
        total_lectures,
        course_type: CourseType::from_loose(&text(fields.get("courseType"))),
        category: optional_text(fields.get("category")),
        created_by: optional_text(fields.get("createdBy")),
    }
}

/// Course-wide duration and lecture count, recomputed from the lectures themselves.
fn course_totals(lectures: &[Lecture]) -> (Duration, i32) {
    let total_minutes =
        lectures.iter().fold(0i64, |sum, lecture| sum.saturating_add(lecture.total_minutes));
    let count = i32::try_from(lectures.len()).unwrap_or(i32::MAX);

    (Duration::from_minutes(total_minutes), count)
}

fn normalize_lecture(raw: &Value) -> Lecture {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let duration = normalize_duration(fields.get("duration"));
    let chapters: Vec<Chapter> = match fields.get("chapters") {
        Some(Value::Array(items)) => items.iter().map(normalize_chapter).collect(),
        _ => Vec::new(),
    };

    let chapter_minutes =
        chapters.iter().fold(0i64, |sum, chapter| sum.saturating_add(chapter.total_minutes));

    let title = match text(fields.get("title")) {
        value if value.is_empty() => UNTITLED_LECTURE.to_string(),
        value => value,
    };

    Lecture {
        title,
        duration,
        total_minutes: duration.total_minutes().saturating_add(chapter_minutes),
        chapters,
    }
}

fn normalize_chapter(raw: &Value) -> Chapter {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let duration = normalize_duration(fields.get("duration"));

    // A positive supplied total is trusted as-is; zero, negative or junk is recomputed.
    let supplied = to_number(fields.get("totalMinutes"), 0.0);
    let total_minutes =
        if supplied > 0.0 { clamp_count(supplied) } else { duration.total_minutes() };

    Chapter {
        name: text(fields.get("name")),
        topic: text(fields.get("topic")),
        video_url: text(fields.get("videoUrl")),
        duration,
        total_minutes,
    }
}

fn normalize_duration(raw: Option<&Value>) -> Duration {
    let Some(fields) = raw.and_then(Value::as_object) else {
        return Duration::default();
    };

    Duration {
        hours: clamp_count(to_number(fields.get("hours"), 0.0)),
        minutes: clamp_count(to_number(fields.get("minutes"), 0.0)),
    }
}

fn normalize_price(fields: &Map<String, Value>) -> Price {
    let nested = match decode_structure(fields.get("price")) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let component = |key: &str, flat_key: &str| {
        let value = nested.get(key).filter(|value| !value.is_null()).or_else(|| fields.get(flat_key));
        to_number(value, 0.0).max(0.0)
    };

    Price { original: component("original", "price.original"), sale: component("sale", "price.sale") }
}

/// Accepts an already-structured value or a JSON-encoded string; `None` when neither.
fn decode_structure(raw: Option<&Value>) -> Option<Value> {
    match raw? {
        Value::Null => None,
        Value::String(encoded) => serde_json::from_str(encoded).ok(),
        other => Some(other.clone()),
    }
}

/// Numeric coercion: numbers pass through, numeric strings parse, blanks and junk fall back.
pub(crate) fn to_number(raw: Option<&Value>, fallback: f64) -> f64 {
    let parsed = match raw {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(value)) if value.trim().is_empty() => None,
        Some(Value::String(value)) => value.trim().parse::<f64>().ok(),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    };

    parsed.filter(|value| value.is_finite()).unwrap_or(fallback)
}

fn clamp_count(value: f64) -> i64 {
    if value > 0.0 {
        value.min(MAX_DURATION_COMPONENT).floor() as i64
    } else {
        0
    }
}

fn text(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(value)) => value.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

fn optional_text(raw: Option<&Value>) -> Option<String> {
    let value = text(raw);
    (!value.trim().is_empty()).then_some(value)
}
