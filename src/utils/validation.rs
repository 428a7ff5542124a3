use crate::api::error::AppError;
use serde_json::Value;

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Accepts integers in `MIN_RATING..=MAX_RATING`.
pub fn validate_rating(rating: i64) -> Result<i32, AppError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating as i32)
    } else {
        Err(AppError::InvalidRating)
    }
}

/// Reads a rating from loosely typed input. Form posts send numbers as
/// strings, so numeric strings are accepted; anything non-integral is not.
pub fn rating_from_json(value: &Value) -> Result<i64, AppError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or(AppError::InvalidRating),
        Value::String(s) => s.trim().parse().map_err(|_| AppError::InvalidRating),
        _ => Err(AppError::InvalidRating),
    }
}

/// Parses an optional integer form field such as `user_id`.
pub fn parse_optional_id(field: &str, raw: Option<String>) -> Result<Option<i32>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid {}: {}", field, v))),
    }
}
