//! Request body validation.
//!
//! Bodies arrive as raw JSON and are checked field by field so a client gets
//! every problem in one response rather than the first serde failure.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Number, Value};

use crate::database::models::{MealFields, NewUser};
use crate::error::{ApiError, FieldErrors};

const REQUIRED: &str = "Required";

pub fn parse_new_user(body: &Value) -> Result<NewUser, ApiError> {
    let object = as_object(body)?;
    let mut errors = FieldErrors::new();

    let name = string_field(object, "name", &mut errors);
    let email = string_field(object, "email", &mut errors);

    if let Some(email) = &email {
        if !is_valid_email(email) {
            errors.insert("email".to_string(), "Invalid email".to_string());
        }
    }

    match (name, email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok(NewUser { name, email }),
        _ => Err(ApiError::validation_error("Invalid request body", errors)),
    }
}

pub fn parse_meal_fields(body: &Value) -> Result<MealFields, ApiError> {
    let object = as_object(body)?;
    let mut errors = FieldErrors::new();

    let name = string_field(object, "name", &mut errors);
    let description = string_field(object, "description", &mut errors);

    let is_on_diet = match object.get("isOnDiet") {
        Some(Value::Bool(b)) => Some(*b),
        None | Some(Value::Null) => {
            errors.insert("isOnDiet".to_string(), REQUIRED.to_string());
            None
        }
        Some(_) => {
            errors.insert("isOnDiet".to_string(), "Expected boolean".to_string());
            None
        }
    };

    let date = match object.get("date") {
        None | Some(Value::Null) => {
            errors.insert("date".to_string(), REQUIRED.to_string());
            None
        }
        Some(value) => match parse_date(value) {
            Some(date) => Some(date),
            None => {
                errors.insert("date".to_string(), "Invalid date".to_string());
                None
            }
        },
    };

    match (name, description, is_on_diet, date) {
        (Some(name), Some(description), Some(is_on_diet), Some(date)) if errors.is_empty() => {
            Ok(MealFields {
                name,
                description,
                is_on_diet,
                date,
            })
        }
        _ => Err(ApiError::validation_error("Invalid request body", errors)),
    }
}

/// Coerce a JSON value into a UTC timestamp.
///
/// Accepts RFC 3339 strings, bare `YYYY-MM-DD` dates (midnight UTC), naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps (taken as UTC) and milliseconds
/// since the Unix epoch. Fractional milliseconds are truncated.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => epoch_millis(n).and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn epoch_millis(n: &Number) -> Option<i64> {
    if let Some(ms) = n.as_i64() {
        return Some(ms);
    }
    let ms = n.as_f64().filter(|ms| ms.is_finite())?.trunc();
    (ms >= i64::MIN as f64 && ms < i64::MAX as f64).then_some(ms as i64)
}

fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))
}

fn string_field(object: &Map<String, Value>, field: &str, errors: &mut FieldErrors) -> Option<String> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        None | Some(Value::Null) => {
            errors.insert(field.to_string(), REQUIRED.to_string());
            None
        }
        Some(_) => {
            errors.insert(field.to_string(), "Expected string".to_string());
            None
        }
    }
}
