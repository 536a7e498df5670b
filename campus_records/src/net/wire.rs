//! Parsing boundary for response bodies.
//!
//! The server speaks loosely-typed JSON: ids arrive as `_id` or `id`, numbers
//! sometimes arrive as strings, optional attributes may be absent or null.
//! Everything is normalised here into the crate's typed models, and anything
//! that would break an invariant is reported as [`ApiError::Malformed`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{
    api::LoginResponse,
    errors::{ApiError, ApiResult},
};
use crate::{
    activity::{ActivityKind, ActivityLogEntry},
    session::{AcademicProfile, AccountStatus, Role, UserAccount},
    validation::is_valid_email,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    #[serde(rename = "_id")]
    mongo_id: Option<Value>,
    id: Option<Value>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    role: Option<String>,
    status: Option<String>,
    department: Option<String>,
    level: Option<Value>,
    matric_number: Option<String>,
    student_id: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    birth_date: Option<String>,
    gender: Option<String>,
    registration_year: Option<Value>,
    graduation_year: Option<Value>,
    advisor: Option<String>,
    cgpa: Option<Value>,
    date_started: Option<String>,
    last_active: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireLog {
    #[serde(rename = "_id")]
    mongo_id: Option<Value>,
    id: Option<Value>,
    user: Option<String>,
    action: Option<String>,
    timestamp: Option<Value>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Parse one account record
pub fn parse_user(value: Value) -> ApiResult<UserAccount> {
    let wire: WireUser = serde_json::from_value(value)
        .map_err(|e| ApiError::Malformed(format!("user record: {e}")))?;
    user_from_wire(wire)
}

/// Parse a list of accounts: a bare array or an object with a `users` array
pub fn parse_users(value: Value) -> ApiResult<Vec<UserAccount>> {
    list_items(value, "users")?
        .into_iter()
        .map(parse_user)
        .collect()
}

/// Parse a `{token, user}` login response
pub fn parse_login(value: Value) -> ApiResult<LoginResponse> {
    let Value::Object(mut body) = value else {
        return Err(ApiError::Malformed("login response is not an object".to_string()));
    };

    let token = match body.remove("token") {
        Some(Value::String(token)) if !token.trim().is_empty() => token,
        _ => return Err(ApiError::Malformed("login response has no token".to_string())),
    };
    let user = body
        .remove("user")
        .ok_or_else(|| ApiError::Malformed("login response has no user".to_string()))
        .and_then(parse_user)?;

    Ok(LoginResponse { token, user })
}

/// Parse one activity log entry
pub fn parse_activity_log(value: Value) -> ApiResult<ActivityLogEntry> {
    let wire: WireLog = serde_json::from_value(value)
        .map_err(|e| ApiError::Malformed(format!("activity log: {e}")))?;

    let id = wire
        .mongo_id
        .or(wire.id)
        .and_then(text)
        .ok_or_else(|| ApiError::Malformed("activity log without id".to_string()))?;
    let kind = wire
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse::<ActivityKind>()
        .map_err(|e| ApiError::Malformed(e.to_string()))?;
    let timestamp = wire
        .timestamp
        .as_ref()
        .and_then(timestamp)
        .ok_or_else(|| ApiError::Malformed(format!("activity log {id} has no valid timestamp")))?;

    Ok(ActivityLogEntry {
        id,
        actor: wire.user.unwrap_or_default(),
        action: wire.action.unwrap_or_default(),
        timestamp,
        kind,
    })
}

/// Parse the activity log list: a bare array or an object with a `logs` array
pub fn parse_activity_logs(value: Value) -> ApiResult<Vec<ActivityLogEntry>> {
    list_items(value, "logs")?
        .into_iter()
        .map(parse_activity_log)
        .collect()
}

/// Pull the `message` out of an error body, if there is one
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn user_from_wire(wire: WireUser) -> ApiResult<UserAccount> {
    let id = wire
        .mongo_id
        .or(wire.id)
        .and_then(text)
        .ok_or_else(|| ApiError::Malformed("user record without id".to_string()))?;

    let email = wire.email.unwrap_or_default().trim().to_string();
    if !is_valid_email(&email) {
        return Err(ApiError::Malformed(format!("user {id} has invalid email '{email}'")));
    }

    let role = match wire.role.as_deref() {
        None | Some("") => Role::default(),
        Some(role) => role
            .parse::<Role>()
            .map_err(|e| ApiError::Malformed(format!("user {id}: {e}")))?,
    };
    let status = match wire.status.as_deref() {
        None | Some("") => AccountStatus::default(),
        Some(status) => status
            .parse::<AccountStatus>()
            .map_err(|e| ApiError::Malformed(format!("user {id}: {e}")))?,
    };

    let profile = AcademicProfile {
        department: non_empty(wire.department),
        level: wire.level.and_then(text),
        student_id: non_empty(wire.matric_number.or(wire.student_id)),
        phone: non_empty(wire.phone),
        address: non_empty(wire.address),
        birth_date: wire.birth_date.as_deref().and_then(date),
        gender: non_empty(wire.gender),
        registration_year: wire.registration_year.as_ref().and_then(year),
        graduation_year: wire.graduation_year.as_ref().and_then(year),
        advisor: non_empty(wire.advisor),
        cgpa: wire.cgpa.as_ref().and_then(number),
        date_started: wire.date_started.as_deref().and_then(date),
        last_active: non_empty(wire.last_active),
    };

    Ok(UserAccount {
        id,
        first_name: wire.first_name.unwrap_or_default(),
        last_name: wire.last_name.unwrap_or_default(),
        email,
        role,
        status,
        profile,
    })
}

fn list_items(value: Value, key: &str) -> ApiResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut body) => match body.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ApiError::Malformed(format!("expected a list of {key}"))),
        },
        _ => Err(ApiError::Malformed(format!("expected a list of {key}"))),
    }
}

/// String or number as text
fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part
fn date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// RFC 3339 string, naive ISO string (taken as UTC) or epoch milliseconds
fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.and_utc())
            }),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}
