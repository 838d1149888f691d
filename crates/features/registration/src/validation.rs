//! Turning an untyped JSON submission into a [`Registration`].
//!
//! [`validate`] is the quick structural gate (required fields and primitive types).
//! [`Registration::parse`] applies it with a reason attached, then the per-field
//! patterns the browser form uses, the referrer pairing rule and the unknown-field check.

use crate::error::RegistrationError;
use crate::model::{FIELDS, Gender, Registration};
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::LazyLock;

static NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[a-zA-Z\s]+$"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[a-zA-Z0-9._+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"));
static GITHUB: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(https?://)?(www\.)?github\.com/[a-zA-Z0-9_-]+/?$"));
static LINKEDIN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(https?://)?(www\.)?linkedin\.com/in/[a-zA-Z0-9_-]+/?$"));
static INSTAGRAM: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^(https?://)?(www\.)?instagram\.com/[a-zA-Z0-9_.-]+/?$"));

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("static pattern compiles")
}

/// `true` when `record` is an object carrying every required field with the right type.
///
/// Does not apply the field patterns; see [`Registration::parse`].
#[must_use]
pub fn validate(record: &Value) -> bool {
    check_structure(record).is_ok()
}

fn check_structure(record: &Value) -> Result<&Map<String, Value>, Cow<'static, str>> {
    let Some(fields) = record.as_object() else {
        return Err("Record must be a JSON object".into());
    };

    for key in ["name", "email", "about"] {
        match fields.get(key) {
            Some(Value::String(s)) if !s.is_empty() => {},
            Some(Value::String(_)) | None | Some(Value::Null) => {
                return Err(format!("{key} is required").into());
            },
            Some(_) => return Err(format!("{key} must be a string").into()),
        }
    }

    match fields.get("roll_number") {
        Some(Value::Number(n)) if n.as_i64().is_some_and(|n| n != 0) => {},
        Some(Value::Number(n)) if n.as_i64() == Some(0) => {
            return Err("roll_number is required".into());
        },
        Some(Value::Number(n)) if n.is_u64() => {
            return Err("roll_number is out of range".into());
        },
        None | Some(Value::Null) => return Err("roll_number is required".into()),
        Some(_) => return Err("roll_number must be an integer".into()),
    }

    match fields.get("gender").and_then(Value::as_str) {
        Some("M" | "F") => {},
        _ => return Err("gender must be \"M\" or \"F\"".into()),
    }

    Ok(fields)
}

impl Registration {
    /// Builds a [`Registration`] from an untyped submission.
    ///
    /// Optional fields that are absent, `null` or blank are treated as not provided.
    ///
    /// # Errors
    /// [`RegistrationError::Validation`] with a human-readable reason for the first
    /// rule the record breaks.
    pub fn parse(record: Value) -> Result<Self, RegistrationError> {
        let fields = check_structure(&record).map_err(RegistrationError::validation)?;

        if let Some(unknown) = fields.keys().find(|k| !FIELDS.contains(&k.as_str())) {
            return Err(RegistrationError::validation(format!("Unknown field `{unknown}`")));
        }

        let name = required_text(fields, "name")?;
        if !NAME.is_match(&name) {
            return Err(RegistrationError::validation("Name must only contain letters and spaces"));
        }

        let roll_number = fields.get("roll_number").and_then(Value::as_i64).unwrap_or_default();
        if roll_number <= 0 {
            return Err(RegistrationError::validation("Roll Number must be a positive integer"));
        }

        let gender = fields
            .get("gender")
            .and_then(Value::as_str)
            .and_then(|g| g.parse::<Gender>().ok())
            .ok_or_else(|| RegistrationError::validation("gender must be \"M\" or \"F\""))?;

        let email = required_text(fields, "email")?;
        if !EMAIL.is_match(&email) {
            return Err(RegistrationError::validation("Invalid email format"));
        }

        let about = required_text(fields, "about")?;

        let github_link =
            optional_matching(fields, "github_link", &GITHUB, "Invalid GitHub URL format")?;
        let linkedin_link =
            optional_matching(fields, "linkedin_link", &LINKEDIN, "Invalid LinkedIn URL format")?;
        let instagram_link =
            optional_matching(fields, "instagram_link", &INSTAGRAM, "Invalid Instagram URL format")?;
        let team_name = optional_text(fields, "team_name")?;
        let referrer_name = optional_text(fields, "referrer_name")?;
        let referrer_email =
            optional_matching(fields, "referrer_email", &EMAIL, "Invalid referrer email format")?;

        match (&referrer_name, &referrer_email) {
            (None, Some(_)) => {
                return Err(RegistrationError::validation(
                    "Name is required when teammate email is provided",
                ));
            },
            (Some(_), None) => {
                return Err(RegistrationError::validation(
                    "Email is required when teammate name is provided",
                ));
            },
            _ => {},
        }

        Ok(Self {
            name,
            roll_number,
            gender,
            email,
            about,
            github_link,
            linkedin_link,
            instagram_link,
            team_name,
            referrer_name,
            referrer_email,
        })
    }
}

/// Trimmed value of a required string; blank is rejected.
fn required_text(fields: &Map<String, Value>, key: &str) -> Result<String, RegistrationError> {
    optional_text(fields, key)?
        .ok_or_else(|| RegistrationError::validation(format!("{key} must not be blank")))
}

/// Trimmed value of an optional string; absent, `null` and blank all give `None`.
fn optional_text(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, RegistrationError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_owned()))
        },
        Some(_) => Err(RegistrationError::validation(format!("{key} must be a string"))),
    }
}

fn optional_matching(
    fields: &Map<String, Value>,
    key: &str,
    pattern: &Regex,
    reason: &'static str,
) -> Result<Option<String>, RegistrationError> {
    match optional_text(fields, key)? {
        Some(value) if !pattern.is_match(&value) => Err(RegistrationError::validation(reason)),
        value => Ok(value),
    }
}
