use std::borrow::Cow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use prescription_analyzer_data::models::reminder::{IntervalType, ReminderRequest};

/// Exactly ten ASCII digits
pub static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("phone number pattern is valid"));

/// Two digits, a colon, two digits. The clock range is not checked, so "25:61" passes.
pub static REMINDER_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("reminder time pattern is valid"));

pub const INVALID_PHONE_NUMBER: &str = "Invalid phone number. Please enter a 10-digit number.";
pub const INVALID_REMINDER_TIME: &str = "Invalid time format. Please use HH:MM format.";
pub const INVALID_INTERVAL_TYPE: &str = "Invalid input. Please enter 'daily' or 'weekly'.";
pub const INVALID_DURATION: &str = "Invalid duration. Please enter a positive number.";

/// Whether `input` is a ten-digit phone number
pub fn is_valid_phone_number(input: &str) -> bool {
    PHONE_NUMBER_RE.is_match(input)
}

/// Whether `input` has the `HH:MM` shape
pub fn is_valid_reminder_time(input: &str) -> bool {
    REMINDER_TIME_RE.is_match(input)
}

/// Parse a repeat count from the leading integer of `input`, so "7 days"
/// reads as 7 and "2.5" as 2. Counts below one, and counts too large for a
/// `u32`, are refused.
pub fn parse_duration(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if negative || digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok().filter(|count| *count >= 1)
}

fn validate_interval_type(value: &str) -> Result<(), ValidationError> {
    match IntervalType::parse(value) {
        Some(_) => Ok(()),
        None => Err(with_message("interval_type", INVALID_INTERVAL_TYPE)),
    }
}

fn validate_duration(value: &str) -> Result<(), ValidationError> {
    match parse_duration(value) {
        Some(_) => Ok(()),
        None => Err(with_message("duration", INVALID_DURATION)),
    }
}

fn with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Fields of a reminder request, in the order they are collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderField {
    PhoneNumber,
    MedicationName,
    ReminderTime,
    IntervalType,
    Duration,
}

impl ReminderField {
    /// All fields in collection order
    pub const ALL: [ReminderField; 5] = [
        ReminderField::PhoneNumber,
        ReminderField::MedicationName,
        ReminderField::ReminderTime,
        ReminderField::IntervalType,
        ReminderField::Duration,
    ];

    /// Field name as used in the wire format
    pub fn name(&self) -> &'static str {
        match self {
            ReminderField::PhoneNumber => "phone_number",
            ReminderField::MedicationName => "medication_name",
            ReminderField::ReminderTime => "reminder_time",
            ReminderField::IntervalType => "interval_type",
            ReminderField::Duration => "duration",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Corrective message for a value that was entered but is not acceptable
    pub fn invalid_message(&self) -> &'static str {
        match self {
            ReminderField::PhoneNumber => INVALID_PHONE_NUMBER,
            ReminderField::MedicationName => "Invalid medication name.",
            ReminderField::ReminderTime => INVALID_REMINDER_TIME,
            ReminderField::IntervalType => INVALID_INTERVAL_TYPE,
            ReminderField::Duration => INVALID_DURATION,
        }
    }
}

impl fmt::Display for ReminderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a reminder field was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// Nothing was entered
    Missing,
    /// Something was entered but it is not acceptable
    Invalid,
}

/// A field-level problem with a reminder draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderFieldError {
    pub field: ReminderField,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl fmt::Display for ReminderFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw reminder input, as typed into a form, passed on the command line or
/// received in an API payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ReminderDraft {
    /// Ten-digit mobile number
    #[validate(regex(path = "PHONE_NUMBER_RE", message = "Invalid phone number. Please enter a 10-digit number."))]
    pub phone_number: String,

    /// Medication the reminder is for
    pub medication_name: String,

    /// Time of day in `HH:MM`
    #[validate(regex(path = "REMINDER_TIME_RE", message = "Invalid time format. Please use HH:MM format."))]
    pub reminder_time: String,

    /// "daily" or "weekly", any case
    #[validate(custom = "validate_interval_type")]
    pub interval_type: String,

    /// Number of days or weeks
    #[validate(custom = "validate_duration")]
    pub duration: String,
}

impl ReminderDraft {
    fn raw(&self, field: ReminderField) -> &str {
        match field {
            ReminderField::PhoneNumber => &self.phone_number,
            ReminderField::MedicationName => &self.medication_name,
            ReminderField::ReminderTime => &self.reminder_time,
            ReminderField::IntervalType => &self.interval_type,
            ReminderField::Duration => &self.duration,
        }
    }

    /// Validate every field and build the request, or report all field errors
    /// in collection order. A field left blank is reported as missing rather
    /// than invalid.
    pub fn into_request(self) -> Result<ReminderRequest, Vec<ReminderFieldError>> {
        let mut errors: Vec<ReminderFieldError> = ReminderField::ALL
            .into_iter()
            .filter(|field| self.raw(*field).trim().is_empty())
            .map(|field| ReminderFieldError {
                field,
                kind: FieldErrorKind::Missing,
                message: format!("{} is required", field.name().replace('_', " ")),
            })
            .collect();

        if let Err(validation_errors) = self.validate() {
            for (name, field_errors) in validation_errors.field_errors() {
                let Some(field) = ReminderField::from_name(name) else {
                    continue;
                };
                if errors.iter().any(|error| error.field == field) {
                    continue;
                }
                let message = field_errors
                    .iter()
                    .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| field.invalid_message().to_string());
                errors.push(ReminderFieldError {
                    field,
                    kind: FieldErrorKind::Invalid,
                    message,
                });
            }
        }

        match (IntervalType::parse(&self.interval_type), parse_duration(&self.duration)) {
            (Some(interval_type), Some(duration)) if errors.is_empty() => Ok(ReminderRequest {
                phone_number: self.phone_number,
                medication_name: self.medication_name,
                reminder_time: self.reminder_time,
                interval_type,
                duration,
            }),
            _ => {
                errors.sort_by_key(|error| error.field);
                Err(errors)
            }
        }
    }
}
