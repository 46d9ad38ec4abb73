use serde::{Deserialize, Serialize};
use std::fmt;

/// How often a reminder repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalType {
    /// Every day at the reminder time
    Daily,

    /// Once a week at the reminder time
    Weekly,
}

impl IntervalType {
    /// Parse user input, ignoring case and surrounding whitespace
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "daily" => Some(IntervalType::Daily),
            "weekly" => Some(IntervalType::Weekly),
            _ => None,
        }
    }

    /// Wire form of the interval
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalType::Daily => "daily",
            IntervalType::Weekly => "weekly",
        }
    }

    /// Plural unit counted by a reminder's duration
    pub fn unit(&self) -> &'static str {
        match self {
            IntervalType::Daily => "days",
            IntervalType::Weekly => "weeks",
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for scheduling a medication reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRequest {
    /// Ten-digit mobile number to notify
    pub phone_number: String,

    /// Medication the reminder is about
    pub medication_name: String,

    /// Time of day, `HH:MM` in 24-hour form
    pub reminder_time: String,

    /// Daily or weekly recurrence
    pub interval_type: IntervalType,

    /// Number of days or weeks the reminder repeats for
    pub duration: u32,
}

/// Confirmation returned by the reminder endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfirmation {
    /// Human-readable confirmation message
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interval_parse_ignores_case() {
        assert_eq!(IntervalType::parse("DAILY"), Some(IntervalType::Daily));
        assert_eq!(IntervalType::parse(" Weekly "), Some(IntervalType::Weekly));
        assert_eq!(IntervalType::parse("monthly"), None);
        assert_eq!(IntervalType::parse(""), None);
    }

    #[test]
    fn test_request_wire_format() {
        let request = ReminderRequest {
            phone_number: "9876543210".to_string(),
            medication_name: "Paracetamol".to_string(),
            reminder_time: "09:00".to_string(),
            interval_type: IntervalType::Weekly,
            duration: 4,
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "phone_number": "9876543210",
                "medication_name": "Paracetamol",
                "reminder_time": "09:00",
                "interval_type": "weekly",
                "duration": 4
            })
        );
    }
}
