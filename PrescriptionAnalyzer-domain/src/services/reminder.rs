use thiserror::Error;
use tracing::{debug, info};

use prescription_analyzer_data::client::ClientError;
use prescription_analyzer_data::models::reminder::{IntervalType, ReminderRequest};

use crate::entities::reminder::{
    is_valid_phone_number, is_valid_reminder_time, parse_duration, ReminderField,
    ReminderFieldError, INVALID_DURATION, INVALID_INTERVAL_TYPE, INVALID_PHONE_NUMBER,
    INVALID_REMINDER_TIME,
};

/// Reminder service errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderError {
    /// The draft did not pass validation; nothing was sent
    #[error("{}", describe_field_errors(.0))]
    Invalid(Vec<ReminderFieldError>),

    /// Message reported by the reminder service
    #[error("{0}")]
    Server(String),

    /// Any other failure to reach or understand the reminder service
    #[error("Failed to set reminder. Please try again.")]
    Failed,
}

fn describe_field_errors(errors: &[ReminderFieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ClientError> for ReminderError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Server(message) if !message.is_empty() => ReminderError::Server(message),
            _ => ReminderError::Failed,
        }
    }
}

/// A question put to the user while collecting reminder input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    /// Field the answer is for
    pub step: ReminderField,
    pub message: String,
    /// Value offered when the user just confirms
    pub default: String,
}

/// Source of answers for the sequential reminder flow.
/// `None` means the user dismissed the question.
pub trait ReminderPrompt {
    fn ask(&mut self, request: &PromptRequest) -> Option<String>;
}

impl<P: ReminderPrompt + ?Sized> ReminderPrompt for &mut P {
    fn ask(&mut self, request: &PromptRequest) -> Option<String> {
        (**self).ask(request)
    }
}

/// Result of one run of the sequential flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Every answer was valid
    Ready(ReminderRequest),
    /// A question was dismissed or left empty
    Cancelled,
    /// An answer failed validation; carries the corrective message
    Rejected(String),
}

/// Asks for phone number, time, interval and duration one at a time,
/// stopping at the first dismissed or invalid answer
pub struct ReminderInputCollector<P: ReminderPrompt> {
    prompt: P,
}

impl<P: ReminderPrompt> ReminderInputCollector<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    pub fn into_inner(self) -> P {
        self.prompt
    }

    fn ask(&mut self, step: ReminderField, message: String, default: &str) -> Option<String> {
        let request = PromptRequest {
            step,
            message,
            default: default.to_string(),
        };
        match self.prompt.ask(&request) {
            Some(answer) if !answer.is_empty() => Some(answer),
            _ => {
                debug!(step = %step, "Reminder input cancelled");
                None
            }
        }
    }

    /// Collect a reminder for `medication_name`
    pub fn collect(&mut self, medication_name: &str) -> CollectOutcome {
        let Some(phone_number) = self.ask(
            ReminderField::PhoneNumber,
            format!("Enter your 10-digit mobile number for \"{medication_name}\" reminders:"),
            "",
        ) else {
            return CollectOutcome::Cancelled;
        };
        if !is_valid_phone_number(&phone_number) {
            return CollectOutcome::Rejected(INVALID_PHONE_NUMBER.to_string());
        }

        let Some(reminder_time) = self.ask(
            ReminderField::ReminderTime,
            "What time should we remind you? (Use 24-hour HH:MM format, e.g., 09:00 or 21:30)"
                .to_string(),
            "09:00",
        ) else {
            return CollectOutcome::Cancelled;
        };
        if !is_valid_reminder_time(&reminder_time) {
            return CollectOutcome::Rejected(INVALID_REMINDER_TIME.to_string());
        }

        let Some(interval_answer) = self.ask(
            ReminderField::IntervalType,
            "Should the reminder be \"daily\" or \"weekly\"?".to_string(),
            "daily",
        ) else {
            return CollectOutcome::Cancelled;
        };
        let Some(interval_type) = IntervalType::parse(&interval_answer) else {
            return CollectOutcome::Rejected(INVALID_INTERVAL_TYPE.to_string());
        };

        let Some(duration_answer) = self.ask(
            ReminderField::Duration,
            format!(
                "For how many {} should this reminder repeat?",
                interval_type.unit()
            ),
            "7",
        ) else {
            return CollectOutcome::Cancelled;
        };
        let Some(duration) = parse_duration(&duration_answer) else {
            return CollectOutcome::Rejected(INVALID_DURATION.to_string());
        };

        info!(medication = medication_name, %interval_type, duration, "Reminder input collected");
        CollectOutcome::Ready(ReminderRequest {
            phone_number,
            medication_name: medication_name.to_string(),
            reminder_time,
            interval_type,
            duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Answers from a script, recording every question asked
    #[derive(Default)]
    struct ScriptedPrompt {
        answers: VecDeque<Option<String>>,
        asked: Vec<PromptRequest>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[Option<&str>]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl ReminderPrompt for ScriptedPrompt {
        fn ask(&mut self, request: &PromptRequest) -> Option<String> {
            self.asked.push(request.clone());
            self.answers.pop_front().flatten()
        }
    }

    fn run(answers: &[Option<&str>]) -> (CollectOutcome, Vec<PromptRequest>) {
        let mut collector = ReminderInputCollector::new(ScriptedPrompt::new(answers));
        let outcome = collector.collect("Paracetamol");
        (outcome, collector.into_inner().asked)
    }

    #[test]
    fn test_complete_flow() {
        let (outcome, asked) = run(&[
            Some("1234567890"),
            Some("21:30"),
            Some("Weekly"),
            Some("4"),
        ]);

        assert_eq!(
            outcome,
            CollectOutcome::Ready(ReminderRequest {
                phone_number: "1234567890".to_string(),
                medication_name: "Paracetamol".to_string(),
                reminder_time: "21:30".to_string(),
                interval_type: IntervalType::Weekly,
                duration: 4,
            })
        );

        assert_eq!(
            asked[0].message,
            "Enter your 10-digit mobile number for \"Paracetamol\" reminders:"
        );
        assert_eq!(asked[0].default, "");
        assert_eq!(asked[1].default, "09:00");
        assert_eq!(asked[2].default, "daily");
        assert_eq!(
            asked[3].message,
            "For how many weeks should this reminder repeat?"
        );
        assert_eq!(asked[3].default, "7");
    }

    #[test]
    fn test_duration_question_names_days_for_daily() {
        let (_, asked) = run(&[Some("1234567890"), Some("09:00"), Some("daily"), None]);
        assert_eq!(
            asked[3].message,
            "For how many days should this reminder repeat?"
        );
    }

    #[test]
    fn test_cancel_stops_silently() {
        let (outcome, asked) = run(&[Some("1234567890"), None]);
        assert_eq!(outcome, CollectOutcome::Cancelled);
        assert_eq!(asked.len(), 2);

        let (outcome, asked) = run(&[Some("")]);
        assert_eq!(outcome, CollectOutcome::Cancelled);
        assert_eq!(asked.len(), 1);
    }

    #[test]
    fn test_invalid_answer_stops_with_message() {
        let (outcome, asked) = run(&[Some("12345")]);
        assert_eq!(outcome, CollectOutcome::Rejected(INVALID_PHONE_NUMBER.to_string()));
        assert_eq!(asked.len(), 1);

        let (outcome, _) = run(&[Some("1234567890"), Some("9:00")]);
        assert_eq!(outcome, CollectOutcome::Rejected(INVALID_REMINDER_TIME.to_string()));

        let (outcome, _) = run(&[Some("1234567890"), Some("09:00"), Some("monthly")]);
        assert_eq!(outcome, CollectOutcome::Rejected(INVALID_INTERVAL_TYPE.to_string()));

        let (outcome, _) = run(&[Some("1234567890"), Some("09:00"), Some("daily"), Some("0")]);
        assert_eq!(outcome, CollectOutcome::Rejected(INVALID_DURATION.to_string()));
    }

    #[test]
    fn test_reminder_error_messages() {
        assert_eq!(
            ReminderError::from(ClientError::Server("Invalid phone number".to_string())).to_string(),
            "Invalid phone number"
        );
        assert_eq!(
            ReminderError::from(ClientError::NoResponse("timeout".to_string())),
            ReminderError::Failed
        );
        assert_eq!(
            ReminderError::Failed.to_string(),
            "Failed to set reminder. Please try again."
        );
    }
}
