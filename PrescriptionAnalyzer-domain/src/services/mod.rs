pub mod analysis;
pub mod reminder;
pub mod report;

// Domain services
// This module contains the session orchestration, reminder flow and report export.

// Re-export service types and factory functions
pub use analysis::{create_default_prescription_service, PrescriptionService, ReminderOutcome};
pub use reminder::{CollectOutcome, PromptRequest, ReminderError, ReminderInputCollector, ReminderPrompt};
pub use report::{export_report, ReportError};

// Re-export mock service factory functions when the mock feature is enabled
#[cfg(feature = "mock")]
pub use analysis::create_mock_prescription_service;
