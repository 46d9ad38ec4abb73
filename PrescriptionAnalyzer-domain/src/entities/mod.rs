// Domain entities and value objects
pub mod conversions;
pub mod prescription;
pub mod reminder;
pub mod session;

// Re-export common types for easier imports
pub use prescription::{DetailsView, MedicationRow, NOT_AVAILABLE};
pub use reminder::{ReminderDraft, ReminderField, ReminderFieldError};
pub use session::{AnalysisError, AnalysisTicket, PrescriptionSession, SessionState, SessionView};
