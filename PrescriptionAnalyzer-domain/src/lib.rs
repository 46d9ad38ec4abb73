// PrescriptionAnalyzer Domain
// This crate contains the session logic for the prescription analyzer

// Services that orchestrate the session, reminders and reports
pub mod services;

// Domain entities: session state, view models and reminder drafts
pub mod entities;

// Re-export the data crate for convenience
pub use prescription_analyzer_data as data;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;

pub use entities::session::{AnalysisError, PrescriptionSession, SessionState, SessionView};
pub use services::analysis::{create_default_prescription_service, PrescriptionService};
