// PrescriptionAnalyzer Data
// This crate handles the wire models and the interactions with the analysis service

// Payload models exchanged with the analysis and reminder endpoints
pub mod models;

// HTTP client for the remote service
pub mod client;

// Re-export commonly used types
pub use client::{ClientConfig, ClientError, PrescriptionClient, PrescriptionClientTrait};
pub use models::prescription::{
    AnalysisResult, ConfidenceDetails, HospitalDetails, Instructions, Medication, PrescriptionInfo,
    SourceDetails,
};
pub use models::reminder::{IntervalType, ReminderConfirmation, ReminderRequest};
pub use models::upload::{SelectedFile, UploadError};
