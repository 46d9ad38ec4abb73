// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use prescription_analyzer_data::client::{ClientError, PrescriptionClientTrait};
use prescription_analyzer_data::models::prescription::{
    AnalysisResult, ConfidenceDetails, HospitalDetails, Instructions, Medication, PrescriptionInfo,
};
use prescription_analyzer_data::models::reminder::{ReminderConfirmation, ReminderRequest};
use prescription_analyzer_data::models::upload::SelectedFile;

/// A one-medication result: City Hospital, Dr. A. Kumar, Paracetamol 500mg
pub fn sample_analysis_result() -> AnalysisResult {
    AnalysisResult {
        hospital_details: HospitalDetails {
            name: Some("City Hospital".to_string()),
            ..Default::default()
        },
        prescription_info: PrescriptionInfo {
            doctor_name: Some("Dr. A. Kumar".to_string()),
            ..Default::default()
        },
        medications: vec![Medication {
            tablet_name: Some("Paracetamol".to_string()),
            instructions: Instructions {
                dosage: Some("500mg".to_string()),
                ..Default::default()
            },
            source_details: Instructions {
                dosage: Some("Prescription".to_string()),
                ..Default::default()
            },
            confidence_details: ConfidenceDetails {
                tablet_name: Some("High".to_string()),
                ..Default::default()
            },
            estimated_price_range_inr: Some("₹20-30".to_string()),
        }],
    }
}

/// Mock implementation of the PrescriptionClientTrait for testing
pub struct MockPrescriptionClient {
    analysis: Result<AnalysisResult, ClientError>,
    reminder: Result<ReminderConfirmation, ClientError>,
    analyze_calls: AtomicUsize,
    reminder_calls: AtomicUsize,
    uploaded: Mutex<Vec<String>>,
    reminders: Mutex<Vec<ReminderRequest>>,
}

impl Default for MockPrescriptionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPrescriptionClient {
    /// Create a mock that returns [`sample_analysis_result`] and accepts every reminder
    pub fn new() -> Self {
        Self {
            analysis: Ok(sample_analysis_result()),
            reminder: Ok(ReminderConfirmation {
                message: "Reminder set successfully".to_string(),
            }),
            analyze_calls: AtomicUsize::new(0),
            reminder_calls: AtomicUsize::new(0),
            uploaded: Mutex::new(Vec::new()),
            reminders: Mutex::new(Vec::new()),
        }
    }

    /// Return `result` from every analysis
    pub fn with_analysis(mut self, result: AnalysisResult) -> Self {
        self.analysis = Ok(result);
        self
    }

    /// Fail every analysis with `error`
    pub fn with_analysis_error(mut self, error: ClientError) -> Self {
        self.analysis = Err(error);
        self
    }

    /// Confirm every reminder with `message`
    pub fn with_reminder_confirmation(mut self, message: impl Into<String>) -> Self {
        self.reminder = Ok(ReminderConfirmation {
            message: message.into(),
        });
        self
    }

    /// Fail every reminder with `error`
    pub fn with_reminder_error(mut self, error: ClientError) -> Self {
        self.reminder = Err(error);
        self
    }

    pub fn analyze_calls(&self) -> usize {
        self.analyze_calls.load(Ordering::SeqCst)
    }

    pub fn reminder_calls(&self) -> usize {
        self.reminder_calls.load(Ordering::SeqCst)
    }

    /// Names of the files uploaded so far, oldest first
    pub fn uploaded_files(&self) -> Vec<String> {
        self.uploaded.lock().map(|names| names.clone()).unwrap_or_default()
    }

    /// Reminder requests received so far, oldest first
    pub fn submitted_reminders(&self) -> Vec<ReminderRequest> {
        self.reminders.lock().map(|requests| requests.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PrescriptionClientTrait for MockPrescriptionClient {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult, ClientError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut names) = self.uploaded.lock() {
            names.push(file.name.clone());
        }
        self.analysis.clone()
    }

    async fn submit_reminder(
        &self,
        request: &ReminderRequest,
    ) -> Result<ReminderConfirmation, ClientError> {
        self.reminder_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.reminders.lock() {
            requests.push(request.clone());
        }
        self.reminder.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::session::{AnalysisError, SessionState};
    use crate::services::analysis::PrescriptionService;

    #[tokio::test]
    async fn test_mock_records_uploads() {
        let client = MockPrescriptionClient::new();
        let file = SelectedFile::image("rx.png", vec![1]).unwrap();

        let result = client.analyze(&file).await.unwrap();
        assert_eq!(result, sample_analysis_result());
        assert_eq!(client.analyze_calls(), 1);
        assert_eq!(client.uploaded_files(), vec!["rx.png".to_string()]);
    }

    #[tokio::test]
    async fn test_service_with_failing_mock() {
        let client = MockPrescriptionClient::new()
            .with_analysis_error(ClientError::Server("Invalid image format".to_string()));
        let mut service = PrescriptionService::new(client);
        service.select_file(Some(SelectedFile::image("rx.png", vec![1]).unwrap()));

        let err = service.analyze().await.unwrap_err();
        assert_eq!(err, AnalysisError::Server("Invalid image format".to_string()));
        assert_eq!(service.view().state, SessionState::Failed);
    }
}
