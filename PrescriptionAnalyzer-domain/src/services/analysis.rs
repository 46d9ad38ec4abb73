use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use prescription_analyzer_data::client::{
    ClientConfig, ClientError, PrescriptionClient, PrescriptionClientTrait,
};
use prescription_analyzer_data::models::prescription::Medication;
use prescription_analyzer_data::models::reminder::{ReminderConfirmation, ReminderRequest};
use prescription_analyzer_data::models::upload::SelectedFile;

use crate::entities::conversions::convert_to_reminder_medication_name;
use crate::entities::reminder::ReminderDraft;
use crate::entities::session::{AnalysisError, PrescriptionSession, SessionState, SessionView};
use crate::services::reminder::{
    CollectOutcome, ReminderError, ReminderInputCollector, ReminderPrompt,
};
use crate::services::report::{self, ReportError};

/// How the sequential reminder flow ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderOutcome {
    /// The reminder service accepted the request
    Submitted(ReminderConfirmation),
    /// The user dismissed a question; nothing was sent
    Cancelled,
    /// An answer was invalid; nothing was sent
    Rejected(String),
    /// The reminder service refused or could not be reached
    Failed(ReminderError),
}

/// Drives one analysis session against a prescription backend
pub struct PrescriptionService<C: PrescriptionClientTrait> {
    client: C,
    session: PrescriptionSession,
}

impl<C: PrescriptionClientTrait> PrescriptionService<C> {
    /// Create a new prescription service
    pub fn new(client: C) -> Self {
        Self {
            client,
            session: PrescriptionSession::new(),
        }
    }

    pub fn session(&self) -> &PrescriptionSession {
        &self.session
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.session.select_file(file);
    }

    /// Upload the selected file and record the outcome in the session.
    /// Without a selected file this fails before any request is made.
    #[instrument(skip(self))]
    pub async fn analyze(&mut self) -> Result<SessionState, AnalysisError> {
        let ticket = self.session.begin_analysis()?;

        let outcome = self.client.analyze(&ticket.file).await.map_err(|e| {
            warn!("Analysis request failed: {}", e);
            AnalysisError::from(e)
        });
        let failure = outcome.as_ref().err().cloned();

        match self.session.complete_analysis(ticket.attempt, outcome) {
            Ok(state) => match failure {
                Some(e) => Err(e),
                None => Ok(state),
            },
            Err(e) => {
                error!("Analysis could not be recorded: {}", e);
                Err(AnalysisError::Unexpected)
            }
        }
    }

    /// Send a validated reminder request
    #[instrument(skip(self, request), fields(medication = %request.medication_name))]
    pub async fn submit_reminder(
        &self,
        request: &ReminderRequest,
    ) -> Result<ReminderConfirmation, ReminderError> {
        let confirmation = self
            .client
            .submit_reminder(request)
            .await
            .map_err(|e: ClientError| {
                warn!("Reminder request failed: {}", e);
                ReminderError::from(e)
            })?;

        info!("Reminder set");
        Ok(confirmation)
    }

    /// Validate a draft and send it. Invalid drafts are never sent.
    pub async fn submit_reminder_draft(
        &self,
        draft: ReminderDraft,
    ) -> Result<ReminderConfirmation, ReminderError> {
        let request = draft.into_request().map_err(ReminderError::Invalid)?;
        self.submit_reminder(&request).await
    }

    /// Ask for reminder details through `prompt` and send them for `medication`
    pub async fn collect_and_submit_reminder<P: ReminderPrompt>(
        &self,
        prompt: P,
        medication: &Medication,
    ) -> ReminderOutcome {
        let medication_name = convert_to_reminder_medication_name(medication);

        match ReminderInputCollector::new(prompt).collect(&medication_name) {
            CollectOutcome::Ready(request) => match self.submit_reminder(&request).await {
                Ok(confirmation) => ReminderOutcome::Submitted(confirmation),
                Err(e) => ReminderOutcome::Failed(e),
            },
            CollectOutcome::Cancelled => ReminderOutcome::Cancelled,
            CollectOutcome::Rejected(message) => ReminderOutcome::Rejected(message),
        }
    }

    /// Write the report for the current result into `dir`
    pub fn export_report(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        match self.session.result() {
            Some(result) => report::export_report(result, dir),
            None => Err(ReportError::NoMedications),
        }
    }
}

/// Create a prescription service talking to the configured backend
pub fn create_default_prescription_service(
    config: ClientConfig,
) -> Result<PrescriptionService<PrescriptionClient>, ClientError> {
    let client = PrescriptionClient::new(config)?;
    Ok(PrescriptionService::new(client))
}

/// Create a prescription service backed by the in-memory mock client
/// This function is only available when the mock feature is enabled
#[cfg(feature = "mock")]
pub fn create_mock_prescription_service(
) -> PrescriptionService<crate::testing::MockPrescriptionClient> {
    PrescriptionService::new(crate::testing::MockPrescriptionClient::new())
}
