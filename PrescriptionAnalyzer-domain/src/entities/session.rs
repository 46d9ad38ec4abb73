//! Session state for one analysis window.
//!
//! A session holds the selected file and the phase of the current analysis.
//! The phase is a single enum, so a session can never carry a result and an
//! error at the same time, or be loading while holding either.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use prescription_analyzer_data::client::ClientError;
use prescription_analyzer_data::models::prescription::AnalysisResult;
use prescription_analyzer_data::models::upload::SelectedFile;

use crate::entities::conversions::{convert_to_details_view, convert_to_medication_row};
use crate::entities::prescription::{DetailsView, MedicationRow};

/// Errors shown to the user when an analysis does not produce a result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Please select an image file first.")]
    NoFileSelected,

    #[error("An analysis is already in progress.")]
    InFlight,

    /// Message reported by the analysis service, shown verbatim
    #[error("{0}")]
    Server(String),

    #[error("No response from server.")]
    NoResponse,

    #[error("An unexpected error occurred.")]
    Unexpected,
}

impl From<ClientError> for AnalysisError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Server(message) if !message.is_empty() => AnalysisError::Server(message),
            ClientError::NoResponse(_) => AnalysisError::NoResponse,
            _ => AnalysisError::Unexpected,
        }
    }
}

/// Refused attempts to finish an analysis
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("No analysis is in progress")]
    NotLoading,

    #[error("Analysis attempt {0} is no longer current")]
    StaleAttempt(Uuid),
}

/// Observable state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    FileSelected,
    Loading,
    Populated,
    Failed,
}

#[derive(Debug, Clone)]
enum Phase {
    Empty,
    Loading { attempt: Uuid },
    Populated { result: AnalysisResult, analyzed_at: DateTime<Utc> },
    Failed { error: AnalysisError },
}

/// Handed out when an analysis starts; the attempt id must be passed back on completion
#[derive(Debug, Clone)]
pub struct AnalysisTicket {
    pub attempt: Uuid,
    pub file: SelectedFile,
}

/// Content of the result panels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelContent {
    /// An analysis is running
    Loading,
    /// Nothing to show yet, or the last analysis failed
    Placeholder,
    /// Latest analysis result. `details` is `None` when no key detail was extracted.
    Populated {
        details: Option<DetailsView>,
        medications: Vec<MedicationRow>,
        analyzed_at: DateTime<Utc>,
    },
}

/// Everything a front end needs to draw the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    pub file_name: Option<String>,
    pub analyze_enabled: bool,
    pub report_enabled: bool,
    pub error: Option<String>,
    pub content: PanelContent,
}

/// One prescription analysis session
#[derive(Debug, Clone)]
pub struct PrescriptionSession {
    file: Option<SelectedFile>,
    phase: Phase,
}

impl Default for PrescriptionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PrescriptionSession {
    pub fn new() -> Self {
        Self {
            file: None,
            phase: Phase::Empty,
        }
    }

    /// Replace the selected file. Choosing a file clears a previous error but
    /// keeps a displayed result; choosing nothing only clears the file.
    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        match file {
            Some(file) => {
                info!(file_name = %file.name, size = file.len(), "File selected");
                if matches!(self.phase, Phase::Failed { .. }) {
                    self.phase = Phase::Empty;
                }
                self.file = Some(file);
            }
            None => {
                debug!("File selection cleared");
                self.file = None;
            }
        }
    }

    /// Start an analysis of the selected file
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, AnalysisError> {
        if matches!(self.phase, Phase::Loading { .. }) {
            warn!("Analysis requested while another is in flight");
            return Err(AnalysisError::InFlight);
        }

        let Some(file) = self.file.clone() else {
            warn!("Analysis requested without a selected file");
            self.phase = Phase::Failed {
                error: AnalysisError::NoFileSelected,
            };
            return Err(AnalysisError::NoFileSelected);
        };

        let attempt = Uuid::new_v4();
        info!(%attempt, file_name = %file.name, "Analysis started");
        self.phase = Phase::Loading { attempt };

        Ok(AnalysisTicket { attempt, file })
    }

    /// Finish the in-flight analysis with its outcome
    pub fn complete_analysis(
        &mut self,
        attempt: Uuid,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<SessionState, TransitionError> {
        match self.phase {
            Phase::Loading { attempt: current } if current == attempt => {}
            Phase::Loading { .. } => return Err(TransitionError::StaleAttempt(attempt)),
            _ => return Err(TransitionError::NotLoading),
        }

        self.phase = match outcome {
            Ok(result) => {
                info!(%attempt, medications = result.medications.len(), "Analysis completed");
                Phase::Populated {
                    result,
                    analyzed_at: Utc::now(),
                }
            }
            Err(error) => {
                warn!(%attempt, error = %error, "Analysis failed");
                Phase::Failed { error }
            }
        };

        Ok(self.state())
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Loading { .. } => SessionState::Loading,
            Phase::Populated { .. } => SessionState::Populated,
            Phase::Failed { .. } => SessionState::Failed,
            Phase::Empty if self.file.is_some() => SessionState::FileSelected,
            Phase::Empty => SessionState::Idle,
        }
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Whether the analyze trigger is enabled
    pub fn can_analyze(&self) -> bool {
        self.file.is_some() && !matches!(self.phase, Phase::Loading { .. })
    }

    /// Whether there is a result with medications to put in a report
    pub fn can_export_report(&self) -> bool {
        self.result().is_some_and(|result| !result.medications.is_empty())
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::Populated { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match &self.phase {
            Phase::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn view(&self) -> SessionView {
        let content = match &self.phase {
            Phase::Loading { .. } => PanelContent::Loading,
            Phase::Populated { result, analyzed_at } => PanelContent::Populated {
                details: convert_to_details_view(result),
                medications: result.medications.iter().map(convert_to_medication_row).collect(),
                analyzed_at: *analyzed_at,
            },
            Phase::Empty | Phase::Failed { .. } => PanelContent::Placeholder,
        };

        SessionView {
            state: self.state(),
            file_name: self.file.as_ref().map(|file| file.name.clone()),
            analyze_enabled: self.can_analyze(),
            report_enabled: self.can_export_report(),
            error: self.error().map(ToString::to_string),
            content,
        }
    }
}
