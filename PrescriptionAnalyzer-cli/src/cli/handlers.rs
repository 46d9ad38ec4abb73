use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, info};

use prescription_analyzer_data::client::PrescriptionClientTrait;
use prescription_analyzer_data::models::upload::SelectedFile;
use prescription_analyzer_domain::entities::reminder::ReminderDraft;
use prescription_analyzer_domain::services::{ReminderError, ReminderOutcome, ReminderPrompt};
use prescription_analyzer_domain::{create_default_prescription_service, PrescriptionService};

use super::commands::{AnalyzeArgs, Cli, Command, RemindArgs};
use super::prompt::StdinPrompt;
use super::render::render_view;

/// How a command ended once its output was printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

/// Run the parsed command line against the configured backend
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.client_config();
    debug!(base_url = %config.base_url, "Using prescription service");
    let mut service = create_default_prescription_service(config)
        .context("Invalid prescription service configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let status = match cli.command {
        Command::Analyze(args) => {
            let stdin = io::stdin();
            let prompt = StdinPrompt::new(stdin.lock(), io::stderr());
            handle_analyze(&mut service, &args, prompt, &mut out).await?
        }
        Command::Remind(args) => handle_remind(&service, &args, &mut out).await?,
    };

    Ok(status.into())
}

fn read_image(args: &AnalyzeArgs) -> Result<SelectedFile> {
    let name = args
        .image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.image.display().to_string());
    let bytes = std::fs::read(&args.image)
        .with_context(|| format!("Failed to read {}", args.image.display()))?;

    Ok(SelectedFile::image(name, bytes)?)
}

/// Analyze one image, print the panels and run the optional report and reminder steps
pub async fn handle_analyze<C, P, W>(
    service: &mut PrescriptionService<C>,
    args: &AnalyzeArgs,
    prompt: P,
    out: &mut W,
) -> Result<Status>
where
    C: PrescriptionClientTrait,
    P: ReminderPrompt,
    W: Write,
{
    let file = match read_image(args) {
        Ok(file) => file,
        Err(e) => {
            writeln!(out, "{}", e)?;
            return Ok(Status::Failure);
        }
    };
    service.select_file(Some(file));

    let analysis = service.analyze().await;

    if args.json {
        let body = match service.session().result() {
            Some(result) => serde_json::to_string_pretty(result)?,
            None => serde_json::to_string_pretty(&serde_json::json!({
                "error": service.view().error,
            }))?,
        };
        writeln!(out, "{}", body)?;
    } else {
        write!(out, "{}", render_view(&service.view()))?;
    }

    if analysis.is_err() {
        return Ok(Status::Failure);
    }

    let mut status = Status::Success;

    if args.report {
        match service.export_report(&args.out_dir) {
            Ok(path) => {
                info!(path = %path.display(), "Report exported");
                writeln!(out, "Report saved to {}", path.display())?;
            }
            Err(e) => {
                writeln!(out, "{}", e)?;
                status = Status::Failure;
            }
        }
    }

    if let Some(position) = args.remind {
        let medication = service
            .session()
            .result()
            .zip(position.checked_sub(1))
            .and_then(|(result, index)| result.medications.get(index))
            .cloned();

        let Some(medication) = medication else {
            writeln!(out, "No medication at position {}.", position)?;
            return Ok(Status::Failure);
        };

        match service.collect_and_submit_reminder(prompt, &medication).await {
            ReminderOutcome::Submitted(confirmation) => writeln!(out, "{}", confirmation.message)?,
            ReminderOutcome::Cancelled => debug!("Reminder cancelled"),
            ReminderOutcome::Rejected(message) => {
                writeln!(out, "{}", message)?;
                status = Status::Failure;
            }
            ReminderOutcome::Failed(e) => {
                writeln!(out, "Error: {}", e)?;
                status = Status::Failure;
            }
        }
    }

    Ok(status)
}

/// Build a reminder from flags and submit it
pub async fn handle_remind<C, W>(
    service: &PrescriptionService<C>,
    args: &RemindArgs,
    out: &mut W,
) -> Result<Status>
where
    C: PrescriptionClientTrait,
    W: Write,
{
    let draft = ReminderDraft {
        phone_number: args.phone.clone(),
        medication_name: args.medication.clone(),
        reminder_time: args.time.clone(),
        interval_type: args.interval.clone(),
        duration: args.duration.clone(),
    };

    match service.submit_reminder_draft(draft).await {
        Ok(confirmation) => {
            writeln!(out, "{}", confirmation.message)?;
            Ok(Status::Success)
        }
        Err(ReminderError::Invalid(errors)) => {
            for error in &errors {
                writeln!(out, "{}", error.message)?;
            }
            Ok(Status::Failure)
        }
        Err(e) => {
            writeln!(out, "Error: {}", e)?;
            Ok(Status::Failure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prescription_analyzer_data::client::ClientError;
    use prescription_analyzer_domain::services::reminder::PromptRequest;
    use prescription_analyzer_domain::testing::MockPrescriptionClient;
    use std::path::{Path, PathBuf};

    struct Scripted(Vec<&'static str>);

    impl ReminderPrompt for Scripted {
        fn ask(&mut self, _request: &PromptRequest) -> Option<String> {
            if self.0.is_empty() {
                None
            } else {
                Some(self.0.remove(0).to_string())
            }
        }
    }

    fn analyze_args(image: PathBuf, out_dir: &Path) -> AnalyzeArgs {
        AnalyzeArgs {
            image,
            report: false,
            out_dir: out_dir.to_path_buf(),
            json: false,
            remind: None,
        }
    }

    fn write_image(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        path
    }

    fn remind_args(phone: &str) -> RemindArgs {
        RemindArgs {
            medication: "Paracetamol".to_string(),
            phone: phone.to_string(),
            time: "09:00".to_string(),
            interval: "daily".to_string(),
            duration: "7".to_string(),
        }
    }

    #[tokio::test]
    async fn test_analyze_prints_panels_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "rx.png");
        let mut service = PrescriptionService::new(MockPrescriptionClient::new());
        let args = AnalyzeArgs {
            report: true,
            ..analyze_args(image, dir.path())
        };

        let mut out = Vec::new();
        let status = handle_analyze(&mut service, &args, Scripted(vec![]), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(status, Status::Success);
        assert!(text.contains("Selected: rx.png"));
        assert!(text.contains("City Hospital"));
        assert!(text.contains("1. Paracetamol"));
        assert!(text.contains("Report saved to"));
        assert!(dir.path().join("prescription_report.pdf").exists());
    }

    #[tokio::test]
    async fn test_non_image_is_refused_before_upload() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "hello").unwrap();
        let mut service = PrescriptionService::new(MockPrescriptionClient::new());

        let mut out = Vec::new();
        let status = handle_analyze(
            &mut service,
            &analyze_args(notes, dir.path()),
            Scripted(vec![]),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(status, Status::Failure);
        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            "Only image files are supported."
        );
    }

    #[tokio::test]
    async fn test_analysis_error_is_shown() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "rx.png");
        let client = MockPrescriptionClient::new()
            .with_analysis_error(ClientError::Server("Invalid image format".to_string()));
        let mut service = PrescriptionService::new(client);
        let args = AnalyzeArgs {
            json: true,
            ..analyze_args(image, dir.path())
        };

        let mut out = Vec::new();
        let status = handle_analyze(&mut service, &args, Scripted(vec![]), &mut out)
            .await
            .unwrap();

        assert_eq!(status, Status::Failure);
        let body: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(body["error"], "Invalid image format");
    }

    #[tokio::test]
    async fn test_analyze_then_remind() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "rx.png");
        let mut service = PrescriptionService::new(MockPrescriptionClient::new());
        let args = AnalyzeArgs {
            remind: Some(1),
            ..analyze_args(image, dir.path())
        };

        let mut out = Vec::new();
        let status = handle_analyze(
            &mut service,
            &args,
            Scripted(vec!["1234567890", "09:00", "daily", "7"]),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(status, Status::Success);
        assert!(String::from_utf8(out)
            .unwrap()
            .trim_end()
            .ends_with("Reminder set successfully"));
    }

    #[tokio::test]
    async fn test_remind_position_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "rx.png");
        let mut service = PrescriptionService::new(MockPrescriptionClient::new());
        let args = AnalyzeArgs {
            remind: Some(3),
            ..analyze_args(image, dir.path())
        };

        let mut out = Vec::new();
        let status = handle_analyze(&mut service, &args, Scripted(vec![]), &mut out)
            .await
            .unwrap();

        assert_eq!(status, Status::Failure);
        assert!(String::from_utf8(out).unwrap().contains("No medication at position 3."));
    }

    #[tokio::test]
    async fn test_remind_reports_field_errors() {
        let service = PrescriptionService::new(MockPrescriptionClient::new());
        let mut out = Vec::new();

        let status = handle_remind(&service, &remind_args("12345"), &mut out)
            .await
            .unwrap();

        assert_eq!(status, Status::Failure);
        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            "Invalid phone number. Please enter a 10-digit number."
        );
    }

    #[tokio::test]
    async fn test_remind_server_error() {
        let client = MockPrescriptionClient::new()
            .with_reminder_error(ClientError::NoResponse("timed out".to_string()));
        let service = PrescriptionService::new(client);
        let mut out = Vec::new();

        let status = handle_remind(&service, &remind_args("1234567890"), &mut out)
            .await
            .unwrap();

        assert_eq!(status, Status::Failure);
        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            "Error: Failed to set reminder. Please try again."
        );
    }
}
