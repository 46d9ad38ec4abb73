// End-to-end session scenarios against a local fake backend

use axum::{
    extract::{Json, Multipart},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use prescription_analyzer_domain::data::client::ClientConfig;
use prescription_analyzer_domain::data::models::upload::SelectedFile;
use prescription_analyzer_domain::entities::prescription::NOT_AVAILABLE;
use prescription_analyzer_domain::entities::reminder::ReminderDraft;
use prescription_analyzer_domain::entities::session::PanelContent;
use prescription_analyzer_domain::services::report::REPORT_FILE_NAME;
use prescription_analyzer_domain::services::ReminderError;
use prescription_analyzer_domain::{
    create_default_prescription_service, AnalysisError, SessionState,
};

async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn city_hospital(mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        assert_eq!(field.name(), Some("file"));
    }

    Json(json!({
        "hospital_details": { "name": "City Hospital" },
        "prescription_info": { "patient_name": "A. Kumar" },
        "medications": [{
            "tablet_name": "Paracetamol",
            "instructions": { "dosage": "500mg" },
            "estimated_price_range_inr": "₹20-30"
        }]
    }))
}

async fn rejects_image() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Invalid image format" })),
    )
}

async fn confirms_reminder(Json(body): Json<Value>) -> impl IntoResponse {
    assert_eq!(body["interval_type"], "weekly");
    assert_eq!(body["duration"], 3);
    Json(json!({ "message": "Reminder set successfully" }))
}

fn prescription_photo() -> SelectedFile {
    SelectedFile::image("prescription.jpg", vec![0xff, 0xd8, 0xff, 0xe0]).unwrap()
}

#[tokio::test]
async fn test_successful_analysis_populates_panels() {
    let base_url = spawn_backend(
        Router::new().route("/api/analyze-prescription", post(city_hospital)),
    )
    .await;
    let mut service = create_default_prescription_service(ClientConfig::new(base_url)).unwrap();

    service.select_file(Some(prescription_photo()));
    let state = service.analyze().await.unwrap();
    assert_eq!(state, SessionState::Populated);

    let view = service.view();
    assert_eq!(view.file_name.as_deref(), Some("prescription.jpg"));
    assert_eq!(view.error, None);
    assert!(view.report_enabled);

    let PanelContent::Populated {
        details,
        medications,
        ..
    } = view.content
    else {
        panic!("expected populated panels");
    };

    let details = details.unwrap();
    assert_eq!(details.hospital_name, "City Hospital");
    assert_eq!(details.patient_name, "A. Kumar");
    assert_eq!(details.doctor_name, NOT_AVAILABLE);

    assert_eq!(medications.len(), 1);
    let row = &medications[0];
    assert_eq!(row.name, "Paracetamol");
    assert_eq!(row.dosage.value, "500mg");
    assert_eq!(row.frequency.value, NOT_AVAILABLE);
    assert_eq!(row.duration.value, NOT_AVAILABLE);
    assert_eq!(row.timing.value, NOT_AVAILABLE);
    assert_eq!(row.estimated_price, "₹20-30");

    // Storage keeps the absence; only the view says N/A
    let stored = service.session().result().unwrap();
    assert_eq!(stored.medications[0].instructions.frequency, None);

    let dir = tempfile::tempdir().unwrap();
    let path = service.export_report(dir.path()).unwrap();
    assert_eq!(path.file_name().unwrap(), REPORT_FILE_NAME);
    assert_eq!(&std::fs::read(path).unwrap()[0..4], b"%PDF");
}

#[tokio::test]
async fn test_server_error_ends_in_failed_state() {
    let base_url = spawn_backend(
        Router::new().route("/api/analyze-prescription", post(rejects_image)),
    )
    .await;
    let mut service = create_default_prescription_service(ClientConfig::new(base_url)).unwrap();

    service.select_file(Some(prescription_photo()));
    let err = service.analyze().await.unwrap_err();

    assert_eq!(err, AnalysisError::Server("Invalid image format".to_string()));
    let view = service.view();
    assert_eq!(view.state, SessionState::Failed);
    assert_eq!(view.error.as_deref(), Some("Invalid image format"));
    assert_eq!(view.content, PanelContent::Placeholder);
    assert!(service.session().result().is_none());
}

#[tokio::test]
async fn test_unreachable_backend_reports_no_response() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut service =
        create_default_prescription_service(ClientConfig::new(format!("http://{}", addr)))
            .unwrap();
    service.select_file(Some(prescription_photo()));

    assert_eq!(service.analyze().await.unwrap_err(), AnalysisError::NoResponse);
    assert_eq!(service.view().error.as_deref(), Some("No response from server."));
}

#[tokio::test]
async fn test_reminder_draft_round_trip() {
    let base_url = spawn_backend(
        Router::new().route("/api/set-reminder", post(confirms_reminder)),
    )
    .await;
    let service = create_default_prescription_service(ClientConfig::new(base_url)).unwrap();

    let confirmation = service
        .submit_reminder_draft(ReminderDraft {
            phone_number: "9876543210".to_string(),
            medication_name: "Paracetamol".to_string(),
            reminder_time: "08:15".to_string(),
            interval_type: " Weekly ".to_string(),
            duration: "3".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(confirmation.message, "Reminder set successfully");

    let err = service
        .submit_reminder_draft(ReminderDraft::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ReminderError::Invalid(ref errors) if errors.len() == 5));
}
