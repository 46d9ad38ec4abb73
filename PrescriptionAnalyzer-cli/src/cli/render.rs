// Plain-text rendering of the session panels

use std::fmt::Write;

use chrono::{DateTime, FixedOffset, Utc};
use prescription_analyzer_domain::entities::prescription::{
    DetailsView, InstructionLine, MedicationRow, DETAILS_PLACEHOLDER, MEDICATIONS_PLACEHOLDER,
};
use prescription_analyzer_domain::entities::session::PanelContent;
use prescription_analyzer_domain::SessionView;

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Analysis time as shown in the details panel, in India Standard Time
pub fn format_analysis_time(at: DateTime<Utc>) -> String {
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(ist) => at.with_timezone(&ist).format("%d %b %Y, %I:%M:%S %p").to_string(),
        None => at.to_rfc3339(),
    }
}

fn upload_panel(view: &SessionView, out: &mut String) {
    let _ = writeln!(out, "== Upload Prescription ==");
    match &view.file_name {
        Some(name) => {
            let _ = writeln!(out, "Selected: {}", name);
        }
        None => {
            let _ = writeln!(out, "No file selected");
        }
    }
    let _ = writeln!(out, "Note: Only image files are supported.");
}

fn details_panel(details: &DetailsView, analyzed_at: DateTime<Utc>, out: &mut String) {
    let _ = writeln!(out, "Hospital/Clinic");
    let _ = writeln!(out, "  Name: {}", details.hospital_name);
    let _ = writeln!(out, "  Address: {}", details.hospital_address);
    let _ = writeln!(out, "  Contact: {}", details.hospital_phone);
    let _ = writeln!(out, "Doctor");
    let _ = writeln!(out, "  Name: {}", details.doctor_name);
    let _ = writeln!(out, "  Registration No: {}", details.doctor_reg_no);
    let _ = writeln!(out, "  Contact: {}", details.doctor_contact);
    let _ = writeln!(out, "Patient");
    let _ = writeln!(out, "  Name: {}", details.patient_name);
    let _ = writeln!(out, "  Age: {}", details.patient_age);
    let _ = writeln!(out, "  Gender: {}", details.patient_gender);
    let _ = writeln!(out, "Prescription Date");
    let _ = writeln!(out, "  {}", details.prescription_date);
    let _ = writeln!(out, "Analysis Time");
    let _ = writeln!(out, "  {}", format_analysis_time(analyzed_at));
}

fn instruction(label: &str, line: &InstructionLine, out: &mut String) {
    let _ = writeln!(
        out,
        "   {}: {} ({}, Conf: {})",
        label, line.value, line.source, line.confidence
    );
}

fn medication(position: usize, row: &MedicationRow, out: &mut String) {
    let _ = writeln!(out, "{}. {} (Conf: {})", position, row.name, row.name_confidence);
    instruction("Dosage", &row.dosage, out);
    instruction("Frequency", &row.frequency, out);
    instruction("Duration", &row.duration, out);
    instruction("Timing", &row.timing, out);
    let _ = writeln!(out, "   Est. Price (India): {} (General estimate)", row.estimated_price);
}

/// Render the upload, details and medications panels followed by the error banner
pub fn render_view(view: &SessionView) -> String {
    let mut out = String::new();
    upload_panel(view, &mut out);

    let _ = writeln!(out, "\n== Prescription Details ==");
    match &view.content {
        PanelContent::Loading => {
            let _ = writeln!(out, "Analyzing...");
        }
        PanelContent::Populated {
            details: Some(details),
            analyzed_at,
            ..
        } => details_panel(details, *analyzed_at, &mut out),
        _ => {
            let _ = writeln!(out, "{}", DETAILS_PLACEHOLDER);
        }
    }

    let _ = writeln!(out, "\n== Medications ==");
    match &view.content {
        PanelContent::Loading => {
            let _ = writeln!(out, "Analyzing...");
        }
        PanelContent::Populated { medications, .. } if !medications.is_empty() => {
            for (index, row) in medications.iter().enumerate() {
                medication(index + 1, row, &mut out);
            }
        }
        _ => {
            let _ = writeln!(out, "{}", MEDICATIONS_PLACEHOLDER);
        }
    }

    if let Some(error) = &view.error {
        let _ = writeln!(out, "\n{}", error);
    }

    out
}
