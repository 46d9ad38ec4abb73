use prescription_analyzer_data::models::prescription::{AnalysisResult, Medication};

use crate::entities::prescription::{display_or_na, DetailsView, InstructionLine, MedicationRow};

// Conversion functions from stored analysis data to display models.
// These functions follow the pattern convert_to_[target]

/// Name used for a medication in reminder prompts and requests
pub const FALLBACK_MEDICATION_NAME: &str = "this medication";

/// Whether the result holds any of the key details worth a details panel:
/// hospital name, doctor name, patient name or prescription date
pub fn has_key_details(result: &AnalysisResult) -> bool {
    let present = |value: &Option<String>| value.as_deref().is_some_and(|text| !text.is_empty());
    let info = &result.prescription_info;

    present(&result.hospital_details.name)
        || present(&info.doctor_name)
        || present(&info.patient_name)
        || present(&info.date)
}

/// Convert an analysis result into the details panel, or `None` when it has no key details
pub fn convert_to_details_view(result: &AnalysisResult) -> Option<DetailsView> {
    if !has_key_details(result) {
        return None;
    }

    let hospital = &result.hospital_details;
    let info = &result.prescription_info;

    Some(DetailsView {
        hospital_name: display_or_na(hospital.name.as_deref()),
        hospital_address: display_or_na(hospital.address.as_deref()),
        hospital_phone: display_or_na(hospital.phone.as_deref()),
        doctor_name: display_or_na(info.doctor_name.as_deref()),
        doctor_reg_no: display_or_na(info.doctor_reg_no.as_deref()),
        doctor_contact: display_or_na(info.doctor_contact.as_deref()),
        patient_name: display_or_na(info.patient_name.as_deref()),
        patient_age: display_or_na(info.patient_age.as_deref()),
        patient_gender: display_or_na(info.patient_gender.as_deref()),
        prescription_date: display_or_na(info.date.as_deref()),
    })
}

/// Convert a stored medication into a medications panel row
pub fn convert_to_medication_row(medication: &Medication) -> MedicationRow {
    let instructions = &medication.instructions;
    let sources = &medication.source_details;
    let confidence = &medication.confidence_details;

    let line = |value: &Option<String>, source: &Option<String>, certainty: &Option<String>| {
        InstructionLine {
            value: display_or_na(value.as_deref()),
            source: display_or_na(source.as_deref()),
            confidence: display_or_na(certainty.as_deref()),
        }
    };

    MedicationRow {
        name: display_or_na(medication.tablet_name.as_deref()),
        name_confidence: display_or_na(confidence.tablet_name.as_deref()),
        dosage: line(&instructions.dosage, &sources.dosage, &confidence.dosage),
        frequency: line(&instructions.frequency, &sources.frequency, &confidence.frequency),
        duration: line(&instructions.duration, &sources.duration, &confidence.duration),
        timing: line(&instructions.timing, &sources.timing, &confidence.timing),
        estimated_price: display_or_na(medication.estimated_price_range_inr.as_deref()),
    }
}

/// Name a reminder refers to: the tablet name, or a generic phrase when it is missing
pub fn convert_to_reminder_medication_name(medication: &Medication) -> String {
    match medication.tablet_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => FALLBACK_MEDICATION_NAME.to_string(),
    }
}
