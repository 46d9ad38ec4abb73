//! Display models for an analyzed prescription.
//!
//! Stored results keep absent values as `None`; the placeholders below are only
//! applied when a result is turned into one of these views.

use serde::Serialize;

/// Placeholder shown for any absent or empty value
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown in the details panel when no key detail was extracted
pub const DETAILS_PLACEHOLDER: &str = "Upload an image to see prescription details here.";

/// Shown in the medications panel when there is nothing to list
pub const MEDICATIONS_PLACEHOLDER: &str = "Medication details will appear here after analysis.";

/// Render an optional value, substituting [`NOT_AVAILABLE`] for absent or empty text
pub fn display_or_na(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Hospital, doctor and patient details ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsView {
    pub hospital_name: String,
    pub hospital_address: String,
    pub hospital_phone: String,
    pub doctor_name: String,
    pub doctor_reg_no: String,
    pub doctor_contact: String,
    pub patient_name: String,
    pub patient_age: String,
    pub patient_gender: String,
    pub prescription_date: String,
}

/// One instruction value with its provenance and confidence labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionLine {
    /// The instruction itself (e.g. "500mg")
    pub value: String,

    /// Where the value came from (e.g. "Prescription", "AI Suggested")
    pub source: String,

    /// Confidence reported by the analysis service
    pub confidence: String,
}

/// A medication row of the medications panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicationRow {
    /// Tablet name
    pub name: String,

    /// Confidence reported for the tablet name
    pub name_confidence: String,

    pub dosage: InstructionLine,
    pub frequency: InstructionLine,
    pub duration: InstructionLine,
    pub timing: InstructionLine,

    /// Estimated price range in INR
    pub estimated_price: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_or_na() {
        assert_eq!(display_or_na(Some("500mg")), "500mg");
        assert_eq!(display_or_na(Some("")), NOT_AVAILABLE);
        assert_eq!(display_or_na(None), NOT_AVAILABLE);
        // Whitespace is content as far as the placeholder is concerned
        assert_eq!(display_or_na(Some(" ")), " ");
    }
}
