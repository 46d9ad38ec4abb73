use serde::{Deserialize, Serialize};

use super::lenient;

/// Hospital or clinic block of an analyzed prescription
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalDetails {
    /// Hospital or clinic name
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: Option<String>,

    /// Postal address
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: Option<String>,

    /// Contact phone number
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,
}

/// Doctor, patient and date block of an analyzed prescription
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionInfo {
    /// Prescribing doctor
    #[serde(default, deserialize_with = "lenient::text")]
    pub doctor_name: Option<String>,

    /// Doctor's registration number
    #[serde(default, deserialize_with = "lenient::text")]
    pub doctor_reg_no: Option<String>,

    /// Doctor's contact details
    #[serde(default, deserialize_with = "lenient::text")]
    pub doctor_contact: Option<String>,

    /// Patient name
    #[serde(default, deserialize_with = "lenient::text")]
    pub patient_name: Option<String>,

    /// Patient age, kept as free text ("45", "45 yrs")
    #[serde(default, deserialize_with = "lenient::text")]
    pub patient_age: Option<String>,

    /// Patient gender
    #[serde(default, deserialize_with = "lenient::text")]
    pub patient_gender: Option<String>,

    /// Date written on the prescription
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
}

/// Dosage instructions for a single medication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    /// Amount per intake (e.g. "500mg")
    #[serde(default, deserialize_with = "lenient::text")]
    pub dosage: Option<String>,

    /// How often to take it (e.g. "1-0-1")
    #[serde(default, deserialize_with = "lenient::text")]
    pub frequency: Option<String>,

    /// For how long (e.g. "5 days")
    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: Option<String>,

    /// When to take it relative to meals
    #[serde(default, deserialize_with = "lenient::text")]
    pub timing: Option<String>,
}

/// Where each instruction value came from ("Prescription" or "AI Suggested").
/// Same shape as [`Instructions`].
pub type SourceDetails = Instructions;

/// Self-reported certainty of the analysis service for each extracted value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceDetails {
    #[serde(default, deserialize_with = "lenient::text")]
    pub tablet_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub dosage: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub frequency: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: Option<String>,

    #[serde(default, deserialize_with = "lenient::text")]
    pub timing: Option<String>,
}

/// A single prescribed medication
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    /// Name of the tablet or preparation
    #[serde(default, deserialize_with = "lenient::text")]
    pub tablet_name: Option<String>,

    /// Dosage instructions
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub instructions: Instructions,

    /// Provenance of each instruction value
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub source_details: SourceDetails,

    /// Confidence of each extracted value
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub confidence_details: ConfidenceDetails,

    /// Rough price range in INR, free text (e.g. "₹20-30 per strip")
    #[serde(default, deserialize_with = "lenient::text")]
    pub estimated_price_range_inr: Option<String>,
}

/// Structured result of a prescription analysis.
///
/// Missing, `null` or malformed top-level sections deserialize to their empty
/// form; absence inside a section is kept as `None` so that placeholders are
/// applied only when the result is displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Hospital or clinic details
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub hospital_details: HospitalDetails,

    /// Doctor, patient and date details
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub prescription_info: PrescriptionInfo,

    /// Prescribed medications in the order they appear
    #[serde(default, deserialize_with = "lenient::object_list")]
    pub medications: Vec<Medication>,
}

impl AnalysisResult {
    /// Whether the result holds no data at all
    pub fn is_empty(&self) -> bool {
        self.hospital_details == HospitalDetails::default()
            && self.prescription_info == PrescriptionInfo::default()
            && self.medications.is_empty()
    }
}
