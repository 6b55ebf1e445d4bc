use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Test types requested when the caller omits `test_types`.
///
/// `cholesterol` is not a reference-table key and is dropped during
/// filtering, so the default request yields `hba1c` and `crp`.
pub const DEFAULT_TEST_TYPES: [&str; 3] = ["hba1c", "cholesterol", "crp"];

fn default_test_types() -> Vec<String> {
    DEFAULT_TEST_TYPES.iter().map(|t| t.to_string()).collect()
}

/// Body of `POST /api/v1/lab/request`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabRequest {
    pub patient_id: String,
    #[serde(default = "default_test_types")]
    pub test_types: Vec<String>,
}

/// A single synthetic lab test result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    pub test_type: String,
    pub value: f64,
    pub unit: String,
    pub reference_min: f64,
    pub reference_max: f64,
    pub timestamp: DateTime<Utc>,
}

impl LabResult {
    /// Whether the value falls outside the reference range.
    pub fn is_outside_range(&self) -> bool {
        self.value < self.reference_min || self.value > self.reference_max
    }
}

/// Results for one patient, tagged with a generated lab order id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabResponse {
    pub patient_id: String,
    pub results: Vec<LabResult>,
    pub lab_id: String,
    pub processed_at: DateTime<Utc>,
}

impl LabResponse {
    /// Number of results outside their reference range.
    pub fn out_of_range(&self) -> usize {
        self.results.iter().filter(|r| r.is_outside_range()).count()
    }
}
