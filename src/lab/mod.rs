//! Lab mock service: synthetic results for the diagnosis pipeline.
//!
//! Request handling lives here so it can be exercised without HTTP; the
//! axum endpoints in `api::endpoints::labs` are thin wrappers.

pub mod generator;
pub mod reference;

use chrono::Utc;
use rand::Rng;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::{LabResponse, LabResult};
pub use generator::{LabGenerator, Sample, DEFAULT_ABNORMAL_PROBABILITY};
pub use reference::{lookup, test_names, Gaussian, TestProfile, PANEL};

#[derive(Debug, thiserror::Error)]
pub enum LabError {
    #[error("No valid test types provided. Available: {}", quoted_list(.available))]
    NoValidTestTypes { available: Vec<String> },
}

/// `['a', 'b']`, the list rendering clients of the lab service match on.
fn quoted_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Generate results for the requested test types, in request order.
///
/// Unknown types are skipped. Fails only when nothing is left.
pub fn request_results<R: Rng>(
    gen: &mut LabGenerator<R>,
    patient_id: &str,
    test_types: &[String],
) -> Result<LabResponse, LabError> {
    let results: Vec<LabResult> = test_types
        .iter()
        .filter_map(|t| reference::lookup(t))
        .map(|profile| gen.result_for(profile))
        .collect();

    if results.is_empty() {
        return Err(LabError::NoValidTestTypes {
            available: test_names().into_iter().map(String::from).collect(),
        });
    }

    tracing::debug!(patient_id, count = results.len(), "Generated requested lab results");
    Ok(respond(gen, patient_id, results))
}

/// Generate one result for every test in the reference table.
pub fn full_panel<R: Rng>(gen: &mut LabGenerator<R>, patient_id: &str) -> LabResponse {
    let results = PANEL.iter().map(|profile| gen.result_for(profile)).collect();
    respond(gen, patient_id, results)
}

fn respond<R: Rng>(
    gen: &mut LabGenerator<R>,
    patient_id: &str,
    results: Vec<LabResult>,
) -> LabResponse {
    LabResponse {
        patient_id: patient_id.to_string(),
        results,
        lab_id: gen.lab_id(),
        processed_at: Utc::now(),
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ReferenceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TestInfo {
    pub unit: &'static str,
    pub reference_range: ReferenceRange,
}

impl From<&TestProfile> for TestInfo {
    fn from(p: &TestProfile) -> Self {
        TestInfo {
            unit: p.unit,
            reference_range: ReferenceRange { min: p.min, max: p.max },
        }
    }
}

/// Unit and reference range of every supported test.
///
/// Serializes as a map keyed by test type, in panel order.
#[derive(Debug, Clone, Copy)]
pub struct TestCatalog {
    profiles: &'static [TestProfile],
}

impl TestCatalog {
    pub fn get(&self, test_type: &str) -> Option<TestInfo> {
        self.profiles
            .iter()
            .find(|p| p.test_type == test_type)
            .map(TestInfo::from)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, TestInfo)> {
        self.profiles.iter().map(|p| (p.test_type, TestInfo::from(p)))
    }
}

impl Serialize for TestCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (test_type, info) in self.iter() {
            map.serialize_entry(test_type, &info)?;
        }
        map.end()
    }
}

/// Catalog of every supported test.
pub fn available_tests() -> TestCatalog {
    TestCatalog { profiles: &PANEL }
}
