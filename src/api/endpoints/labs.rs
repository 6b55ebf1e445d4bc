//! Lab mock endpoints.
//!
//! - `POST /api/v1/lab/request` — results for selected test types
//! - `GET /api/v1/lab/results/:patient_id` — full panel for a patient
//! - `GET /api/v1/lab/tests` — supported tests and reference ranges

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::lab::{self, TestCatalog};
use crate::models::{LabRequest, LabResponse};

#[derive(Serialize)]
pub struct TestsResponse {
    pub tests: TestCatalog,
}

/// `POST /api/v1/lab/request` — generate results for the requested tests.
///
/// Unknown test types are dropped; if none remain the request is rejected
/// with the list of supported types.
pub async fn request(
    State(ctx): State<ApiContext>,
    payload: Result<Json<LabRequest>, JsonRejection>,
) -> Result<Json<LabResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut gen = ctx.generator();
    let response = lab::request_results(&mut gen, &req.patient_id, &req.test_types)
        .inspect_err(|_| {
            tracing::warn!(
                patient_id = %req.patient_id,
                requested = ?req.test_types,
                "Lab request had no valid test types"
            );
        })?;

    tracing::info!(
        patient_id = %response.patient_id,
        lab_id = %response.lab_id,
        results = response.results.len(),
        out_of_range = response.out_of_range(),
        "Lab results generated"
    );
    Ok(Json(response))
}

/// `GET /api/v1/lab/results/:patient_id` — full panel, always succeeds.
pub async fn results(
    State(ctx): State<ApiContext>,
    Path(patient_id): Path<String>,
) -> Json<LabResponse> {
    let mut gen = ctx.generator();
    let response = lab::full_panel(&mut gen, &patient_id);

    tracing::info!(
        patient_id = %response.patient_id,
        lab_id = %response.lab_id,
        out_of_range = response.out_of_range(),
        "Lab panel generated"
    );
    Json(response)
}

/// `GET /api/v1/lab/tests` — unit and reference range per test type, in
/// panel order.
pub async fn tests() -> Json<TestsResponse> {
    Json(TestsResponse {
        tests: lab::available_tests(),
    })
}
