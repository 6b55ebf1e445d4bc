//! Service metadata at `GET /`.

use axum::Json;
use serde::Serialize;

use crate::config::{APP_NAME, APP_VERSION, LAB_MOCK_SERVICE_NAME, LAB_MOCK_SERVICE_VERSION};
use crate::lab;

#[derive(Serialize)]
pub struct LabMockInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub available_tests: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct Welcome {
    pub message: String,
    pub version: &'static str,
}

/// `GET /` on the lab mock service — name, version and supported tests.
pub async fn lab_mock() -> Json<LabMockInfo> {
    Json(LabMockInfo {
        service: LAB_MOCK_SERVICE_NAME,
        version: LAB_MOCK_SERVICE_VERSION,
        available_tests: lab::test_names(),
    })
}

/// `GET /` on the DiagnoML API.
pub async fn diagnoml() -> Json<Welcome> {
    Json(Welcome {
        message: format!("Welcome to {APP_NAME} API"),
        version: APP_VERSION,
    })
}
