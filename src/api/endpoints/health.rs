//! Health check endpoints.

use axum::Json;
use serde::Serialize;

use crate::config::APP_VERSION;

#[derive(Serialize)]
pub struct LabMockHealth {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct ApiHealth {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health` on the lab mock service.
pub async fn lab_mock() -> Json<LabMockHealth> {
    Json(LabMockHealth {
        status: "healthy",
        service: "lab-mock",
    })
}

/// `GET /health` on the DiagnoML API.
pub async fn diagnoml() -> Json<ApiHealth> {
    Json(ApiHealth {
        status: "healthy",
        version: APP_VERSION,
    })
}
