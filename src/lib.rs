pub mod api; // HTTP routers, endpoints, server lifecycle
pub mod config;
pub mod lab; // Synthetic lab result generation
pub mod models;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::Settings;

/// The two HTTP services this crate can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    LabMock,
    DiagnomlApi,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Service::LabMock => "lab-mock",
            Service::DiagnomlApi => "diagnoml-api",
        }
    }

    fn router(self, settings: &Settings) -> axum::Router {
        match self {
            Service::LabMock => api::lab_mock_router(settings.clone()),
            Service::DiagnomlApi => api::diagnoml_router(),
        }
    }
}

/// Initialize tracing. `RUST_LOG` wins over the configured level.
pub fn init_tracing(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_filter())),
        )
        .init();
}

/// Load settings, serve `service` until Ctrl-C, then shut down gracefully.
pub async fn run(service: Service) -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: configuration error: {e}", service.name());
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings);
    tracing::info!("{} {} starting v{}", config::APP_NAME, service.name(), config::APP_VERSION);
    tracing::debug!(?settings, "Loaded settings");

    let addr = match settings.listen_addr().await {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut server = match api::start_server(service.name(), service.router(&settings), addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    server.shutdown();
    server.stopped().await;
    ExitCode::SUCCESS
}
