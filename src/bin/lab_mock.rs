//! DiagnoML lab mock service.

use std::process::ExitCode;

use diagnoml_lab_mock::Service;

#[tokio::main]
async fn main() -> ExitCode {
    diagnoml_lab_mock::run(Service::LabMock).await
}
