//! Environment-driven application settings.
//!
//! Variable names are matched case-insensitively and unknown variables are
//! ignored. Every field has a default, so an empty environment is valid.
//! A `.env` file in the working directory supplies values the process
//! environment does not set.

use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use crate::lab::DEFAULT_ABNORMAL_PROBABILITY;

/// Application-level constants
pub const APP_NAME: &str = "DiagnoML";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const LAB_MOCK_SERVICE_NAME: &str = "DiagnoML Lab Mock Service";
pub const LAB_MOCK_SERVICE_VERSION: &str = "1.0.0";

/// Dotenv file read by `Settings::from_env`, relative to the working directory.
pub const ENV_FILE: &str = ".env";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("Invalid listen address {0}")]
    Address(String),
    #[error("Cannot read env file {path}: {reason}")]
    EnvFile { path: String, reason: String },
}

/// Settings loaded from environment variables.
#[derive(Clone, PartialEq)]
pub struct Settings {
    // GCP
    pub gcp_project_id: String,
    pub bq_dataset: String,
    pub bq_location: String,
    pub gcs_bucket: String,

    // OpenClinica
    pub oc_base_url: String,
    pub oc_client_id: String,
    pub oc_client_secret: String,
    pub oc_study_oid: String,

    // Prefect
    pub prefect_api_url: String,
    pub prefect_api_key: String,

    // MLflow
    pub mlflow_tracking_uri: String,
    pub mlflow_artifact_root: String,
    pub mlflow_experiment_name: String,

    // API
    pub api_host: String,
    pub api_port: u16,
    pub api_debug: bool,

    pub log_level: String,

    // Lab mock
    pub lab_abnormal_probability: f64,
    /// Base seed for reproducible lab values. `None` draws from OS entropy.
    pub lab_mock_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gcp_project_id: "diagnoml-poc".into(),
            bq_dataset: "diagnoml_warehouse".into(),
            bq_location: "EU".into(),
            gcs_bucket: "diagnoml-artifacts".into(),
            oc_base_url: "http://openclinica:8080/OpenClinica".into(),
            oc_client_id: String::new(),
            oc_client_secret: String::new(),
            oc_study_oid: "S_DIAGNOML".into(),
            prefect_api_url: String::new(),
            prefect_api_key: String::new(),
            mlflow_tracking_uri: "http://mlflow:5000".into(),
            mlflow_artifact_root: "gs://diagnoml-mlflow-artifacts".into(),
            mlflow_experiment_name: "diagnoml-experiments".into(),
            // Bind all interfaces for container deployments.
            api_host: "0.0.0.0".into(),
            api_port: 8000,
            api_debug: false,
            log_level: "INFO".into(),
            lab_abnormal_probability: DEFAULT_ABNORMAL_PROBABILITY,
            lab_mock_seed: None,
        }
    }
}

impl Settings {
    /// Load settings from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_file(Path::new(ENV_FILE))
    }

    /// Load settings from `path` overlaid by the process environment.
    ///
    /// A missing file is not an error.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let vars = merge_sources(read_env_file(path)?, std::env::vars());
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Load settings through `lookup`, which receives lowercase field names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Self::default();

        let strings: [(&str, &mut String); 15] = [
            ("gcp_project_id", &mut s.gcp_project_id),
            ("bq_dataset", &mut s.bq_dataset),
            ("bq_location", &mut s.bq_location),
            ("gcs_bucket", &mut s.gcs_bucket),
            ("oc_base_url", &mut s.oc_base_url),
            ("oc_client_id", &mut s.oc_client_id),
            ("oc_client_secret", &mut s.oc_client_secret),
            ("oc_study_oid", &mut s.oc_study_oid),
            ("prefect_api_url", &mut s.prefect_api_url),
            ("prefect_api_key", &mut s.prefect_api_key),
            ("mlflow_tracking_uri", &mut s.mlflow_tracking_uri),
            ("mlflow_artifact_root", &mut s.mlflow_artifact_root),
            ("mlflow_experiment_name", &mut s.mlflow_experiment_name),
            ("api_host", &mut s.api_host),
            ("log_level", &mut s.log_level),
        ];
        for (key, field) in strings {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        if let Some(value) = lookup("api_port") {
            s.api_port = parse_number("API_PORT", &value)?;
        }
        if let Some(value) = lookup("api_debug") {
            s.api_debug = parse_bool("API_DEBUG", &value)?;
        }
        if let Some(value) = lookup("lab_abnormal_probability") {
            let p: f64 = parse_number("LAB_ABNORMAL_PROBABILITY", &value)?;
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid {
                    key: "LAB_ABNORMAL_PROBABILITY",
                    value,
                    reason: "must be between 0 and 1".into(),
                });
            }
            s.lab_abnormal_probability = p;
        }
        if let Some(value) = lookup("lab_mock_seed") {
            if !value.trim().is_empty() {
                s.lab_mock_seed = Some(parse_number("LAB_MOCK_SEED", &value)?);
            }
        }

        Ok(s)
    }

    /// Socket address for `api_host` and `api_port`.
    ///
    /// `api_host` may be an IP literal or a host name; names are resolved
    /// and the first address is used.
    pub async fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.api_host.trim();
        let mut addrs = tokio::net::lookup_host((host, self.api_port))
            .await
            .map_err(|_| ConfigError::Address(self.api_host.clone()))?;
        addrs
            .next()
            .ok_or_else(|| ConfigError::Address(self.api_host.clone()))
    }

    /// `tracing` filter directive derived from `log_level` and `api_debug`.
    pub fn log_filter(&self) -> String {
        if self.api_debug {
            return "debug".into();
        }
        match self.log_level.to_ascii_lowercase().as_str() {
            "critical" | "fatal" => "error".into(),
            "warning" => "warn".into(),
            other => other.to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("gcp_project_id", &self.gcp_project_id)
            .field("bq_dataset", &self.bq_dataset)
            .field("bq_location", &self.bq_location)
            .field("gcs_bucket", &self.gcs_bucket)
            .field("oc_base_url", &self.oc_base_url)
            .field("oc_client_id", &self.oc_client_id)
            .field("oc_client_secret", &redact(&self.oc_client_secret))
            .field("oc_study_oid", &self.oc_study_oid)
            .field("prefect_api_url", &self.prefect_api_url)
            .field("prefect_api_key", &redact(&self.prefect_api_key))
            .field("mlflow_tracking_uri", &self.mlflow_tracking_uri)
            .field("mlflow_artifact_root", &self.mlflow_artifact_root)
            .field("mlflow_experiment_name", &self.mlflow_experiment_name)
            .field("api_host", &self.api_host)
            .field("api_port", &self.api_port)
            .field("api_debug", &self.api_debug)
            .field("log_level", &self.log_level)
            .field("lab_abnormal_probability", &self.lab_abnormal_probability)
            .field("lab_mock_seed", &self.lab_mock_seed)
            .finish()
    }
}

fn read_env_file(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let env_file_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    match dotenvy::from_path_iter(path) {
        Ok(entries) => entries.collect::<Result<_, _>>().map_err(env_file_error),
        Err(e) if e.not_found() => Ok(Vec::new()),
        Err(e) => Err(env_file_error(e)),
    }
}

/// Lowercased variables; `process` entries override `file` entries.
fn merge_sources<I>(file: Vec<(String, String)>, process: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    file.into_iter()
        .chain(process)
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect()
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "expected a boolean".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn default_settings() {
        let s = settings_from(&[]).unwrap();
        assert_eq!(s.gcp_project_id, "diagnoml-poc");
        assert_eq!(s.bq_dataset, "diagnoml_warehouse");
        assert_eq!(s.api_port, 8000);
        assert_eq!(s.log_level, "INFO");
        assert!(!s.api_debug);
        assert_eq!(s.lab_abnormal_probability, 0.3);
        assert_eq!(s.lab_mock_seed, None);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn settings_from_env_names() {
        let s = settings_from(&[("GCP_PROJECT_ID", "test-project"), ("API_PORT", "9000")]).unwrap();
        assert_eq!(s.gcp_project_id, "test-project");
        assert_eq!(s.api_port, 9000);
    }

    #[test]
    fn names_are_case_insensitive() {
        let s = settings_from(&[("Mlflow_Tracking_Uri", "http://localhost:5000")]).unwrap();
        assert_eq!(s.mlflow_tracking_uri, "http://localhost:5000");
    }

    #[test]
    fn unknown_variables_are_ignored() {
        let s = settings_from(&[("SOMETHING_ELSE", "x"), ("PATH", "/usr/bin")]).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn invalid_port_is_reported() {
        let err = settings_from(&[("API_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "API_PORT", .. }));
        assert!(settings_from(&[("API_PORT", "70000")]).is_err());
    }

    #[test]
    fn debug_flag_parsing() {
        assert!(settings_from(&[("API_DEBUG", "true")]).unwrap().api_debug);
        assert!(settings_from(&[("API_DEBUG", "1")]).unwrap().api_debug);
        assert!(!settings_from(&[("API_DEBUG", "off")]).unwrap().api_debug);
        assert!(settings_from(&[("API_DEBUG", "maybe")]).is_err());
    }

    #[test]
    fn abnormal_probability_must_be_a_fraction() {
        let s = settings_from(&[("LAB_ABNORMAL_PROBABILITY", "0.5")]).unwrap();
        assert_eq!(s.lab_abnormal_probability, 0.5);
        assert!(settings_from(&[("LAB_ABNORMAL_PROBABILITY", "1.5")]).is_err());
        assert!(settings_from(&[("LAB_ABNORMAL_PROBABILITY", "-0.1")]).is_err());
    }

    #[test]
    fn seed_parsing() {
        assert_eq!(settings_from(&[("LAB_MOCK_SEED", "42")]).unwrap().lab_mock_seed, Some(42));
        assert_eq!(settings_from(&[("LAB_MOCK_SEED", "")]).unwrap().lab_mock_seed, None);
        assert!(settings_from(&[("LAB_MOCK_SEED", "abc")]).is_err());
    }

    #[tokio::test]
    async fn listen_addr_from_ip_literal() {
        let s = settings_from(&[("API_HOST", "127.0.0.1"), ("API_PORT", "9100")]).unwrap();
        assert_eq!(
            s.listen_addr().await.unwrap(),
            "127.0.0.1:9100".parse::<SocketAddr>().unwrap()
        );
    }

    #[tokio::test]
    async fn listen_addr_resolves_localhost() {
        let s = settings_from(&[("API_HOST", "localhost"), ("API_PORT", "8000")]).unwrap();
        let addr = s.listen_addr().await.unwrap();
        assert!(addr.ip().is_loopback(), "{addr}");
        assert_eq!(addr.port(), 8000);
    }

    #[tokio::test]
    async fn listen_addr_rejects_unresolvable_host() {
        let s = settings_from(&[("API_HOST", "lab-mock.invalid")]).unwrap();
        assert_eq!(
            s.listen_addr().await,
            Err(ConfigError::Address("lab-mock.invalid".into()))
        );
    }

    fn write_env_file(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(".env");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn env_file_supplies_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env_file(&dir, "OC_STUDY_OID=S_FROM_FILE\nmlflow_experiment_name=file-exp\n");
        let s = Settings::from_env_file(&path).unwrap();
        assert_eq!(s.oc_study_oid, "S_FROM_FILE");
        assert_eq!(s.mlflow_experiment_name, "file-exp");
    }

    #[test]
    fn process_values_override_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env_file(&dir, "GCP_PROJECT_ID=from-file\nAPI_PORT=9001\n");
        let vars = merge_sources(
            read_env_file(&path).unwrap(),
            vec![("gcp_project_id".to_string(), "from-process".to_string())],
        );
        let s = Settings::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(s.gcp_project_id, "from-process");
        assert_eq!(s.api_port, 9001);
    }

    #[test]
    fn missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let entries = read_env_file(&dir.path().join(".env")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn malformed_env_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env_file(&dir, "this line is not an assignment\n");
        assert!(matches!(read_env_file(&path), Err(ConfigError::EnvFile { .. })));
    }

    #[test]
    fn log_filter_follows_level_and_debug() {
        assert_eq!(Settings::default().log_filter(), "info");
        let s = settings_from(&[("LOG_LEVEL", "WARNING")]).unwrap();
        assert_eq!(s.log_filter(), "warn");
        let s = settings_from(&[("LOG_LEVEL", "ERROR"), ("API_DEBUG", "yes")]).unwrap();
        assert_eq!(s.log_filter(), "debug");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let s = settings_from(&[("OC_CLIENT_SECRET", "hunter2"), ("PREFECT_API_KEY", "pk-123")])
            .unwrap();
        let rendered = format!("{s:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("pk-123"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "1.0.0");
    }
}
