//! CLI command implementations
//!
//! Every command loads the form service explicitly from the configured
//! data directory before doing anything else. A load failure is fatal.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::init_tracing;
use crate::schema::{UnexpectedFieldPolicy, ValidationPolicy};
use crate::service::FormService;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_submission, write_json};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding form.json, cities.json and schools.json
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Host, port and CORS origins
    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Reject submitted keys the schema does not declare (default: false)
    #[serde(default)]
    pub strict_unexpected_fields: bool,

    /// Props that accept any string or number (default: ["school"])
    #[serde(default = "default_loose_type_fields")]
    pub loose_type_fields: Vec<String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_loose_type_fields() -> Vec<String> {
    vec!["school".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            http: HttpServerConfig::default(),
            strict_unexpected_fields: false,
            loose_type_fields: default_loose_type_fields(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }

        Ok(())
    }

    /// Validation policy described by this config
    pub fn policy(&self) -> ValidationPolicy {
        let unexpected = if self.strict_unexpected_fields {
            UnexpectedFieldPolicy::Strict
        } else {
            UnexpectedFieldPolicy::Lenient
        };

        ValidationPolicy::default()
            .with_unexpected_fields(unexpected)
            .with_loose_type_props(self.loose_type_fields.iter().cloned())
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    init_tracing();
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            port,
            strict,
        } => serve(config.as_deref(), port, strict),
        Command::Validate {
            config,
            input,
            strict,
        } => validate(config.as_deref(), &input, strict),
        Command::Inspect { config } => inspect(config.as_deref()),
    }
}

fn load_service(config: &Config) -> CliResult<FormService> {
    Ok(FormService::load(&config.data_dir, config.policy())?)
}

/// Serve the form API until the process is stopped
pub fn serve(config_path: Option<&Path>, port: Option<u16>, strict: bool) -> CliResult<()> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }
    config.strict_unexpected_fields |= strict;

    let service = Arc::new(load_service(&config)?);
    let server = HttpServer::new(config.http.clone(), service);

    info!(addr = %server.socket_addr(), "starting form API");

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate one submission file and print the outcome
pub fn validate(config_path: Option<&Path>, input: &Path, strict: bool) -> CliResult<()> {
    let mut config = Config::load_or_default(config_path)?;
    config.strict_unexpected_fields |= strict;

    let service = load_service(&config)?;
    let data = read_submission(input)?;
    let response = service.submit(&data);

    write_json(&response)?;

    match &response.errors {
        Some(errors) if !response.success => Err(CliError::validation_failed(errors.len())),
        _ => Ok(()),
    }
}

/// Print a summary of the loaded form
pub fn inspect(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    let service = load_service(&config)?;

    let steps: Vec<_> = service
        .form()
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let fields: Vec<_> = step
                .fields
                .iter()
                .map(|field| {
                    json!({
                        "prop": field.prop,
                        "label": field.label,
                        "kind": field.kind.kind_name(),
                        "required": field.is_required(),
                        "looseTyped": service.policy().is_loose_typed(&field.prop),
                    })
                })
                .collect();
            json!({ "index": index, "title": step.title, "fields": fields })
        })
        .collect();

    write_json(&json!({
        "dataDir": config.data_dir,
        "unexpectedFields": service.policy().unexpected_fields,
        "cities": service.cities().len(),
        "steps": steps,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.policy(), ValidationPolicy::default());
    }

    #[test]
    fn test_config_flattened_http_fields() {
        let config: Config = serde_json::from_str(
            r#"{ "data_dir": "/srv/form", "port": 8080, "strict_unexpected_fields": true }"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/form"));
        assert_eq!(config.http.port, 8080);
        assert_eq!(
            config.policy().unexpected_fields,
            UnexpectedFieldPolicy::Strict
        );
    }

    #[test]
    fn test_config_load_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("formwizard.json");
        fs::write(&path, "{ port: }").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.message().contains("Invalid config JSON"));
    }

    #[test]
    fn test_config_load_rejects_empty_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("formwizard.json");
        fs::write(&path, r#"{ "data_dir": "" }"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_loose_type_fields_override() {
        let config: Config = serde_json::from_str(r#"{ "loose_type_fields": [] }"#).unwrap();
        assert!(!config.policy().is_loose_typed("school"));
    }
}
