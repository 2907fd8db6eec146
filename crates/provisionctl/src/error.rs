//! Error types for provisionctl
//!
//! Library errors are mapped onto [`ProvisionCtlError`], which knows how to
//! print itself as a cargo-style diagnostic with tips.

use colored::Colorize;
use provisionctl_core::{ConfigError, CoreError};
use thiserror::Error;

/// Cargo-style diagnostic formatter for CLI errors.
///
/// Produces structured output like:
/// ```text
/// error: Table 'MyTestTable' already exists
///
///   tip: Check its status: provisionctl table status MyTestTable
/// ```
pub struct CliDiagnostic {
    message: String,
    tips: Vec<(String, Vec<String>)>,
}

impl CliDiagnostic {
    /// Start a new error diagnostic with the given message.
    pub fn error(message: &str) -> Self {
        Self {
            message: message.to_string(),
            tips: Vec::new(),
        }
    }

    /// Add a tip with optional example commands.
    pub fn tip(mut self, description: &str, commands: &[&str]) -> Self {
        self.tips.push((
            description.to_string(),
            commands.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Print the diagnostic to stderr with colored formatting.
    pub fn print(&self) {
        eprint!("{}{}", "error".red().bold(), ": ".bold());
        eprintln!("{}", self.message);

        for (description, commands) in &self.tips {
            eprintln!();
            eprint!("  {}{}", "tip".yellow().bold(), ": ".bold());
            eprintln!("{}", description);
            for cmd in commands {
                eprintln!("      {}", cmd);
            }
        }
    }
}

/// Main error type for the provisionctl application
#[derive(Error, Debug)]
pub enum ProvisionCtlError {
    #[error("Configuration error: {0}")]
    Configuration(ConfigError),

    #[error("Missing AWS region configuration")]
    MissingRegion,

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Table '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("Table '{name}' failed to provision: {reason}")]
    ProvisioningFailed { name: String, reason: String },

    #[error("Timeout: {message}")]
    Timeout { message: String },

    #[error("Wait for '{name}' was cancelled")]
    Cancelled { name: String },

    #[error("AWS error ({code}): {message}")]
    ApiError { code: String, message: String },

    #[error("Connection error: {message}")]
    ConnectionError { message: String },

    #[error("{failed} of {total} demo steps failed")]
    StepsFailed { failed: usize, total: usize },

    #[error("Output formatting error: {message}")]
    OutputError { message: String },
}

/// Result type for provisionctl operations
pub type Result<T> = std::result::Result<T, ProvisionCtlError>;

impl ProvisionCtlError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Get helpful suggestions for resolving this error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ProvisionCtlError::MissingRegion => vec![
                "Pass a region: provisionctl --region us-east-1 <command>".to_string(),
                "Or set AWS_REGION / AWS_DEFAULT_REGION".to_string(),
                "Or set region under [aws] in the config file: provisionctl config path".to_string(),
            ],
            ProvisionCtlError::Configuration(ConfigError::AlreadyExists { .. }) => vec![
                "Overwrite it: provisionctl config init --force".to_string(),
            ],
            ProvisionCtlError::Configuration(ConfigError::MissingSetting { .. }) => vec![
                "Write a starter config: provisionctl config init".to_string(),
                "Show the effective config: provisionctl config show".to_string(),
            ],
            ProvisionCtlError::AlreadyExists { name } => vec![
                format!("Check its status: provisionctl table status {}", name),
                format!("Wait for it: provisionctl table wait {}", name),
            ],
            ProvisionCtlError::Timeout { .. } => vec![
                "Raise the budget with --wait-timeout <seconds>".to_string(),
                "Resume waiting later: provisionctl table wait <name>".to_string(),
            ],
            ProvisionCtlError::ApiError { code, .. }
                if code.contains("AccessDenied") || code.contains("Unrecognized") =>
            {
                vec![
                    "Check which identity is in use: aws sts get-caller-identity".to_string(),
                    "Select a profile with AWS_PROFILE or [aws] profile in config".to_string(),
                ]
            }
            ProvisionCtlError::ApiError { code, .. } if code == "NoSuchBucket" => vec![
                "Check the bucket name and region".to_string(),
            ],
            ProvisionCtlError::ApiError { code, .. } if code == "ResourceNotFoundException" => {
                vec!["Create the table first: provisionctl table create <name> --partition-key id".to_string()]
            }
            ProvisionCtlError::ConnectionError { .. } => vec![
                "Check network connectivity".to_string(),
                "Verify --endpoint-url if you are using an emulator".to_string(),
            ],
            ProvisionCtlError::InvalidInput { .. } => vec![
                "Check the command syntax: provisionctl <command> --help".to_string(),
            ],
            ProvisionCtlError::StepsFailed { .. } => vec![
                "Re-run with -v to see each step's log".to_string(),
            ],
            _ => vec![],
        }
    }

    /// Print a cargo-style diagnostic to stderr using colored formatting.
    pub fn print_diagnostic(&self) {
        let mut diag = CliDiagnostic::error(&format!("{}", self));

        for suggestion in self.suggestions() {
            diag = diag.tip(&suggestion, &[]);
        }

        diag.print();
    }
}

impl From<CoreError> for ProvisionCtlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidSpec(message) => ProvisionCtlError::InvalidInput { message },
            CoreError::AlreadyExists { name } => ProvisionCtlError::AlreadyExists { name },
            CoreError::ProvisioningFailed { name, reason } => {
                ProvisionCtlError::ProvisioningFailed { name, reason }
            }
            CoreError::Timeout { name, timeout } => ProvisionCtlError::Timeout {
                message: format!(
                    "'{}' was not ready after {} seconds",
                    name,
                    timeout.as_secs()
                ),
            },
            CoreError::Cancelled { name } => ProvisionCtlError::Cancelled { name },
            CoreError::Remote { code, message } if code == "TimeoutError" => {
                ProvisionCtlError::Timeout { message }
            }
            CoreError::Remote { code, message } if code == "DispatchFailure" => {
                ProvisionCtlError::ConnectionError { message }
            }
            CoreError::Remote { code, message } => ProvisionCtlError::ApiError { code, message },
            CoreError::Config(config_err) => ProvisionCtlError::from(config_err),
        }
    }
}

impl From<ConfigError> for ProvisionCtlError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingRegion => ProvisionCtlError::MissingRegion,
            other => ProvisionCtlError::Configuration(other),
        }
    }
}

impl From<serde_json::Error> for ProvisionCtlError {
    fn from(err: serde_json::Error) -> Self {
        ProvisionCtlError::OutputError {
            message: format!("JSON error: {}", err),
        }
    }
}

impl From<anyhow::Error> for ProvisionCtlError {
    fn from(err: anyhow::Error) -> Self {
        ProvisionCtlError::OutputError {
            message: err.to_string(),
        }
    }
}
