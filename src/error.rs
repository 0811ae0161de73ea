use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// The two remote operations exposed by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Predict,
    ComputeDti,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Predict => "predict",
            Operation::ComputeDti => "compute-dti",
        }
    }

    /// Message shown when the service fails without explaining why.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::Predict => "Prediction failed",
            Operation::ComputeDti => "DTI computation failed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every way a submission can fail. The `Display` output is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{}", service_message(.operation, .body))]
    Service {
        operation: Operation,
        status: u16,
        body: String,
    },
    /// `detail` is for logs; the user sees the operation's fallback message.
    #[error("{}", decode_message(.operation))]
    Decode {
        operation: Operation,
        detail: String,
    },
    #[error("something went wrong, please try again")]
    Network { operation: Operation, detail: String },
}

fn decode_message(operation: &Operation) -> &'static str {
    operation.fallback_message()
}

fn service_message(operation: &Operation, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        operation.fallback_message().to_string()
    } else {
        trimmed.to_string()
    }
}

impl SubmissionError {
    pub fn invalid(field: &str) -> Self {
        Self::InvalidInput(field.to_string())
    }

    /// Short class name used in log fields.
    pub fn class(&self) -> &'static str {
        match self {
            SubmissionError::InvalidInput(_) => "invalid_input",
            SubmissionError::Service { .. } => "service_error",
            SubmissionError::Decode { .. } => "decode_error",
            SubmissionError::Network { .. } => "network_error",
        }
    }
}

/// Startup failures for hosts that wire the client from the environment.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
