//! Client-side orchestration for a remote loan-approval scoring service:
//! form state, input validation, the HTTP contract, and a submission
//! lifecycle per remote operation.

pub mod client;
pub mod config;
pub mod contract;
pub mod controller;
pub mod error;
pub mod form;
pub mod lifecycle;
pub mod session;
pub mod telemetry;
pub mod validation;

pub use client::{HttpScoringClient, ScoringGateway};
pub use config::{AppConfig, ClientConfig};
pub use contract::{Decision, DtiResult, PredictionResult};
pub use controller::{DtiController, PredictionController};
pub use error::{AppError, Operation, SubmissionError};
pub use form::{ApplicantFeatures, ApplicantField, ApplicationForm, DtiHelper, DtiInputs, LoanTerm};
pub use lifecycle::OperationState;
pub use session::LoanSession;
