//! Wire schema shared with the scoring service.

use serde::{Deserialize, Serialize};

use crate::error::{Operation, SubmissionError};
use crate::form::{ApplicantFeatures, DtiInputs, LoanTerm};

/// Body of `POST /api/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub loan_amnt: f64,
    pub term: LoanTerm,
    pub annual_inc: f64,
    pub fico_range_low: u16,
    pub dti: f64,
}

impl From<&ApplicantFeatures> for PredictRequest {
    fn from(features: &ApplicantFeatures) -> Self {
        Self {
            loan_amnt: features.loan_amount,
            term: features.term,
            annual_inc: features.annual_income,
            fico_range_low: features.fico_score_low,
            dti: features.debt_to_income,
        }
    }
}

/// Outcome of a scoring request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approved => "Approved",
            Decision::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    result: Decision,
    probability: f64,
    probability_bad: f64,
}

/// Decision returned by the scoring service for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub decision: Decision,
    pub probability_of_decision: f64,
    pub probability_of_default: f64,
}

/// Body of `POST /api/compute-dti`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtiRequest {
    pub annual_inc: f64,
    pub monthly_debt_payment: f64,
}

impl From<&DtiInputs> for DtiRequest {
    fn from(inputs: &DtiInputs) -> Self {
        Self {
            annual_inc: inputs.annual_income,
            monthly_debt_payment: inputs.monthly_debt_payment,
        }
    }
}

/// Debt-to-income percentage computed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DtiResult {
    pub dti: f64,
}

pub fn decode_prediction(body: &[u8]) -> Result<PredictionResult, SubmissionError> {
    let operation = Operation::Predict;
    let response: PredictResponse =
        serde_json::from_slice(body).map_err(|err| decode_error(operation, err.to_string()))?;

    for (name, value) in [
        ("probability", response.probability),
        ("probability_bad", response.probability_bad),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(decode_error(
                operation,
                format!("{name} {value} outside [0, 1]"),
            ));
        }
    }

    Ok(PredictionResult {
        decision: response.result,
        probability_of_decision: response.probability,
        probability_of_default: response.probability_bad,
    })
}

pub fn decode_dti(body: &[u8]) -> Result<DtiResult, SubmissionError> {
    let operation = Operation::ComputeDti;
    let result: DtiResult =
        serde_json::from_slice(body).map_err(|err| decode_error(operation, err.to_string()))?;

    if !result.dti.is_finite() || result.dti < 0.0 {
        return Err(decode_error(
            operation,
            format!("dti {} is not a non-negative number", result.dti),
        ));
    }

    Ok(result)
}

fn decode_error(operation: Operation, detail: String) -> SubmissionError {
    SubmissionError::Decode { operation, detail }
}
