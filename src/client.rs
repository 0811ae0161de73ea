use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::contract::{
    decode_dti, decode_prediction, DtiRequest, DtiResult, PredictRequest, PredictionResult,
};
use crate::error::{Operation, SubmissionError};
use crate::form::{ApplicantFeatures, DtiInputs};

/// Remote scoring operations. Every call is one request-response exchange:
/// no retries and no caching.
#[async_trait]
pub trait ScoringGateway: Send + Sync {
    async fn predict(
        &self,
        features: &ApplicantFeatures,
    ) -> Result<PredictionResult, SubmissionError>;

    async fn compute_dti(&self, inputs: &DtiInputs) -> Result<DtiResult, SubmissionError>;
}

/// `ScoringGateway` over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpScoringClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post<B: Serialize + Sync>(
        &self,
        operation: Operation,
        body: &B,
    ) -> Result<Vec<u8>, SubmissionError> {
        let url = self.config.endpoint(operation.label());
        debug!(%operation, %url, "dispatching scoring request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| network_error(operation, err))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| network_error(operation, err))?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            warn!(%operation, status = status.as_u16(), "scoring service returned failure status");
            return Err(SubmissionError::Service {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ScoringGateway for HttpScoringClient {
    async fn predict(
        &self,
        features: &ApplicantFeatures,
    ) -> Result<PredictionResult, SubmissionError> {
        let request = PredictRequest::from(features);
        let body = self.post(Operation::Predict, &request).await?;
        decode_prediction(&body).map_err(log_decode_failure)
    }

    async fn compute_dti(&self, inputs: &DtiInputs) -> Result<DtiResult, SubmissionError> {
        let request = DtiRequest::from(inputs);
        let body = self.post(Operation::ComputeDti, &request).await?;
        decode_dti(&body).map_err(log_decode_failure)
    }
}

fn network_error(operation: Operation, err: reqwest::Error) -> SubmissionError {
    warn!(
        %operation,
        timeout = err.is_timeout(),
        encode = err.is_builder(),
        error = %err,
        "scoring request failed in transport"
    );
    SubmissionError::Network {
        operation,
        detail: err.to_string(),
    }
}

fn log_decode_failure(err: SubmissionError) -> SubmissionError {
    if let SubmissionError::Decode { operation, detail } = &err {
        warn!(%operation, class = err.class(), %detail, "scoring response did not match schema");
    }
    err
}
