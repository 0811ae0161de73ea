use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::client::ScoringGateway;
use crate::contract::{Decision, DtiResult, PredictionResult};
use crate::error::{Operation, SubmissionError};
use crate::form::{ApplicantFeatures, DtiInputs, FormState, SharedFormState};

pub(super) fn approved() -> PredictionResult {
    PredictionResult {
        decision: Decision::Approved,
        probability_of_decision: 0.84,
        probability_of_default: 0.16,
    }
}

pub(super) fn service_failure(operation: Operation, status: u16) -> SubmissionError {
    SubmissionError::Service {
        operation,
        status,
        body: String::new(),
    }
}

pub(super) fn shared_forms() -> SharedFormState {
    Arc::new(Mutex::new(FormState::default()))
}

/// In-memory gateway that counts calls and can hold either operation open until released.
pub(super) struct StubGateway {
    prediction: Result<PredictionResult, SubmissionError>,
    dti: Result<DtiResult, SubmissionError>,
    predict_gate: Option<Arc<Notify>>,
    dti_gate: Option<Arc<Notify>>,
    predict_calls: AtomicUsize,
    dti_calls: AtomicUsize,
    last_features: Mutex<Option<ApplicantFeatures>>,
    last_dti_inputs: Mutex<Option<DtiInputs>>,
}

impl StubGateway {
    pub(super) fn new() -> Self {
        Self {
            prediction: Ok(approved()),
            dti: Ok(DtiResult { dti: 9.23 }),
            predict_gate: None,
            dti_gate: None,
            predict_calls: AtomicUsize::new(0),
            dti_calls: AtomicUsize::new(0),
            last_features: Mutex::new(None),
            last_dti_inputs: Mutex::new(None),
        }
    }

    pub(super) fn with_prediction(
        mut self,
        result: Result<PredictionResult, SubmissionError>,
    ) -> Self {
        self.prediction = result;
        self
    }

    pub(super) fn with_dti(mut self, result: Result<DtiResult, SubmissionError>) -> Self {
        self.dti = result;
        self
    }

    pub(super) fn gate_predictions(mut self, gate: Arc<Notify>) -> Self {
        self.predict_gate = Some(gate);
        self
    }

    pub(super) fn gate_dti(mut self, gate: Arc<Notify>) -> Self {
        self.dti_gate = Some(gate);
        self
    }

    pub(super) fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub(super) fn dti_calls(&self) -> usize {
        self.dti_calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_features(&self) -> Option<ApplicantFeatures> {
        self.last_features.lock().expect("lock").clone()
    }

    pub(super) fn last_dti_inputs(&self) -> Option<DtiInputs> {
        *self.last_dti_inputs.lock().expect("lock")
    }

    /// Yield until `count` predictions have reached the gateway.
    pub(super) async fn wait_for_predict_calls(&self, count: usize) {
        while self.predict_calls() < count {
            tokio::task::yield_now().await;
        }
    }

    pub(super) async fn wait_for_dti_calls(&self, count: usize) {
        while self.dti_calls() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl ScoringGateway for StubGateway {
    async fn predict(
        &self,
        features: &ApplicantFeatures,
    ) -> Result<PredictionResult, SubmissionError> {
        *self.last_features.lock().expect("lock") = Some(features.clone());
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.predict_gate {
            gate.notified().await;
        }
        self.prediction.clone()
    }

    async fn compute_dti(&self, inputs: &DtiInputs) -> Result<DtiResult, SubmissionError> {
        *self.last_dti_inputs.lock().expect("lock") = Some(*inputs);
        self.dti_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.dti_gate {
            gate.notified().await;
        }
        self.dti.clone()
    }
}
