//! Submission controllers: one lifecycle per remote operation.
//!
//! The two controllers never share a lifecycle, so a failing DTI computation
//! cannot disturb a prediction that is still in flight.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::ScoringGateway;
use crate::contract::{DtiResult, PredictionResult};
use crate::error::{Operation, SubmissionError};
use crate::form::{lock_forms, ApplicantField, ApplicationForm, SharedFormState};
use crate::lifecycle::{Begin, Lifecycle, OperationState};
use crate::validation::{validate_application, validate_dti};

#[cfg(test)]
mod tests;

/// Drives `POST /api/predict` for the application form.
pub struct PredictionController<G> {
    gateway: Arc<G>,
    lifecycle: Lifecycle<PredictionResult>,
}

impl<G> PredictionController<G>
where
    G: ScoringGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn state(&self) -> OperationState<PredictionResult> {
        self.lifecycle.snapshot()
    }

    /// Validate the form and score it. A trigger that arrives while an attempt
    /// is pending is ignored and reports `Pending`.
    pub async fn submit(&self, form: &ApplicationForm) -> OperationState<PredictionResult> {
        let features = match self.lifecycle.begin(|| validate_application(form)) {
            Begin::Started(features) => features,
            Begin::Rejected(state) => {
                log_rejection(Operation::Predict, &state);
                return state;
            }
            Begin::AlreadyPending => {
                debug!(operation = %Operation::Predict, "submit ignored while pending");
                return OperationState::Pending;
            }
        };

        debug!(operation = %Operation::Predict, "entered pending");
        let outcome = self.gateway.predict(&features).await;

        if let Ok(result) = &outcome {
            info!(
                operation = %Operation::Predict,
                decision = result.decision.label(),
                probability_of_default = result.probability_of_default,
                "prediction settled"
            );
        }
        settle(&self.lifecycle, Operation::Predict, outcome)
    }
}

/// Drives `POST /api/compute-dti` for the helper and folds the result back
/// into the shared application form.
pub struct DtiController<G> {
    gateway: Arc<G>,
    lifecycle: Lifecycle<DtiResult>,
    forms: SharedFormState,
}

impl<G> DtiController<G>
where
    G: ScoringGateway + 'static,
{
    pub fn new(gateway: Arc<G>, forms: SharedFormState) -> Self {
        Self {
            gateway,
            lifecycle: Lifecycle::new(),
            forms,
        }
    }

    pub fn state(&self) -> OperationState<DtiResult> {
        self.lifecycle.snapshot()
    }

    /// Compute DTI from the helper inputs. On success the state settles first,
    /// then the application's `dti` field is overwritten and the helper is
    /// closed, all before another attempt can begin.
    pub async fn submit(&self) -> OperationState<DtiResult> {
        let inputs = match self.lifecycle.begin(|| {
            let forms = lock_forms(&self.forms);
            validate_dti(&forms.application, &forms.dti_helper)
        }) {
            Begin::Started(inputs) => inputs,
            Begin::Rejected(state) => {
                log_rejection(Operation::ComputeDti, &state);
                return state;
            }
            Begin::AlreadyPending => {
                debug!(operation = %Operation::ComputeDti, "submit ignored while pending");
                return OperationState::Pending;
            }
        };

        debug!(operation = %Operation::ComputeDti, "entered pending");
        let outcome = self.gateway.compute_dti(&inputs).await;

        settle_then(&self.lifecycle, Operation::ComputeDti, outcome, |result| {
            let mut forms = lock_forms(&self.forms);
            forms
                .application
                .set(ApplicantField::DebtToIncome, result.dti.to_string());
            forms.dti_helper.close();
            info!(
                operation = %Operation::ComputeDti,
                dti = result.dti,
                "dti written back to application"
            );
        })
    }
}

fn settle<T: Clone>(
    lifecycle: &Lifecycle<T>,
    operation: Operation,
    outcome: Result<T, SubmissionError>,
) -> OperationState<T> {
    settle_then(lifecycle, operation, outcome, |_| {})
}

fn settle_then<T: Clone>(
    lifecycle: &Lifecycle<T>,
    operation: Operation,
    outcome: Result<T, SubmissionError>,
    on_success: impl FnOnce(&T),
) -> OperationState<T> {
    if let Err(err) = &outcome {
        warn!(%operation, class = err.class(), error = %err, "submission failed");
    }
    lifecycle.settle_then(outcome, on_success)
}

fn log_rejection<T>(operation: Operation, state: &OperationState<T>) {
    if let Some(SubmissionError::InvalidInput(field)) = state.error() {
        warn!(%operation, %field, "submission rejected by validation");
    }
}
