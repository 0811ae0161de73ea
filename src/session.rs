use std::sync::{Arc, Mutex};

use tracing::info;

use crate::client::{HttpScoringClient, ScoringGateway};
use crate::config::{AppConfig, ClientConfig};
use crate::contract::{DtiResult, PredictionResult};
use crate::controller::{DtiController, PredictionController};
use crate::error::AppError;
use crate::form::{lock_forms, ApplicantField, ApplicationForm, FormState, SharedFormState};
use crate::lifecycle::OperationState;
use crate::telemetry;

/// Everything the presentation layer needs for one page: the shared form, the
/// DTI helper, and an independent controller per remote operation.
pub struct LoanSession<G> {
    forms: SharedFormState,
    prediction: PredictionController<G>,
    dti: DtiController<G>,
}

impl<G> LoanSession<G>
where
    G: ScoringGateway + 'static,
{
    pub fn new(gateway: Arc<G>) -> Self {
        let forms: SharedFormState = Arc::new(Mutex::new(FormState::default()));
        Self {
            prediction: PredictionController::new(gateway.clone()),
            dti: DtiController::new(gateway, forms.clone()),
            forms,
        }
    }

    pub fn update_field(&self, field: ApplicantField, value: impl Into<String>) {
        lock_forms(&self.forms).application.set(field, value);
    }

    pub fn form(&self) -> ApplicationForm {
        lock_forms(&self.forms).application.clone()
    }

    pub fn open_dti_helper(&self) {
        lock_forms(&self.forms).dti_helper.open();
    }

    pub fn close_dti_helper(&self) {
        lock_forms(&self.forms).dti_helper.close();
    }

    pub fn is_dti_helper_open(&self) -> bool {
        lock_forms(&self.forms).dti_helper.is_open()
    }

    pub fn set_monthly_debt_payment(&self, value: impl Into<String>) {
        lock_forms(&self.forms)
            .dti_helper
            .set_monthly_debt_payment(value);
    }

    /// Score the form as it stands now. Edits made while the request is in
    /// flight apply to the next submission.
    pub async fn submit_prediction(&self) -> OperationState<PredictionResult> {
        let form = self.form();
        self.prediction.submit(&form).await
    }

    pub async fn submit_dti(&self) -> OperationState<DtiResult> {
        self.dti.submit().await
    }

    pub fn prediction_state(&self) -> OperationState<PredictionResult> {
        self.prediction.state()
    }

    pub fn dti_state(&self) -> OperationState<DtiResult> {
        self.dti.state()
    }
}

impl LoanSession<HttpScoringClient> {
    pub fn with_client_config(config: ClientConfig) -> Result<Self, AppError> {
        let client = HttpScoringClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Load configuration from the environment, install tracing, and build a
    /// session against the configured scoring service.
    pub fn bootstrap() -> Result<Self, AppError> {
        let config = AppConfig::load()?;
        telemetry::init(&config.telemetry)?;

        info!(
            ?config.environment,
            service_base_url = %config.client.service_base_url(),
            "loan decision client ready"
        );
        Self::with_client_config(config.client)
    }
}
