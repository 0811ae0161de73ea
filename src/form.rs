//! Applicant input as the form holds it (raw control values) and as the
//! scoring contract needs it (typed records).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Loan terms the scoring model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanTerm {
    #[serde(rename = "36 months")]
    ThirtySixMonths,
    #[serde(rename = "60 months")]
    SixtyMonths,
}

impl LoanTerm {
    pub const ALL: [LoanTerm; 2] = [LoanTerm::ThirtySixMonths, LoanTerm::SixtyMonths];

    pub fn label(&self) -> &'static str {
        match self {
            LoanTerm::ThirtySixMonths => "36 months",
            LoanTerm::SixtyMonths => "60 months",
        }
    }

    /// Exact label match; free text is never coerced.
    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|term| term.label() == value)
    }
}

impl fmt::Display for LoanTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a raw control value is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Strictly positive number.
    Amount,
    /// Whole number within a closed range.
    Integer { min: i64, max: i64 },
    /// Non-negative number.
    Percentage,
    /// One of a fixed set of labels.
    Enumerated,
}

/// The attributes of an application, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicantField {
    LoanAmount,
    Term,
    AnnualIncome,
    FicoScoreLow,
    DebtToIncome,
}

pub const FICO_MIN: i64 = 300;
pub const FICO_MAX: i64 = 850;

impl ApplicantField {
    pub const ALL: [ApplicantField; 5] = [
        ApplicantField::LoanAmount,
        ApplicantField::Term,
        ApplicantField::AnnualIncome,
        ApplicantField::FicoScoreLow,
        ApplicantField::DebtToIncome,
    ];

    /// Name used on the wire and in validation errors.
    pub fn wire_name(&self) -> &'static str {
        match self {
            ApplicantField::LoanAmount => "loan_amnt",
            ApplicantField::Term => "term",
            ApplicantField::AnnualIncome => "annual_inc",
            ApplicantField::FicoScoreLow => "fico_range_low",
            ApplicantField::DebtToIncome => "dti",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            ApplicantField::LoanAmount | ApplicantField::AnnualIncome => FieldKind::Amount,
            ApplicantField::Term => FieldKind::Enumerated,
            ApplicantField::FicoScoreLow => FieldKind::Integer {
                min: FICO_MIN,
                max: FICO_MAX,
            },
            ApplicantField::DebtToIncome => FieldKind::Percentage,
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }

    fn index(&self) -> usize {
        match self {
            ApplicantField::LoanAmount => 0,
            ApplicantField::Term => 1,
            ApplicantField::AnnualIncome => 2,
            ApplicantField::FicoScoreLow => 3,
            ApplicantField::DebtToIncome => 4,
        }
    }
}

impl fmt::Display for ApplicantField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Raw control values for every applicant field, edited through one setter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationForm {
    values: [String; 5],
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self {
            values: [
                "10000".to_string(),
                LoanTerm::ThirtySixMonths.label().to_string(),
                "65000".to_string(),
                "700".to_string(),
                "15".to_string(),
            ],
        }
    }
}

impl ApplicationForm {
    pub fn get(&self, field: ApplicantField) -> &str {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: ApplicantField, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    pub fn fields(&self) -> impl Iterator<Item = (ApplicantField, &str)> + '_ {
        ApplicantField::ALL
            .into_iter()
            .map(move |field| (field, self.get(field)))
    }
}

/// Validated record submitted for scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantFeatures {
    pub loan_amount: f64,
    pub term: LoanTerm,
    pub annual_income: f64,
    pub fico_score_low: u16,
    pub debt_to_income: f64,
}

/// State of the debt-to-income helper. Annual income is read from the shared
/// application form rather than duplicated here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DtiHelper {
    open: bool,
    monthly_debt_payment: String,
}

impl DtiHelper {
    pub fn open(&mut self) {
        self.open = true;
        self.monthly_debt_payment = "0".to_string();
    }

    /// Closing discards the helper inputs.
    pub fn close(&mut self) {
        self.open = false;
        self.monthly_debt_payment.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn monthly_debt_payment(&self) -> &str {
        &self.monthly_debt_payment
    }

    pub fn set_monthly_debt_payment(&mut self, value: impl Into<String>) {
        self.monthly_debt_payment = value.into();
    }
}

/// Validated input for the DTI computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DtiInputs {
    pub annual_income: f64,
    pub monthly_debt_payment: f64,
}

/// Everything the user edits on the page: the application and the DTI helper.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub application: ApplicationForm,
    pub dti_helper: DtiHelper,
}

/// Form state shared between the prediction path and the DTI write-back.
/// Writes are last-write-wins; the lock is never held across an await.
pub type SharedFormState = Arc<Mutex<FormState>>;

pub fn lock_forms(forms: &SharedFormState) -> MutexGuard<'_, FormState> {
    forms.lock().unwrap_or_else(PoisonError::into_inner)
}
