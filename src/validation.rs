//! Coercion of raw control values into the typed records the contract accepts.
//! Pure and synchronous: nothing here touches the network.

use crate::error::SubmissionError;
use crate::form::{
    ApplicantFeatures, ApplicantField, ApplicationForm, DtiHelper, DtiInputs, FieldKind, LoanTerm,
    FICO_MAX, FICO_MIN,
};

pub const MONTHLY_DEBT_PAYMENT: &str = "monthly_debt_payment";

/// Validate every applicant field, reporting the first failure in submission order.
pub fn validate_application(form: &ApplicationForm) -> Result<ApplicantFeatures, SubmissionError> {
    let loan_amount = coerce(form, ApplicantField::LoanAmount, parse_amount)?;
    let term = coerce(form, ApplicantField::Term, LoanTerm::from_label)?;
    let annual_income = coerce(form, ApplicantField::AnnualIncome, parse_amount)?;
    let fico_score_low = coerce(form, ApplicantField::FicoScoreLow, parse_fico)?;
    let debt_to_income = coerce(form, ApplicantField::DebtToIncome, parse_non_negative)?;

    Ok(ApplicantFeatures {
        loan_amount,
        term,
        annual_income,
        fico_score_low,
        debt_to_income,
    })
}

/// Validate the helper inputs; annual income comes from the shared form.
/// A closed helper has no inputs to submit.
pub fn validate_dti(
    form: &ApplicationForm,
    helper: &DtiHelper,
) -> Result<DtiInputs, SubmissionError> {
    if !helper.is_open() {
        return Err(SubmissionError::invalid(MONTHLY_DEBT_PAYMENT));
    }
    let annual_income = coerce(form, ApplicantField::AnnualIncome, parse_amount)?;
    let monthly_debt_payment = parse_non_negative(helper.monthly_debt_payment())
        .ok_or_else(|| SubmissionError::invalid(MONTHLY_DEBT_PAYMENT))?;

    Ok(DtiInputs {
        annual_income,
        monthly_debt_payment,
    })
}

/// Coerce a single raw value according to the field's kind, without building a record.
pub fn check_field(field: ApplicantField, raw: &str) -> Result<(), SubmissionError> {
    let valid = match field.kind() {
        FieldKind::Enumerated => LoanTerm::from_label(raw).is_some(),
        FieldKind::Integer { min, max } => parse_integer(raw, min, max).is_some(),
        FieldKind::Amount => parse_amount(raw).is_some(),
        FieldKind::Percentage => parse_non_negative(raw).is_some(),
    };

    if valid {
        Ok(())
    } else {
        Err(SubmissionError::invalid(field.wire_name()))
    }
}

fn coerce<T>(
    form: &ApplicationForm,
    field: ApplicantField,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, SubmissionError> {
    parse(form.get(field)).ok_or_else(|| SubmissionError::invalid(field.wire_name()))
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_amount(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|value| *value > 0.0)
}

fn parse_non_negative(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|value| *value >= 0.0)
}

fn parse_integer(raw: &str, min: i64, max: i64) -> Option<i64> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 {
        return None;
    }
    let whole = value as i64;
    (min..=max).contains(&whole).then_some(whole)
}

fn parse_fico(raw: &str) -> Option<u16> {
    parse_integer(raw, FICO_MIN, FICO_MAX).and_then(|value| u16::try_from(value).ok())
}
