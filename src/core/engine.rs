use super::error::ProjectionError;
use super::types::{MAX_YEARS, Projection, ScenarioInput, YearSnapshot};

/// Projects `input` year by year against a constant real-terms monthly target.
///
/// Growth and withdrawal sizing both use the real rate, so the target and the
/// yearly savings stay constant in today's money. Principal is carried at full
/// precision between years; only the emitted snapshots are rounded.
pub fn project(
    input: &ScenarioInput,
    target_monthly_expense: f64,
) -> Result<Projection, ProjectionError> {
    validate_input(input)?;
    ensure_finite("targetMonthlyExpense", target_monthly_expense)?;
    project_validated(input, target_monthly_expense)
}

pub(crate) fn validate_input(input: &ScenarioInput) -> Result<(), ProjectionError> {
    for (field, value) in input.float_fields() {
        ensure_finite(field, value)?;
    }
    if input.start_age.checked_add(MAX_YEARS).is_none() {
        return Err(ProjectionError::AgeOverflow {
            start_age: input.start_age,
        });
    }
    Ok(())
}

pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ProjectionError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::NonFiniteInput { field, value })
    }
}

fn project_validated(
    input: &ScenarioInput,
    target_monthly_expense: f64,
) -> Result<Projection, ProjectionError> {
    let real_rate = input.real_rate();
    let annual_savings = input.annual_savings();
    ensure_finite("realRate", real_rate)?;
    ensure_finite("annualSavings", annual_savings)?;

    let mut principal = input.principal;
    let mut achieved_year = None;
    let mut history = Vec::with_capacity(MAX_YEARS as usize + 1);

    for year in 0..=MAX_YEARS {
        let adjusted_expense = target_monthly_expense;
        let passive_income = monthly_passive_income(principal, real_rate);
        if !principal.is_finite() || !passive_income.is_finite() {
            return Err(ProjectionError::PrincipalOverflow { year });
        }
        let achieved = passive_income >= adjusted_expense;

        if achieved && achieved_year.is_none() {
            achieved_year = Some(year);
        }

        history.push(YearSnapshot {
            year,
            age: input.start_age + year,
            principal: round_currency(principal),
            passive_income: round_currency(passive_income),
            adjusted_expense: round_currency(adjusted_expense),
            achieved,
        });

        principal = next_principal(principal, real_rate, annual_savings);
    }

    Ok(Projection {
        history,
        achieved_year,
        achieved_expense: round_currency(target_monthly_expense),
    })
}

/// Monthly income from the real return on principal. Debt under a negative
/// real rate yields nothing rather than a positive product.
fn monthly_passive_income(principal: f64, real_rate: f64) -> f64 {
    if principal < 0.0 && real_rate < 0.0 {
        return 0.0;
    }
    principal * real_rate / 12.0
}

fn next_principal(principal: f64, real_rate: f64, annual_savings: f64) -> f64 {
    principal + principal * real_rate + annual_savings
}

/// Nearest whole currency unit, halves rounded toward positive infinity.
pub(crate) fn round_currency(value: f64) -> f64 {
    let rounded = value.round();
    if rounded - value == -0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}
