use rayon::prelude::*;
use tracing::debug;

use super::catalog::lifestyle_catalog;
use super::engine::{ensure_finite, project, round_currency, validate_input};
use super::error::ProjectionError;
use super::types::{LifestyleTier, ScenarioInput, ScenarioResult};

/// Projects every tier of `catalog`, returning results in catalog order.
///
/// The input is validated once before any tier runs, so an invalid request
/// never yields partial results.
pub fn run_all_scenarios(
    input: &ScenarioInput,
    catalog: &[LifestyleTier],
) -> Result<Vec<ScenarioResult>, ProjectionError> {
    validate_input(input)?;
    for tier in catalog {
        ensure_finite("monthlyCost", tier.monthly_cost)?;
    }

    catalog
        .par_iter()
        .map(|tier| evaluate_tier(input, tier))
        .collect()
}

pub fn run_catalog(input: &ScenarioInput) -> Result<Vec<ScenarioResult>, ProjectionError> {
    run_all_scenarios(input, lifestyle_catalog())
}

/// Capital needed today to fund `monthly_cost` forever from nominal return
/// alone. `None` when the nominal rate is zero or negative.
pub fn required_nominal_principal(
    monthly_cost: f64,
    nominal_annual_rate_percent: f64,
) -> Option<f64> {
    if nominal_annual_rate_percent <= 0.0 {
        return None;
    }
    Some(round_currency(
        (monthly_cost * 12.0) / (nominal_annual_rate_percent / 100.0),
    ))
}

fn evaluate_tier(
    input: &ScenarioInput,
    tier: &LifestyleTier,
) -> Result<ScenarioResult, ProjectionError> {
    let projection = project(input, tier.monthly_cost)?;
    let (final_principal, final_passive_income, final_adjusted_expense) = projection
        .last()
        .map(|row| (row.principal, row.passive_income, row.adjusted_expense))
        .unwrap_or_default();
    let achieved = projection.achieved_year.is_some();

    debug!(
        tier = tier.name,
        monthly_cost = tier.monthly_cost,
        achieved_year = ?projection.achieved_year,
        "projected lifestyle tier"
    );

    Ok(ScenarioResult {
        tier: *tier,
        achieved,
        achieved_year: projection.achieved_year,
        achieved_expense: projection.achieved_expense,
        final_principal,
        final_passive_income,
        final_adjusted_expense,
        required_nominal_principal: required_nominal_principal(
            tier.monthly_cost,
            input.nominal_annual_rate_percent,
        ),
        progress_percent: progress_percent(
            achieved,
            final_passive_income,
            final_adjusted_expense,
        ),
        history: projection.history,
    })
}

/// Share of the target covered by final passive income, capped at 100.
fn progress_percent(achieved: bool, passive_income: f64, adjusted_expense: f64) -> f64 {
    if achieved {
        return 100.0;
    }
    let ratio = passive_income / adjusted_expense * 100.0;
    if !ratio.is_finite() {
        return 0.0;
    }
    round_currency(ratio).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MAX_YEARS;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn tier(name: &'static str, monthly_cost: f64) -> LifestyleTier {
        LifestyleTier {
            name,
            icon: "",
            description: "",
            color: "#000000",
            monthly_cost,
        }
    }

    #[test]
    fn required_principal_for_ten_thousand_at_eight_percent() {
        let required = required_nominal_principal(10_000.0, 8.0).expect("positive rate");
        assert_approx(required, 1_500_000.0);
    }

    #[test]
    fn required_principal_is_unbounded_at_zero_nominal_rate() {
        assert_eq!(required_nominal_principal(10_000.0, 0.0), None);
    }

    #[test]
    fn required_principal_is_unbounded_at_negative_nominal_rate() {
        assert_eq!(required_nominal_principal(10_000.0, -2.5), None);
        assert_eq!(required_nominal_principal(3_000.0, -0.5), None);
    }

    #[test]
    fn required_principal_keeps_large_odd_figures_exact() {
        // 375299968947541.75 * 12 = 4503599627370501, an odd integer above 2^52.
        let required =
            required_nominal_principal(375_299_968_947_541.75, 100.0).expect("positive rate");
        assert_eq!(required, 4_503_599_627_370_501.0);
    }

    #[test]
    fn results_follow_catalog_order_and_carry_tier_metadata() {
        let results = run_catalog(&ScenarioInput::default()).expect("default input is valid");
        let catalog = lifestyle_catalog();

        assert_eq!(results.len(), catalog.len());
        for (result, tier) in results.iter().zip(catalog) {
            assert_eq!(result.tier, *tier);
            assert_eq!(result.history.len(), MAX_YEARS as usize + 1);
        }
    }

    #[test]
    fn default_input_reaches_survival_tier_in_year_two() {
        let results = run_catalog(&ScenarioInput::default()).expect("default input is valid");
        let survival = &results[0];

        assert!(survival.achieved);
        assert_eq!(survival.achieved_year, Some(2));
        assert_approx(survival.achieved_expense, 3_000.0);
        assert_approx(survival.progress_percent, 100.0);
        assert_approx(
            survival.required_nominal_principal.expect("positive rate"),
            450_000.0,
        );
    }

    #[test]
    fn final_fields_mirror_last_history_row() {
        let results = run_catalog(&ScenarioInput::default()).expect("default input is valid");
        for result in &results {
            let last = result.history.last().expect("history is never empty");
            assert_approx(result.final_principal, last.principal);
            assert_approx(result.final_passive_income, last.passive_income);
            assert_approx(result.final_adjusted_expense, last.adjusted_expense);
        }
    }

    #[test]
    fn unreached_tier_reports_partial_progress() {
        // 480k at a 5% real rate earns 24k a year, exactly offset by 2k/month
        // of dissaving, so passive income holds at 2000/month against 3000.
        let input = ScenarioInput {
            principal: 480_000.0,
            monthly_income: 3_000.0,
            current_monthly_expense: 5_000.0,
            ..ScenarioInput::default()
        };
        let results =
            run_all_scenarios(&input, &[tier("lean", 3_000.0)]).expect("valid input");

        assert!(!results[0].achieved);
        assert_eq!(results[0].achieved_year, None);
        assert!(results[0].history.iter().all(|row| row.principal == 480_000.0));
        assert_approx(results[0].final_passive_income, 2_000.0);
        assert_approx(results[0].progress_percent, 67.0);
    }

    #[test]
    fn progress_rounds_the_covered_share() {
        assert_approx(progress_percent(false, 2_083.0, 3_000.0), 69.0);
        assert_approx(progress_percent(false, 2_000.0, 3_000.0), 67.0);
    }

    #[test]
    fn zero_nominal_rate_yields_sentinel_not_fault() {
        let input = ScenarioInput {
            nominal_annual_rate_percent: 0.0,
            ..ScenarioInput::default()
        };
        let results = run_catalog(&input).expect("zero rate is valid input");
        assert!(results.iter().all(|r| r.required_nominal_principal.is_none()));
        assert!(results.iter().all(|r| r.achieved_year.is_none()));
    }

    #[test]
    fn zero_cost_tier_has_zero_progress_ratio_guard() {
        assert_approx(progress_percent(false, 0.0, 0.0), 0.0);
        assert_approx(progress_percent(false, -500.0, 1_000.0), 0.0);
        assert_approx(progress_percent(false, 5_000.0, 1_000.0), 100.0);
        assert_approx(progress_percent(true, 0.0, 1_000.0), 100.0);
    }

    #[test]
    fn invalid_input_returns_error_without_partial_results() {
        let input = ScenarioInput {
            monthly_income: f64::NAN,
            ..ScenarioInput::default()
        };
        let err = run_catalog(&input).expect_err("NaN income must be rejected");
        assert!(matches!(
            err,
            ProjectionError::NonFiniteInput {
                field: "monthlyIncome",
                ..
            }
        ));
    }

    #[test]
    fn non_finite_tier_cost_is_rejected() {
        let catalog = [tier("ok", 1_000.0), tier("broken", f64::INFINITY)];
        let err = run_all_scenarios(&ScenarioInput::default(), &catalog)
            .expect_err("infinite cost must be rejected");
        assert!(matches!(
            err,
            ProjectionError::NonFiniteInput {
                field: "monthlyCost",
                ..
            }
        ));
    }

    #[test]
    fn empty_catalog_yields_no_results() {
        let results = run_all_scenarios(&ScenarioInput::default(), &[]).expect("valid input");
        assert!(results.is_empty());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(24))]

        #[test]
        fn prop_cheaper_tiers_are_reached_no_later(
            principal in 0u32..20_000_000,
            rate_half_pct in 1u32..101,
            inflation_half_pct in 0u32..31,
            savings in 0u32..500_000,
        ) {
            let input = ScenarioInput {
                principal: principal as f64,
                nominal_annual_rate_percent: rate_half_pct as f64 / 2.0,
                monthly_income: savings as f64,
                current_monthly_expense: 0.0,
                inflation_rate_percent: inflation_half_pct as f64 / 2.0,
                start_age: 30,
            };

            let results = run_catalog(&input).expect("valid input");
            prop_assert_eq!(results.len(), 8);
            for pair in results.windows(2) {
                match (pair[0].achieved_year, pair[1].achieved_year) {
                    (Some(cheap), Some(dear)) => prop_assert!(cheap <= dear),
                    (None, Some(_)) => prop_assert!(false, "pricier tier reached before cheaper one"),
                    _ => {}
                }
                let cheap = pair[0].required_nominal_principal.expect("positive rate");
                let dear = pair[1].required_nominal_principal.expect("positive rate");
                prop_assert!(cheap < dear);
            }
        }
    }
}
