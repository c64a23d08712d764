use serde::Serialize;

/// Number of simulated years after the starting year; histories hold
/// `MAX_YEARS + 1` rows.
pub const MAX_YEARS: u32 = 50;

/// One calculation request. Rates are in percent units (8.0 = 8%) and money
/// amounts are in today's purchasing power.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioInput {
    pub principal: f64,
    pub nominal_annual_rate_percent: f64,
    pub monthly_income: f64,
    pub current_monthly_expense: f64,
    pub inflation_rate_percent: f64,
    pub start_age: u32,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            principal: 500_000.0,
            nominal_annual_rate_percent: 8.0,
            monthly_income: 20_000.0,
            current_monthly_expense: 5_000.0,
            inflation_rate_percent: 3.0,
            start_age: 30,
        }
    }
}

impl ScenarioInput {
    /// Annual real return as a decimal fraction. May be zero or negative.
    pub fn real_rate(&self) -> f64 {
        (self.nominal_annual_rate_percent - self.inflation_rate_percent) / 100.0
    }

    pub fn monthly_savings(&self) -> f64 {
        self.monthly_income - self.current_monthly_expense
    }

    /// Savings in constant purchasing power; income is assumed to track
    /// inflation, so this is never re-inflated.
    pub fn annual_savings(&self) -> f64 {
        self.monthly_savings() * 12.0
    }

    pub(crate) fn float_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("principal", self.principal),
            ("nominalAnnualRatePercent", self.nominal_annual_rate_percent),
            ("monthlyIncome", self.monthly_income),
            ("currentMonthlyExpense", self.current_monthly_expense),
            ("inflationRatePercent", self.inflation_rate_percent),
        ]
    }

    /// Fields outside the ranges the input pickers offer. Advisory only: the
    /// engine still projects these inputs.
    pub fn out_of_range_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.principal < 0.0 {
            fields.push("principal");
        }
        if !(0.0..=50.0).contains(&self.nominal_annual_rate_percent) {
            fields.push("nominalAnnualRatePercent");
        }
        if self.monthly_income < 0.0 {
            fields.push("monthlyIncome");
        }
        if self.current_monthly_expense < 0.0 {
            fields.push("currentMonthlyExpense");
        }
        if !(0.0..=15.0).contains(&self.inflation_rate_percent) {
            fields.push("inflationRatePercent");
        }
        if !(18..=80).contains(&self.start_age) {
            fields.push("startAge");
        }
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleTier {
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub monthly_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSnapshot {
    pub year: u32,
    pub age: u32,
    pub principal: f64,
    pub passive_income: f64,
    pub adjusted_expense: f64,
    pub achieved: bool,
}

/// Engine output for a single target expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub history: Vec<YearSnapshot>,
    pub achieved_year: Option<u32>,
    pub achieved_expense: f64,
}

impl Projection {
    pub fn last(&self) -> Option<&YearSnapshot> {
        self.history.last()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    #[serde(flatten)]
    pub tier: LifestyleTier,
    pub achieved: bool,
    pub achieved_year: Option<u32>,
    pub achieved_expense: f64,
    pub final_principal: f64,
    pub final_passive_income: f64,
    pub final_adjusted_expense: f64,
    /// `None` when the nominal rate cannot sustain any cost (zero or negative).
    pub required_nominal_principal: Option<f64>,
    pub progress_percent: f64,
    pub history: Vec<YearSnapshot>,
}
