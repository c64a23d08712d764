use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::core::{
    LifestyleTier, MAX_YEARS, ProjectionError, ScenarioInput, ScenarioResult, YearSnapshot,
    lifestyle_catalog, run_catalog,
};

/// Upper bound on a single scenario calculation behind the HTTP boundary.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    principal: Option<f64>,
    #[serde(alias = "nominalAnnualRatePercent")]
    rate: Option<f64>,
    #[serde(alias = "monthlyIncome")]
    income: Option<f64>,
    #[serde(alias = "currentMonthlyExpense", alias = "expense")]
    current_expense: Option<f64>,
    #[serde(alias = "inflationRatePercent")]
    inflation: Option<f64>,
    #[serde(alias = "startAge")]
    age: Option<u32>,
    #[serde(alias = "detailTierIndex")]
    detail_tier: Option<usize>,
}

#[derive(Parser, Debug)]
#[command(
    name = "fire-tiers",
    about = "Projects when passive income covers each lifestyle tier (real-rate model)",
    after_help = "Run `fire-tiers serve [port]` to start the HTTP API instead."
)]
struct Cli {
    #[arg(
        long,
        default_value_t = 500_000.0,
        allow_negative_numbers = true,
        help = "Starting principal in today's money"
    )]
    principal: f64,
    #[arg(
        long,
        default_value_t = 8.0,
        allow_negative_numbers = true,
        help = "Expected annual nominal return in percent, e.g. 8"
    )]
    rate: f64,
    #[arg(long, default_value_t = 20_000.0, help = "Monthly income")]
    income: f64,
    #[arg(long, default_value_t = 5_000.0, help = "Current monthly expenses")]
    current_expense: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        allow_negative_numbers = true,
        help = "Expected annual inflation in percent"
    )]
    inflation: f64,
    #[arg(long, default_value_t = 30, help = "Current age")]
    age: u32,
    #[arg(
        long,
        default_value_t = 0,
        help = "Catalog index of the tier whose yearly rows are printed"
    )]
    detail_tier: usize,
    #[arg(long, help = "Print the API JSON response instead of tables")]
    json: bool,
}

#[derive(Debug)]
struct ApiRequest {
    input: ScenarioInput,
    detail_tier: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenariosResponse {
    input: ScenarioInput,
    monthly_savings: f64,
    real_rate_percent: f64,
    max_years: u32,
    detail_tier_index: usize,
    detail_history: Vec<YearSnapshot>,
    scenarios: Vec<ScenarioResult>,
}

#[derive(Debug, Serialize)]
struct LifestylesResponse {
    lifestyles: &'static [LifestyleTier],
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_request(cli: &Cli) -> Result<ApiRequest, ProjectionError> {
    let available = lifestyle_catalog().len();
    if cli.detail_tier >= available {
        return Err(ProjectionError::UnknownTier {
            index: cli.detail_tier,
            available,
        });
    }

    Ok(ApiRequest {
        input: ScenarioInput {
            principal: cli.principal,
            nominal_annual_rate_percent: cli.rate,
            monthly_income: cli.income,
            current_monthly_expense: cli.current_expense,
            inflation_rate_percent: cli.inflation,
            start_age: cli.age,
        },
        detail_tier: cli.detail_tier,
    })
}

fn default_cli_for_api() -> Cli {
    let defaults = ScenarioInput::default();
    Cli {
        principal: defaults.principal,
        rate: defaults.nominal_annual_rate_percent,
        income: defaults.monthly_income,
        current_expense: defaults.current_monthly_expense,
        inflation: defaults.inflation_rate_percent,
        age: defaults.start_age,
        detail_tier: 0,
        json: false,
    }
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<ScenarioPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: ScenarioPayload) -> Result<ApiRequest, ProjectionError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.rate {
        cli.rate = v;
    }
    if let Some(v) = payload.income {
        cli.income = v;
    }
    if let Some(v) = payload.current_expense {
        cli.current_expense = v;
    }
    if let Some(v) = payload.inflation {
        cli.inflation = v;
    }
    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.detail_tier {
        cli.detail_tier = v;
    }

    build_request(&cli)
}

fn build_scenarios_response(request: &ApiRequest) -> Result<ScenariosResponse, ProjectionError> {
    let input = request.input;
    let scenarios = run_catalog(&input)?;
    let detail_history = scenarios
        .get(request.detail_tier)
        .map(|scenario| scenario.history.clone())
        .ok_or(ProjectionError::UnknownTier {
            index: request.detail_tier,
            available: scenarios.len(),
        })?;

    Ok(ScenariosResponse {
        input,
        monthly_savings: input.monthly_savings(),
        real_rate_percent: input.nominal_annual_rate_percent - input.inflation_rate_percent,
        max_years: MAX_YEARS,
        detail_tier_index: request.detail_tier,
        detail_history,
        scenarios,
    })
}

pub fn run_cli<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let request = build_request(&cli)?;
    warn_out_of_range(&request.input);

    let response = build_scenarios_response(&request)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print!("{}", render_report(&response));
    }
    Ok(())
}

fn warn_out_of_range(input: &ScenarioInput) {
    let fields = input.out_of_range_fields();
    if !fields.is_empty() {
        warn!(?fields, "input outside the recognized ranges; projecting anyway");
    }
}

fn describe_achievement(achieved_year: Option<u32>, start_age: u32) -> String {
    match achieved_year {
        Some(0) => "already reached".to_string(),
        Some(years) => format!("in {years} years (age {})", start_age + years),
        None => format!("> {MAX_YEARS} years"),
    }
}

fn render_report(response: &ScenariosResponse) -> String {
    let input = &response.input;
    let mut out = format!(
        "Principal {:.0} | return {:.1}% | inflation {:.1}% | real {:.1}% | saving {:.0}/month\n\n",
        input.principal,
        input.nominal_annual_rate_percent,
        input.inflation_rate_percent,
        response.real_rate_percent,
        response.monthly_savings,
    );

    out.push_str(&format!(
        "{:<4} {:<12} {:>12} {:<24} {:>18} {:>8}\n",
        "", "Lifestyle", "Monthly", "Reached", "Required capital", "Progress"
    ));
    for scenario in &response.scenarios {
        let required = scenario
            .required_nominal_principal
            .map(|value| format!("{value:.0}"))
            .unwrap_or_else(|| "unbounded".to_string());
        out.push_str(&format!(
            "{:<4} {:<12} {:>12.0} {:<24} {:>18} {:>7.0}%\n",
            scenario.tier.icon,
            scenario.tier.name,
            scenario.tier.monthly_cost,
            describe_achievement(scenario.achieved_year, input.start_age),
            required,
            scenario.progress_percent,
        ));
    }

    let detail_name = response
        .scenarios
        .get(response.detail_tier_index)
        .map(|scenario| scenario.tier.name)
        .unwrap_or_default();
    out.push_str(&format!("\nYear by year ({detail_name}):\n"));
    out.push_str(&format!(
        "{:>4} {:>16} {:>14} {}\n",
        "Age", "Principal", "Passive/month", "Status"
    ));
    for row in &response.detail_history {
        out.push_str(&format!(
            "{:>4} {:>16.0} {:>14.0} {}\n",
            row.age,
            row.principal,
            row.passive_income,
            if row.achieved { "reached" } else { "in progress" },
        ));
    }
    out
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/lifestyles", get(lifestyles_handler))
        .route(
            "/api/scenarios",
            get(scenarios_get_handler).post(scenarios_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "lifestyle projection API listening");
    info!("local access: http://127.0.0.1:{port}/api/scenarios");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn lifestyles_handler() -> Response {
    json_response(
        StatusCode::OK,
        LifestylesResponse {
            lifestyles: lifestyle_catalog(),
        },
    )
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn scenarios_get_handler(Query(payload): Query<ScenarioPayload>) -> Response {
    scenarios_handler_impl(payload).await
}

async fn scenarios_post_handler(Json(payload): Json<ScenarioPayload>) -> Response {
    scenarios_handler_impl(payload).await
}

async fn scenarios_handler_impl(payload: ScenarioPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            warn!(%err, "rejected scenario request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };
    info!(input = ?request.input, detail_tier = request.detail_tier, "running scenarios");
    warn_out_of_range(&request.input);

    let task = tokio::task::spawn_blocking(move || build_scenarios_response(&request));
    match timeout(REQUEST_TIMEOUT, task).await {
        Ok(Ok(Ok(response))) => json_response(StatusCode::OK, response),
        Ok(Ok(Err(err))) => {
            warn!(%err, "rejected scenario request");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Ok(Err(join_err)) => {
            error!(%join_err, "scenario task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Projection failed")
        }
        Err(_) => {
            error!(timeout = ?REQUEST_TIMEOUT, "scenario calculation timed out");
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Projection timed out")
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
