mod catalog;
mod engine;
mod error;
mod runner;
mod types;

pub use catalog::{LIFESTYLE_CATALOG, lifestyle_catalog};
pub use engine::project;
pub use error::ProjectionError;
pub use runner::{required_nominal_principal, run_all_scenarios, run_catalog};
pub use types::{
    LifestyleTier, MAX_YEARS, Projection, ScenarioInput, ScenarioResult, YearSnapshot,
};
