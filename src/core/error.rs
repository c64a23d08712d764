use thiserror::Error;

use super::types::MAX_YEARS;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteInput { field: &'static str, value: f64 },

    #[error("start age {start_age} is too large to project {} years ahead", MAX_YEARS)]
    AgeOverflow { start_age: u32 },

    #[error("projected principal overflowed at year {year}")]
    PrincipalOverflow { year: u32 },

    #[error("lifestyle tier {index} does not exist; catalog has {available} tiers")]
    UnknownTier { index: usize, available: usize },
}
