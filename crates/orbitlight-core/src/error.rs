use thiserror::Error;

/// Rejections raised by checked configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("min_vertical_angle must not be negative, got {0}")]
    NegativeMinAngle(f64),

    #[error("Vertical range is empty: min {min} must be below max {max}")]
    EmptyVerticalRange { min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
