use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorError {
    InsufficientData { required: usize, available: usize },
    InvalidValue { index: usize, value: f64 },
    InvalidParameter(String),
}

impl fmt::Display for IndicatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorError::InsufficientData {
                required,
                available,
            } => write!(
                f,
                "insufficient data: need at least {} candles, got {}",
                required, available
            ),
            IndicatorError::InvalidValue { index, value } => {
                write!(f, "invalid close price {} at index {}", value, index)
            }
            IndicatorError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for IndicatorError {}
