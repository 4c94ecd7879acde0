//! Support and resistance bands over the trailing close window

use crate::indicators::error::IndicatorError;
use crate::models::indicators::{Candle, Levels};

/// Number of trailing candles the default estimator looks at.
pub const LEVELS_WINDOW: usize = 20;

/// Compute support/resistance bands over the last [`LEVELS_WINDOW`] closes.
///
/// Resistance and support are the max and min close of the window; the outer
/// bands extend them by half the spread in each direction.
pub fn compute_levels(candles: &[Candle]) -> Result<Levels, IndicatorError> {
    compute_levels_with_window(candles, LEVELS_WINDOW)
}

/// Same as [`compute_levels`] with a custom window length.
///
/// Inputs shorter than `window` use every candle available.
pub fn compute_levels_with_window(
    candles: &[Candle],
    window: usize,
) -> Result<Levels, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidParameter(
            "window must be at least 1".to_string(),
        ));
    }
    if candles.is_empty() {
        return Err(IndicatorError::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    let start = candles.len().saturating_sub(window);
    let recent = &candles[start..];

    let mut support = f64::INFINITY;
    let mut resistance = f64::NEG_INFINITY;
    for (offset, candle) in recent.iter().enumerate() {
        if !candle.close.is_finite() {
            return Err(IndicatorError::InvalidValue {
                index: start + offset,
                value: candle.close,
            });
        }
        support = support.min(candle.close);
        resistance = resistance.max(candle.close);
    }

    let spread = resistance - support;

    Ok(Levels {
        support2: support - spread * 0.5,
        support,
        midline: (support + resistance) / 2.0,
        resistance,
        resistance2: resistance + spread * 0.5,
    })
}
