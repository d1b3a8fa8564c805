//! Dispersion and growth statistics over revenue amounts

use statrs::statistics::Statistics;

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Population standard deviation (divides by `n`), `None` for an empty slice
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    match values.len() {
        0 => None,
        1 => Some(0.0),
        _ => Some(values.iter().population_std_dev()),
    }
}

/// Population standard deviation divided by the mean.
///
/// Needs at least two values and a positive mean.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    if avg <= 0.0 {
        return None;
    }
    population_std_dev(values).map(|sd| sd / avg)
}

/// Coefficient of variation clamped to `cap`
pub fn capped_coefficient_of_variation(values: &[f64], cap: f64) -> Option<f64> {
    coefficient_of_variation(values).map(|cv| cv.min(cap))
}

/// `numerator / denominator`, `None` unless the denominator is positive
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 && numerator.is_finite() {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// Percent change from `previous` to `current`, `None` when `previous` is zero
pub fn pct_change(current: f64, previous: f64) -> Option<f64> {
    safe_ratio(current - previous, previous).map(|r| r * 100.0)
}
