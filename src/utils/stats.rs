//! Statistical utility functions.

/// Calculate the mean of a slice.
///
/// Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the finite values in a slice, skipping NaN and infinities.
///
/// Returns `None` when the slice holds no finite value.
///
/// # Example
/// ```
/// use traffic_forecast::utils::stats::finite_mean;
///
/// assert_eq!(finite_mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
/// assert_eq!(finite_mean(&[f64::NAN]), None);
/// ```
pub fn finite_mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Root mean squared value of a slice of residuals.
pub fn rms(residuals: &[f64]) -> f64 {
    if residuals.is_empty() {
        return f64::NAN;
    }
    (residuals.iter().map(|r| r * r).sum::<f64>() / residuals.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn finite_mean_skips_missing() {
        assert_eq!(finite_mean(&[2.0, f64::NAN, 4.0, f64::INFINITY]), Some(3.0));
        assert_eq!(finite_mean(&[f64::NAN, f64::NAN]), None);
        assert_eq!(finite_mean(&[]), None);
    }

    #[test]
    fn rms_of_residuals() {
        assert_relative_eq!(rms(&[3.0, -4.0]), (12.5_f64).sqrt(), epsilon = 1e-12);
        assert!(rms(&[]).is_nan());
    }
}
