//! Human-readable run summary.

use crate::adjustment::SensitivityCoefficient;
use std::fmt;

/// Figures reported to the user after a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub coefficient: SensitivityCoefficient,
    pub forecast_customer_change: f64,
    pub adjustment_applied: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Estimated traffic change per customer: {}",
            self.coefficient
        )?;
        writeln!(
            f,
            "Applied expected customer change: {} customers (+ increase, - drop)",
            group_thousands(self.forecast_customer_change)
        )?;
        if !self.adjustment_applied {
            let reason = if self.coefficient.is_zero() {
                "no traffic-per-customer signal in the history"
            } else {
                "expected customer change is zero"
            };
            writeln!(
                f,
                "No customer adjustment applied ({reason}); adjusted forecast equals the raw forecast"
            )?;
        }
        Ok(())
    }
}

/// Format a number with comma thousands separators.
///
/// Whole numbers print without a fractional part; anything else keeps two
/// decimals.
pub fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if frac != "00" {
        grouped.push('.');
        grouped.push_str(frac);
    }

    if value < 0.0 && grouped.chars().any(|c| c != '0' && c != ',' && c != '.') {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_thousands_formats() {
        assert_eq!(group_thousands(200_000.0), "200,000");
        assert_eq!(group_thousands(-425_000.0), "-425,000");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1_000.0), "1,000");
        assert_eq!(group_thousands(0.0), "0");
        assert_eq!(group_thousands(-0.0), "0");
        assert_eq!(group_thousands(1_234_567.5), "1,234,567.50");
        assert_eq!(group_thousands(12.999), "13");
    }

    #[test]
    fn summary_reports_coefficient_and_change() {
        let summary = Summary {
            coefficient: SensitivityCoefficient::new(-0.00046),
            forecast_customer_change: 50_000.0,
            adjustment_applied: true,
        };

        assert_eq!(
            summary.to_string(),
            "Estimated traffic change per customer: -0.000460\n\
             Applied expected customer change: 50,000 customers (+ increase, - drop)\n"
        );
    }

    #[test]
    fn summary_flags_no_op_adjustment() {
        let summary = Summary {
            coefficient: SensitivityCoefficient::ZERO,
            forecast_customer_change: -20_000.0,
            adjustment_applied: false,
        };

        let text = summary.to_string();
        assert!(text.contains("per customer: 0.000000"));
        assert!(text.contains("-20,000 customers"));
        assert!(text.contains("no traffic-per-customer signal"));

        let summary = Summary {
            coefficient: SensitivityCoefficient::new(0.01),
            forecast_customer_change: 0.0,
            adjustment_applied: false,
        };
        assert!(summary.to_string().contains("expected customer change is zero"));
    }
}
