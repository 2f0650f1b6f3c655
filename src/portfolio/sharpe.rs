//! # Sharpe Calculator
//!
//! $$
//! \text{Sharpe} = \frac{252\,\bar r - r_f}{\sqrt{252}\,\sigma_r}
//! $$
//!
//! Annualization of daily return series with guards for degenerate inputs.

use ndarray::Array1;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;
/// Annualized volatility at or below this level yields a neutral Sharpe of zero.
pub const VOL_EPSILON: f64 = 1e-6;

/// Annualized performance of a daily return series.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformanceStats {
  /// Mean daily return scaled to a 252-day year.
  pub annualized_return: f64,
  /// Population standard deviation of daily returns scaled to a year.
  pub annualized_vol: f64,
  /// Excess return over the risk-free rate per unit of volatility.
  pub sharpe: f64,
}

/// Annualize a daily return series against a risk-free rate.
///
/// Series with fewer than two points or volatility below [`VOL_EPSILON`]
/// report a Sharpe of exactly zero instead of propagating NaN or infinity.
pub fn performance_stats(series: &Array1<f64>, risk_free: f64) -> PerformanceStats {
  if series.len() < 2 {
    return PerformanceStats::default();
  }

  let annualized_return = series.mean().unwrap_or(0.0) * TRADING_DAYS;
  let annualized_vol = series.std(0.0) * TRADING_DAYS.sqrt();
  let sharpe = if annualized_vol > VOL_EPSILON {
    (annualized_return - risk_free) / annualized_vol
  } else {
    0.0
  };

  PerformanceStats {
    annualized_return,
    annualized_vol,
    sharpe,
  }
}

/// Annualized Sharpe ratio of a daily return series.
pub fn sharpe_ratio(series: &Array1<f64>, risk_free: f64) -> f64 {
  performance_stats(series, risk_free).sharpe
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;

  #[test]
  fn short_series_reports_zero() {
    assert_eq!(sharpe_ratio(&Array1::<f64>::zeros(0), 0.045), 0.0);
    assert_eq!(sharpe_ratio(&Array1::from(vec![0.01]), 0.045), 0.0);
  }

  #[test]
  fn constant_series_reports_zero() {
    let series = Array1::from(vec![0.01; 40]);
    assert_eq!(sharpe_ratio(&series, 0.045), 0.0);
  }

  #[test]
  fn annualization_matches_hand_computation() {
    let series = Array1::from(vec![0.01, -0.005, 0.002, 0.007, -0.001]);
    let stats = performance_stats(&series, 0.045);

    let mean = series.mean().unwrap();
    let vol = series.std(0.0);
    assert_abs_diff_eq!(stats.annualized_return, mean * 252.0, epsilon = 1e-12);
    assert_abs_diff_eq!(stats.annualized_vol, vol * 252.0_f64.sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(
      stats.sharpe,
      (mean * 252.0 - 0.045) / (vol * 252.0_f64.sqrt()),
      epsilon = 1e-12
    );
  }

  #[test]
  fn sharpe_is_negative_below_risk_free() {
    let series = Array1::from(vec![0.0001, -0.0002, 0.0001, -0.0001, 0.0002]);
    assert!(sharpe_ratio(&series, 0.045) < 0.0);
  }
}
