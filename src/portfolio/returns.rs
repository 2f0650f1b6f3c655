//! # Return Vector Updater
//!
//! $$
//! R'_t = R_t\,\frac{V}{V'} \pm r_{s,t}\,\frac{a}{V'}
//! $$
//!
//! Exact affine reweighting of the aggregate daily return series for one
//! hypothetical trade, in O(T) without rescanning held tickers.

use ndarray::Array1;
use tracing::debug;

use super::error::PortfolioError;
use super::state::PortfolioState;
use crate::market::matrix::PriceMatrix;

/// Projected effect of one trade on portfolio value and aggregate returns.
#[derive(Clone, Debug)]
pub struct TradeProjection {
  /// Traded ticker.
  pub ticker: String,
  /// Dollar amount actually applied (sells may clip the request).
  pub executed: f64,
  /// Portfolio value after the trade.
  pub value: f64,
  /// Aggregate daily return series after the trade.
  pub returns: Array1<f64>,
}

/// Project a buy of `amount` dollars of `ticker` without mutating state.
///
/// The update is algebraically identical to recomputing the weighted
/// aggregate with all weights scaled by `V/V'` and `a/V'` added on the
/// traded ticker, whether or not the ticker was already held.
pub fn project_buy(
  state: &PortfolioState,
  matrix: &PriceMatrix,
  ticker: &str,
  amount: f64,
) -> Result<TradeProjection, PortfolioError> {
  check_amount(amount)?;
  let series = matrix.returns_of(ticker)?;

  let value = state.value() + amount;
  let scale = state.value() / value;
  let weight = amount / value;
  let returns = state.returns() * scale + series * weight;

  Ok(TradeProjection {
    ticker: ticker.to_string(),
    executed: amount,
    value,
    returns,
  })
}

/// Project a sell of `amount` dollars of `ticker` without mutating state.
///
/// The request is clipped to the currently held value; liquidating the whole
/// portfolio (or more) fails with [`PortfolioError::DegenerateSale`].
pub fn project_sell(
  state: &PortfolioState,
  matrix: &PriceMatrix,
  ticker: &str,
  amount: f64,
) -> Result<TradeProjection, PortfolioError> {
  check_amount(amount)?;
  let series = matrix.returns_of(ticker)?;

  let held = state.held_value(ticker);
  if held <= 0.0 {
    return Err(PortfolioError::InvalidInput(format!("{ticker} is not held")));
  }
  let executed = amount.min(held);
  if executed < amount {
    debug!(ticker, amount, executed, "sell clipped to held value");
  }

  let value = state.value() - executed;
  if value <= 0.0 {
    return Err(PortfolioError::DegenerateSale {
      requested: executed,
      remaining: value,
    });
  }
  let scale = state.value() / value;
  let weight = executed / value;
  let returns = state.returns() * scale - series * weight;

  Ok(TradeProjection {
    ticker: ticker.to_string(),
    executed,
    value,
    returns,
  })
}

fn check_amount(amount: f64) -> Result<(), PortfolioError> {
  if !amount.is_finite() || amount <= 0.0 {
    return Err(PortfolioError::InvalidInput(format!(
      "trade amount must be positive, got {amount}"
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use approx::assert_abs_diff_eq;

  use super::*;
  use crate::portfolio::state::DEFAULT_RISK_FREE;

  fn dates(n: usize) -> Vec<chrono::NaiveDate> {
    (0..n)
      .map(|i| {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64)
      })
      .collect()
  }

  fn sample_matrix() -> PriceMatrix {
    let mut columns = BTreeMap::new();
    columns.insert("A".to_string(), vec![100.0, 101.0, 102.0, 103.0, 104.0]);
    columns.insert("B".to_string(), vec![50.0, 49.0, 51.0, 50.0, 52.0]);
    columns.insert("C".to_string(), vec![20.0, 22.0, 21.0, 23.0, 24.0]);
    PriceMatrix::new(dates(5), columns).unwrap()
  }

  fn sample_state(matrix: &PriceMatrix) -> PortfolioState {
    let tickers = vec!["A".to_string(), "B".to_string()];
    PortfolioState::from_holdings(&tickers, &[100.0, 100.0], matrix, DEFAULT_RISK_FREE)
      .unwrap()
      .state
  }

  #[test]
  fn buy_matches_the_worked_example() {
    let matrix = sample_matrix();
    let state = sample_state(&matrix);

    let projection = project_buy(&state, &matrix, "C", 50.0).unwrap();
    assert_abs_diff_eq!(projection.value, 250.0, epsilon = 1e-12);

    let c = matrix.returns_of("C").unwrap();
    for t in 0..matrix.n_returns() {
      assert_abs_diff_eq!(
        projection.returns[t],
        state.returns()[t] * 0.8 + c[t] * 0.2,
        epsilon = 1e-12
      );
    }
  }

  #[test]
  fn buy_equals_direct_recomputation_with_updated_weights() {
    let matrix = sample_matrix();
    let state = sample_state(&matrix);

    let projection = project_buy(&state, &matrix, "C", 50.0).unwrap();

    let scale = state.value() / projection.value;
    let mut weights: BTreeMap<String, f64> = state
      .weights()
      .iter()
      .map(|(t, w)| (t.clone(), w * scale))
      .collect();
    *weights.entry("C".to_string()).or_insert(0.0) += 50.0 / projection.value;

    let direct = matrix.aggregate_returns(&weights).unwrap();
    for t in 0..matrix.n_returns() {
      assert_abs_diff_eq!(projection.returns[t], direct[t], epsilon = 1e-12);
    }
  }

  #[test]
  fn buying_a_held_ticker_is_still_exact() {
    let matrix = sample_matrix();
    let state = sample_state(&matrix);

    let projection = project_buy(&state, &matrix, "A", 100.0).unwrap();

    let scale = state.value() / projection.value;
    let mut weights: BTreeMap<String, f64> = state
      .weights()
      .iter()
      .map(|(t, w)| (t.clone(), w * scale))
      .collect();
    *weights.entry("A".to_string()).or_insert(0.0) += 100.0 / projection.value;

    let direct = matrix.aggregate_returns(&weights).unwrap();
    for t in 0..matrix.n_returns() {
      assert_abs_diff_eq!(projection.returns[t], direct[t], epsilon = 1e-12);
    }
  }

  #[test]
  fn sell_equals_direct_recomputation_with_updated_weights() {
    let matrix = sample_matrix();
    let state = sample_state(&matrix);

    let projection = project_sell(&state, &matrix, "B", 40.0).unwrap();
    assert_abs_diff_eq!(projection.value, 160.0, epsilon = 1e-12);

    let scale = state.value() / projection.value;
    let mut weights: BTreeMap<String, f64> = state
      .weights()
      .iter()
      .map(|(t, w)| (t.clone(), w * scale))
      .collect();
    *weights.get_mut("B").unwrap() -= 40.0 / projection.value;

    let direct = matrix.aggregate_returns(&weights).unwrap();
    for t in 0..matrix.n_returns() {
      assert_abs_diff_eq!(projection.returns[t], direct[t], epsilon = 1e-12);
    }
  }

  #[test]
  fn sell_clips_to_held_value() {
    let matrix = sample_matrix();
    let state = sample_state(&matrix);

    let projection = project_sell(&state, &matrix, "B", 250.0).unwrap();
    assert_abs_diff_eq!(projection.executed, 100.0, epsilon = 1e-12);
    assert_abs_diff_eq!(projection.value, 100.0, epsilon = 1e-12);
  }

  #[test]
  fn selling_the_whole_portfolio_is_degenerate() {
    let matrix = sample_matrix();
    let tickers = vec!["A".to_string()];
    let state = PortfolioState::from_holdings(&tickers, &[100.0], &matrix, DEFAULT_RISK_FREE)
      .unwrap()
      .state;

    let result = project_sell(&state, &matrix, "A", 100.0);
    assert!(matches!(result, Err(PortfolioError::DegenerateSale { .. })));
  }

  #[test]
  fn unknown_or_unheld_tickers_fail() {
    let matrix = sample_matrix();
    let state = sample_state(&matrix);

    assert!(matches!(
      project_buy(&state, &matrix, "ZZZ", 10.0),
      Err(PortfolioError::UnknownTicker(_))
    ));
    assert!(matches!(
      project_sell(&state, &matrix, "C", 10.0),
      Err(PortfolioError::InvalidInput(_))
    ));
  }

  #[test]
  fn non_positive_amounts_fail() {
    let matrix = sample_matrix();
    let state = sample_state(&matrix);

    assert!(matches!(
      project_buy(&state, &matrix, "A", 0.0),
      Err(PortfolioError::InvalidInput(_))
    ));
    assert!(matches!(
      project_sell(&state, &matrix, "A", -5.0),
      Err(PortfolioError::InvalidInput(_))
    ));
  }
}
