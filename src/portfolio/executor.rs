//! # Transaction Executor
//!
//! $$
//! w'_i = w_i\,\frac{V}{V'}, \qquad w'_s \mathrel{{+}{=}} \pm\frac{a}{V'}
//! $$
//!
//! Committed buy/sell transitions. A commit validates fully via the same
//! projection algebra the ranker uses, then swaps in the new value, weights
//! and aggregate return series in one step; a failed transaction leaves the
//! prior state untouched.

use std::collections::BTreeMap;

use tracing::debug;

use super::TradeDirection;
use super::error::PortfolioError;
use super::returns::TradeProjection;
use super::returns::project_buy;
use super::returns::project_sell;
use super::state::PortfolioState;
use super::state::WEIGHT_TOLERANCE;
use crate::market::matrix::PriceMatrix;

/// Record of one committed transaction.
#[derive(Clone, Debug)]
pub struct ExecutedTrade {
  /// Traded ticker.
  pub ticker: String,
  /// Buy or sell.
  pub direction: TradeDirection,
  /// Amount the caller asked for.
  pub requested: f64,
  /// Amount applied after sell clipping.
  pub executed: f64,
  /// Portfolio value after the commit.
  pub value: f64,
  /// Annualized Sharpe ratio after the commit.
  pub sharpe: f64,
}

/// Commit a buy, mutating the state only after full validation.
pub fn commit_buy(
  state: &mut PortfolioState,
  matrix: &PriceMatrix,
  ticker: &str,
  amount: f64,
) -> Result<ExecutedTrade, PortfolioError> {
  let projection = project_buy(state, matrix, ticker, amount)?;

  let scale = state.value() / projection.value;
  let mut weights = scaled_weights(state, scale);
  *weights.entry(ticker.to_string()).or_insert(0.0) += projection.executed / projection.value;

  Ok(finish(state, weights, projection, TradeDirection::Buy, amount))
}

/// Commit a sell, clipping to the held value and mutating the state only
/// after full validation.
pub fn commit_sell(
  state: &mut PortfolioState,
  matrix: &PriceMatrix,
  ticker: &str,
  amount: f64,
) -> Result<ExecutedTrade, PortfolioError> {
  let projection = project_sell(state, matrix, ticker, amount)?;

  let scale = state.value() / projection.value;
  let mut weights = scaled_weights(state, scale);
  if let Some(weight) = weights.get_mut(ticker) {
    *weight -= projection.executed / projection.value;
  }
  weights.retain(|_, weight| *weight > 0.0);

  Ok(finish(state, weights, projection, TradeDirection::Sell, amount))
}

fn scaled_weights(state: &PortfolioState, scale: f64) -> BTreeMap<String, f64> {
  state
    .weights()
    .iter()
    .map(|(ticker, weight)| (ticker.clone(), weight * scale))
    .collect()
}

fn finish(
  state: &mut PortfolioState,
  mut weights: BTreeMap<String, f64>,
  projection: TradeProjection,
  direction: TradeDirection,
  requested: f64,
) -> ExecutedTrade {
  // renormalize only when float drift exceeds tolerance
  let total: f64 = weights.values().sum();
  if (total - 1.0).abs() > WEIGHT_TOLERANCE {
    for weight in weights.values_mut() {
      *weight /= total;
    }
  }

  let TradeProjection {
    ticker,
    executed,
    value,
    returns,
  } = projection;
  state.apply(value, weights, returns);

  debug!(%ticker, ?direction, executed, value, "transaction committed");

  ExecutedTrade {
    ticker,
    direction,
    requested,
    executed,
    value,
    sharpe: state.sharpe(),
  }
}
