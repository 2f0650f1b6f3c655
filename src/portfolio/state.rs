//! # Portfolio State
//!
//! $$
//! w_s = \frac{a_s}{\sum_i a_i}, \qquad R_t = \sum_s w_s\, r_{s,t}
//! $$
//!
//! Normalized holdings, total value and the cached aggregate daily return
//! series kept consistent by the transaction executor.

use std::collections::BTreeMap;

use ndarray::Array1;
use serde::Serialize;
use tracing::warn;

use super::error::PortfolioError;
use super::sharpe::PerformanceStats;
use super::sharpe::performance_stats;
use crate::market::matrix::PriceMatrix;

/// Annualized risk-free rate applied when the caller does not supply one.
pub const DEFAULT_RISK_FREE: f64 = 0.045;
/// Maximum tolerated drift of the weight sum away from one.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Aggregate holdings as normalized weights plus the matching daily return
/// series.
///
/// Mutated only through the transaction executor; every observable state is
/// a valid one.
#[derive(Clone, Debug)]
pub struct PortfolioState {
  value: f64,
  weights: BTreeMap<String, f64>,
  returns: Array1<f64>,
  risk_free: f64,
}

/// Construction output: the state plus the holdings dropped against the
/// price history.
#[derive(Debug)]
pub struct ConstructedPortfolio {
  /// The validated portfolio state.
  pub state: PortfolioState,
  /// Tickers dropped because the price history has no column for them (or
  /// the holding carried no dollar value).
  pub dropped: Vec<String>,
}

/// Reporting snapshot of one portfolio state.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
  /// Total dollar value.
  pub value: f64,
  /// Normalized weights in ticker order.
  pub weights: BTreeMap<String, f64>,
  /// Annualized Sharpe ratio of the aggregate return series.
  pub sharpe_ratio: f64,
  /// Number of held positions.
  pub positions: usize,
}

impl PortfolioState {
  /// Build a portfolio from parallel ticker/amount slices.
  ///
  /// Holdings whose ticker has no price column, and zero-dollar holdings,
  /// are dropped and reported back through [`ConstructedPortfolio::dropped`].
  /// Duplicate tickers have their amounts combined.
  pub fn from_holdings(
    tickers: &[String],
    amounts: &[f64],
    matrix: &PriceMatrix,
    risk_free: f64,
  ) -> Result<ConstructedPortfolio, PortfolioError> {
    if tickers.len() != amounts.len() {
      return Err(PortfolioError::InvalidInput(format!(
        "{} tickers for {} amounts",
        tickers.len(),
        amounts.len()
      )));
    }
    if tickers.is_empty() {
      return Err(PortfolioError::InvalidInput("empty holdings".to_string()));
    }
    if let Some(i) = amounts.iter().position(|a| !a.is_finite() || *a < 0.0) {
      return Err(PortfolioError::InvalidInput(format!(
        "negative or non-finite amount {} for {}",
        amounts[i], tickers[i]
      )));
    }

    let mut retained: Vec<(&String, f64)> = Vec::with_capacity(tickers.len());
    let mut dropped = Vec::new();
    for (ticker, amount) in tickers.iter().zip(amounts) {
      if matrix.contains(ticker) && *amount > 0.0 {
        retained.push((ticker, *amount));
      } else {
        dropped.push(ticker.clone());
      }
    }
    if retained.is_empty() {
      return Err(PortfolioError::NoValidPositions);
    }
    if !dropped.is_empty() {
      warn!(?dropped, "holdings dropped against the price history");
    }

    let value: f64 = retained.iter().map(|(_, amount)| amount).sum();
    let mut weights = BTreeMap::new();
    for (ticker, amount) in &retained {
      *weights.entry((*ticker).clone()).or_insert(0.0) += amount / value;
    }
    let returns = matrix.aggregate_returns(&weights)?;

    Ok(ConstructedPortfolio {
      state: Self {
        value,
        weights,
        returns,
        risk_free,
      },
      dropped,
    })
  }

  /// Total dollar value.
  pub fn value(&self) -> f64 {
    self.value
  }

  /// Normalized weights in deterministic ticker order.
  pub fn weights(&self) -> &BTreeMap<String, f64> {
    &self.weights
  }

  /// Aggregate daily return series aligned with the price-history dates.
  pub fn returns(&self) -> &Array1<f64> {
    &self.returns
  }

  /// Annualized risk-free rate fixed at construction.
  pub fn risk_free(&self) -> f64 {
    self.risk_free
  }

  /// Weight of one ticker, zero when not held.
  pub fn weight(&self, ticker: &str) -> f64 {
    self.weights.get(ticker).copied().unwrap_or(0.0)
  }

  /// Dollar value currently held in one ticker.
  pub fn held_value(&self, ticker: &str) -> f64 {
    self.weight(ticker) * self.value
  }

  /// Number of held positions.
  pub fn positions(&self) -> usize {
    self.weights.len()
  }

  /// Annualized performance of the aggregate return series.
  pub fn performance(&self) -> PerformanceStats {
    performance_stats(&self.returns, self.risk_free)
  }

  /// Annualized Sharpe ratio of the aggregate return series.
  pub fn sharpe(&self) -> f64 {
    self.performance().sharpe
  }

  /// Reporting snapshot of the current state.
  pub fn summary(&self) -> PortfolioSummary {
    PortfolioSummary {
      value: self.value,
      weights: self.weights.clone(),
      sharpe_ratio: self.sharpe(),
      positions: self.positions(),
    }
  }

  /// Verify the state invariants against the price history.
  pub fn check_invariants(&self, matrix: &PriceMatrix) -> Result<(), PortfolioError> {
    if self.value <= 0.0 {
      return Err(PortfolioError::InvalidInput(format!(
        "portfolio value {} is not positive",
        self.value
      )));
    }
    for (ticker, weight) in &self.weights {
      if !matrix.contains(ticker) {
        return Err(PortfolioError::UnknownTicker(ticker.clone()));
      }
      if *weight < 0.0 {
        return Err(PortfolioError::InvalidInput(format!(
          "negative weight {weight} for {ticker}"
        )));
      }
    }
    let total: f64 = self.weights.values().sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
      return Err(PortfolioError::InvalidInput(format!(
        "weight sum {total} drifted beyond tolerance"
      )));
    }
    if self.returns.len() != matrix.n_returns() {
      return Err(PortfolioError::InvalidInput(format!(
        "{} aggregate returns for {} dates",
        self.returns.len(),
        matrix.dates().len()
      )));
    }
    Ok(())
  }

  pub(crate) fn apply(&mut self, value: f64, weights: BTreeMap<String, f64>, returns: Array1<f64>) {
    self.value = value;
    self.weights = weights;
    self.returns = returns;
  }
}
