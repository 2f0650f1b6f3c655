//! # Errors
//!
//! $$
//! \text{validate} : \text{inputs} \to \text{Result}\langle\cdot,\ \text{PortfolioError}\rangle
//! $$
//!
//! Error taxonomy for portfolio construction, trade projection and commits.

use thiserror::Error;

/// Failures surfaced by portfolio construction, trade projection and
/// committed transactions.
///
/// Numeric guards (near-zero volatility, sub-2-point series) are not errors;
/// they yield a neutral Sharpe of zero instead.
#[derive(Debug, Error)]
pub enum PortfolioError {
  /// Malformed caller input: mismatched slice lengths, empty holdings,
  /// negative or non-finite amounts, malformed price history.
  #[error("invalid input: {0}")]
  InvalidInput(String),
  /// Every supplied holding was filtered out against the price history.
  #[error("no valid positions remain after filtering against the price history")]
  NoValidPositions,
  /// The ticker has no column in the price history.
  #[error("unknown ticker: {0}")]
  UnknownTicker(String),
  /// The sale would reduce the portfolio value to zero or below.
  #[error("degenerate sale: selling {requested:.2} leaves portfolio value {remaining:.2}")]
  DegenerateSale {
    /// Dollar amount of the rejected sale, after clipping.
    requested: f64,
    /// Portfolio value the sale would have left behind.
    remaining: f64,
  },
}
