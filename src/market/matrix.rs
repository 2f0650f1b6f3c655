//! # Price Matrix
//!
//! $$
//! r_{s,t} = \frac{P_{s,t}}{P_{s,t-1}} - 1
//! $$
//!
//! Immutable dates × tickers grid of gap-free daily prices with cached
//! per-ticker daily return series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ndarray::Array1;

use crate::portfolio::error::PortfolioError;

/// Validated price history: one strictly increasing date index and one
/// gap-free price column per ticker.
///
/// The matrix is immutable once built; per-ticker daily return series are
/// derived exactly once at construction.
#[derive(Clone, Debug)]
pub struct PriceMatrix {
  dates: Vec<NaiveDate>,
  prices: BTreeMap<String, Vec<f64>>,
  returns: BTreeMap<String, Array1<f64>>,
}

impl PriceMatrix {
  /// Validate raw price columns and derive per-ticker return series.
  pub fn new(
    dates: Vec<NaiveDate>,
    prices: BTreeMap<String, Vec<f64>>,
  ) -> Result<Self, PortfolioError> {
    if dates.len() < 2 {
      return Err(PortfolioError::InvalidInput(format!(
        "price history needs at least 2 dates, got {}",
        dates.len()
      )));
    }
    if !dates.windows(2).all(|w| w[0] < w[1]) {
      return Err(PortfolioError::InvalidInput(
        "date index is not strictly increasing".to_string(),
      ));
    }
    if prices.is_empty() {
      return Err(PortfolioError::InvalidInput(
        "price history has no tickers".to_string(),
      ));
    }
    for (ticker, column) in &prices {
      if column.len() != dates.len() {
        return Err(PortfolioError::InvalidInput(format!(
          "{}: {} prices for {} dates",
          ticker,
          column.len(),
          dates.len()
        )));
      }
      if column.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return Err(PortfolioError::InvalidInput(format!(
          "{ticker}: price column contains a non-positive or missing value"
        )));
      }
    }

    let returns = prices
      .iter()
      .map(|(ticker, column)| (ticker.clone(), simple_returns(column)))
      .collect();

    Ok(Self {
      dates,
      prices,
      returns,
    })
  }

  /// Date index shared by every column.
  pub fn dates(&self) -> &[NaiveDate] {
    &self.dates
  }

  /// Length of every daily return series, `dates − 1`.
  pub fn n_returns(&self) -> usize {
    self.dates.len() - 1
  }

  /// Tickers in deterministic (sorted) order.
  pub fn tickers(&self) -> impl Iterator<Item = &str> {
    self.prices.keys().map(String::as_str)
  }

  /// Number of price columns.
  pub fn n_tickers(&self) -> usize {
    self.prices.len()
  }

  /// Whether the ticker has a price column.
  pub fn contains(&self, ticker: &str) -> bool {
    self.prices.contains_key(ticker)
  }

  /// Price column of a ticker.
  pub fn prices(&self, ticker: &str) -> Option<&[f64]> {
    self.prices.get(ticker).map(Vec::as_slice)
  }

  /// Cached daily return series of a ticker.
  pub fn returns(&self, ticker: &str) -> Option<&Array1<f64>> {
    self.returns.get(ticker)
  }

  /// Daily return series of a ticker, failing on unknown tickers.
  pub fn returns_of(&self, ticker: &str) -> Result<&Array1<f64>, PortfolioError> {
    self
      .returns
      .get(ticker)
      .ok_or_else(|| PortfolioError::UnknownTicker(ticker.to_string()))
  }

  /// Weighted per-date aggregate of ticker return series.
  ///
  /// Full O(T·N) recomputation over every weighted ticker; used once at
  /// portfolio construction and as the reference the incremental trade
  /// algebra is checked against.
  pub fn aggregate_returns(
    &self,
    weights: &BTreeMap<String, f64>,
  ) -> Result<Array1<f64>, PortfolioError> {
    let mut aggregate = Array1::zeros(self.n_returns());
    for (ticker, weight) in weights {
      let series = self.returns_of(ticker)?;
      aggregate = aggregate + series * *weight;
    }
    Ok(aggregate)
  }
}

fn simple_returns(prices: &[f64]) -> Array1<f64> {
  prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}
