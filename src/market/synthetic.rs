//! # Synthetic Prices
//!
//! $$
//! S_{t+1} = S_t\,\big(1 + \mu\,\Delta t + \sigma\,\Delta W_t\big)
//! $$
//!
//! Euler-discretized geometric-Brownian price paths for demos, benches and
//! tests. Not a market data source.

use std::collections::BTreeMap;

use chrono::Datelike;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::Weekday;
use impl_new_derive::ImplNew;
use ndarray::Array1;
use ndarray_rand::RandomExt;
use rand_distr::Normal;

use super::matrix::PriceMatrix;
use crate::portfolio::error::PortfolioError;

/// Geometric Brownian motion price path with daily steps.
#[derive(Clone, Debug, ImplNew)]
pub struct GbmPrices {
  /// Annualized drift.
  pub mu: f64,
  /// Annualized volatility.
  pub sigma: f64,
  /// Initial price.
  pub s0: f64,
  /// Number of daily prices to generate.
  pub n: usize,
}

impl GbmPrices {
  /// Sample one daily price path of length `n`.
  pub fn sample(&self) -> Vec<f64> {
    if self.n == 0 {
      return Vec::new();
    }

    let dt: f64 = 1.0 / 252.0;
    let gn = Array1::random(self.n.saturating_sub(1), Normal::new(0.0, dt.sqrt()).unwrap());

    let mut path = Vec::with_capacity(self.n);
    path.push(self.s0);
    for i in 1..self.n {
      let prev = path[i - 1];
      let next = prev + self.mu * prev * dt + self.sigma * prev * gn[i - 1];
      // price grid requires strictly positive values
      path.push(next.max(1e-6));
    }
    path
  }
}

/// Named GBM specs sharing one weekday date index.
pub struct SyntheticUniverse {
  start: NaiveDate,
  n: usize,
  specs: Vec<(String, GbmPrices)>,
}

impl SyntheticUniverse {
  /// Universe of `n` trading days starting at the first weekday on or after
  /// `start`.
  pub fn new(start: NaiveDate, n: usize) -> Self {
    Self {
      start,
      n,
      specs: Vec::new(),
    }
  }

  /// Add one GBM asset to the universe.
  pub fn asset(mut self, ticker: &str, mu: f64, sigma: f64, s0: f64) -> Self {
    self
      .specs
      .push((ticker.to_string(), GbmPrices::new(mu, sigma, s0, self.n)));
    self
  }

  /// Sample every asset and assemble the price matrix.
  pub fn build(&self) -> Result<PriceMatrix, PortfolioError> {
    let mut columns = BTreeMap::new();
    for (ticker, spec) in &self.specs {
      columns.insert(ticker.clone(), spec.sample());
    }
    PriceMatrix::new(trading_dates(self.start, self.n), columns)
  }
}

/// Consecutive weekdays starting on or after `start`, `n` entries.
pub fn trading_dates(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
  let mut dates = Vec::with_capacity(n);
  let mut day = start;
  while dates.len() < n {
    if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
      dates.push(day);
    }
    day = day + Duration::days(1);
  }
  dates
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trading_dates_skip_weekends() {
    // 2024-01-05 is a Friday
    let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
    let dates = trading_dates(start, 3);

    assert_eq!(dates[0].weekday(), Weekday::Fri);
    assert_eq!(dates[1].weekday(), Weekday::Mon);
    assert_eq!(dates[2].weekday(), Weekday::Tue);
  }

  #[test]
  fn gbm_paths_have_the_requested_length() {
    let path = GbmPrices::new(0.08, 0.2, 100.0, 260).sample();
    assert_eq!(path.len(), 260);
    assert_eq!(path[0], 100.0);
    assert!(path.iter().all(|p| *p > 0.0));
  }

  #[test]
  fn universe_builds_a_valid_matrix() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let matrix = SyntheticUniverse::new(start, 64)
      .asset("AAA", 0.10, 0.25, 120.0)
      .asset("BBB", 0.04, 0.15, 60.0)
      .build()
      .unwrap();

    assert_eq!(matrix.n_tickers(), 2);
    assert_eq!(matrix.dates().len(), 64);
    assert_eq!(matrix.returns_of("AAA").unwrap().len(), 63);
  }
}
