//! # Rebalance Engine
//!
//! $$
//! \text{trade}^\* = \arg\max_{(s,\,\pm a)} \Delta\text{Sharpe}
//! $$
//!
//! High-level facade wiring price history, portfolio state and configuration
//! into recommendation and transaction workflows.

use serde::Serialize;

use super::TradeDirection;
use super::error::PortfolioError;
use super::executor::ExecutedTrade;
use super::executor::commit_buy;
use super::executor::commit_sell;
use super::ranker::DEFAULT_RECOMMENDATIONS;
use super::ranker::Ranking;
use super::ranker::RankingPolicy;
use super::ranker::rank;
use super::report::RebalanceReport;
use super::sharpe::performance_stats;
use super::state::ConstructedPortfolio;
use super::state::DEFAULT_RISK_FREE;
use super::state::PortfolioState;
use super::state::PortfolioSummary;
use crate::market::matrix::PriceMatrix;

/// Runtime configuration for [`Rebalancer`].
#[derive(Clone, Copy, Debug)]
pub struct RebalanceConfig {
  /// Annualized risk-free rate used in Sharpe computations.
  pub risk_free: f64,
  /// Candidate filtering policy for ranking runs.
  pub ranking: RankingPolicy,
  /// Recommendations returned per query, clamped to 1..=10.
  pub max_recommendations: usize,
}

impl Default for RebalanceConfig {
  fn default() -> Self {
    Self {
      risk_free: DEFAULT_RISK_FREE,
      ranking: RankingPolicy::default(),
      max_recommendations: DEFAULT_RECOMMENDATIONS,
    }
  }
}

/// Annualized per-asset metrics over the full price history.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetrics {
  /// Asset ticker.
  pub ticker: String,
  /// Annualized mean daily return.
  pub annualized_return: f64,
  /// Annualized volatility of daily returns.
  pub annualized_vol: f64,
}

/// Single entry-point engine for recommendation and transaction workflows.
///
/// Holds the immutable price history next to the live portfolio state, so
/// recommendation queries and committed trades stay consistent with one
/// another across an interactive session.
#[derive(Clone, Debug)]
pub struct Rebalancer {
  matrix: PriceMatrix,
  state: PortfolioState,
  dropped: Vec<String>,
  config: RebalanceConfig,
}

impl Rebalancer {
  /// Build the engine from a price history and initial holdings.
  pub fn new(
    matrix: PriceMatrix,
    tickers: &[String],
    amounts: &[f64],
    config: RebalanceConfig,
  ) -> Result<Self, PortfolioError> {
    let ConstructedPortfolio { state, dropped } =
      PortfolioState::from_holdings(tickers, amounts, &matrix, config.risk_free)?;
    Ok(Self {
      matrix,
      state,
      dropped,
      config,
    })
  }

  /// Borrow the engine configuration.
  pub fn config(&self) -> &RebalanceConfig {
    &self.config
  }

  /// Borrow the price history.
  pub fn matrix(&self) -> &PriceMatrix {
    &self.matrix
  }

  /// Borrow the live portfolio state.
  pub fn state(&self) -> &PortfolioState {
    &self.state
  }

  /// Holdings dropped at construction because the price history lacks them.
  pub fn dropped(&self) -> &[String] {
    &self.dropped
  }

  /// Rank candidates for one direction without mutating the portfolio.
  pub fn rank(
    &self,
    direction: TradeDirection,
    amount: f64,
    max_recommendations: Option<usize>,
  ) -> Result<Ranking, PortfolioError> {
    let max = max_recommendations.unwrap_or(self.config.max_recommendations);
    rank(
      &self.state,
      &self.matrix,
      direction,
      amount,
      &self.config.ranking,
      Some(max),
    )
  }

  /// Full recommendation report for one direction.
  pub fn recommend(
    &self,
    direction: TradeDirection,
    amount: f64,
  ) -> Result<RebalanceReport, PortfolioError> {
    let ranking = self.rank(direction, amount, None)?;
    Ok(RebalanceReport::from_ranking(&ranking, self.state.value()))
  }

  /// Buy recommendations for `amount` dollars.
  pub fn recommend_buy(&self, amount: f64) -> Result<RebalanceReport, PortfolioError> {
    self.recommend(TradeDirection::Buy, amount)
  }

  /// Sell recommendations for `amount` dollars.
  pub fn recommend_sell(&self, amount: f64) -> Result<RebalanceReport, PortfolioError> {
    self.recommend(TradeDirection::Sell, amount)
  }

  /// Commit a buy against the live state.
  pub fn buy(&mut self, ticker: &str, amount: f64) -> Result<ExecutedTrade, PortfolioError> {
    commit_buy(&mut self.state, &self.matrix, ticker, amount)
  }

  /// Commit a sell against the live state.
  pub fn sell(&mut self, ticker: &str, amount: f64) -> Result<ExecutedTrade, PortfolioError> {
    commit_sell(&mut self.state, &self.matrix, ticker, amount)
  }

  /// Reporting snapshot of the live portfolio.
  pub fn summary(&self) -> PortfolioSummary {
    self.state.summary()
  }

  /// Annualized return and volatility per ticker over the full history.
  pub fn asset_metrics(&self) -> Vec<AssetMetrics> {
    self
      .matrix
      .tickers()
      .filter_map(|ticker| {
        let series = self.matrix.returns(ticker)?;
        let stats = performance_stats(series, self.config.risk_free);
        Some(AssetMetrics {
          ticker: ticker.to_string(),
          annualized_return: stats.annualized_return,
          annualized_vol: stats.annualized_vol,
        })
      })
      .collect()
  }
}
