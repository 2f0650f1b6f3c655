//! # Portfolio Engine
//!
//! $$
//! \text{Sharpe} = \frac{\mathbb E[R_p] - r_f}{\sigma_{R_p}}
//! $$
//!
//! Portfolio state, incremental return-vector algebra, Sharpe computation,
//! candidate ranking and committed transactions.

use std::fmt::Display;

use serde::Serialize;

pub mod engine;
pub mod error;
pub mod executor;
pub mod ranker;
pub mod report;
pub mod returns;
pub mod sharpe;
pub mod state;

pub use engine::AssetMetrics;
pub use engine::RebalanceConfig;
pub use engine::Rebalancer;
pub use error::PortfolioError;
pub use executor::ExecutedTrade;
pub use executor::commit_buy;
pub use executor::commit_sell;
pub use ranker::CandidateOutcome;
pub use ranker::CandidateScore;
pub use ranker::DEFAULT_CONCENTRATION_CAP;
pub use ranker::DEFAULT_RECOMMENDATIONS;
pub use ranker::MAX_RECOMMENDATIONS;
pub use ranker::Ranking;
pub use ranker::RankingPolicy;
pub use ranker::SkipReason;
pub use ranker::rank;
pub use report::CurrentPerformance;
pub use report::RebalanceReport;
pub use report::TopCandidate;
pub use report::TradeAdvice;
pub use returns::TradeProjection;
pub use returns::project_buy;
pub use returns::project_sell;
pub use sharpe::PerformanceStats;
pub use sharpe::TRADING_DAYS;
pub use sharpe::VOL_EPSILON;
pub use sharpe::performance_stats;
pub use sharpe::sharpe_ratio;
pub use state::ConstructedPortfolio;
pub use state::DEFAULT_RISK_FREE;
pub use state::PortfolioState;
pub use state::PortfolioSummary;
pub use state::WEIGHT_TOLERANCE;

/// Trade direction for recommendations and committed transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
  Buy,
  Sell,
}

impl TradeDirection {
  /// Parse a direction string, defaulting to buy.
  pub fn from_str(s: &str) -> Self {
    match s.to_lowercase().as_str() {
      "sell" | "s" => Self::Sell,
      _ => Self::Buy,
    }
  }
}

impl Display for TradeDirection {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TradeDirection::Buy => write!(f, "buy"),
      TradeDirection::Sell => write!(f, "sell"),
    }
  }
}
