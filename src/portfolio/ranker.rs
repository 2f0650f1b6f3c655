//! # Recommendation Ranker
//!
//! $$
//! \Delta_s = \text{Sharpe}\big(R^{(s)}\big) - \text{Sharpe}(R)
//! $$
//!
//! Read-only candidate evaluation and deterministic ranking by Sharpe
//! improvement. Candidates are projected in parallel over the immutable
//! portfolio snapshot; a failing candidate is skipped with its reason kept
//! observable, never aborting the run.

use std::cmp::Ordering;

use rayon::prelude::*;
use tracing::debug;

use super::TradeDirection;
use super::error::PortfolioError;
use super::returns::project_buy;
use super::returns::project_sell;
use super::sharpe::PerformanceStats;
use super::sharpe::performance_stats;
use super::state::PortfolioState;
use crate::market::matrix::PriceMatrix;

/// Upper bound on recommendations per request.
pub const MAX_RECOMMENDATIONS: usize = 10;
/// Recommendations returned when the caller does not ask for a count.
pub const DEFAULT_RECOMMENDATIONS: usize = 5;
/// Default cap on a buy candidate's current weight.
pub const DEFAULT_CONCENTRATION_CAP: f64 = 0.06;

/// Candidate filtering policy for ranking runs.
#[derive(Clone, Copy, Debug)]
pub struct RankingPolicy {
  /// Exclude buy candidates whose current weight already exceeds this cap.
  pub concentration_cap: Option<f64>,
  /// Drop candidates whose Sharpe improvement is not strictly positive.
  pub require_improvement: bool,
}

impl Default for RankingPolicy {
  fn default() -> Self {
    Self {
      concentration_cap: Some(DEFAULT_CONCENTRATION_CAP),
      require_improvement: true,
    }
  }
}

/// A candidate that survived evaluation, keyed by Sharpe improvement.
#[derive(Clone, Debug)]
pub struct CandidateScore {
  /// Candidate ticker.
  pub ticker: String,
  /// Sharpe improvement over the current portfolio.
  pub improvement: f64,
  /// Annualized performance after the hypothetical trade.
  pub projected: PerformanceStats,
}

/// Why a candidate was left out of the ranking.
#[derive(Debug)]
pub enum SkipReason {
  /// Current weight already exceeds the concentration cap.
  Overweight {
    /// The candidate's current weight.
    weight: f64,
  },
  /// Held value is below the requested sell amount.
  InsufficientHolding {
    /// Dollar value currently held in the candidate.
    held: f64,
  },
  /// The hypothetical projection failed.
  Projection(PortfolioError),
  /// Projected Sharpe does not improve on the current one.
  NoImprovement {
    /// The non-positive improvement that was observed.
    improvement: f64,
  },
}

/// Observable per-candidate outcome of a ranking run.
#[derive(Debug)]
pub enum CandidateOutcome {
  /// Candidate ranked with a positive Sharpe improvement.
  Ranked(CandidateScore),
  /// Candidate excluded, with the reason preserved.
  Skipped {
    /// The excluded ticker.
    ticker: String,
    /// Why it was excluded.
    reason: SkipReason,
  },
}

/// Result of one ranking run.
#[derive(Debug)]
pub struct Ranking {
  /// Direction the run was asked for.
  pub direction: TradeDirection,
  /// Requested trade amount.
  pub amount: f64,
  /// Annualized performance of the unmodified portfolio.
  pub current: PerformanceStats,
  /// Best candidates: improvement descending, ties by ticker ascending.
  pub top: Vec<CandidateScore>,
  /// Every evaluated candidate, in deterministic candidate order.
  pub outcomes: Vec<CandidateOutcome>,
}

/// Evaluate every eligible candidate and rank by Sharpe improvement.
///
/// Buy candidates are all price-history tickers (minus those over the
/// concentration cap); sell candidates are held tickers whose held value
/// covers the requested amount. The portfolio state is never mutated.
pub fn rank(
  state: &PortfolioState,
  matrix: &PriceMatrix,
  direction: TradeDirection,
  amount: f64,
  policy: &RankingPolicy,
  max_recommendations: Option<usize>,
) -> Result<Ranking, PortfolioError> {
  if !amount.is_finite() || amount <= 0.0 {
    return Err(PortfolioError::InvalidInput(format!(
      "trade amount must be positive, got {amount}"
    )));
  }
  let max = max_recommendations
    .unwrap_or(DEFAULT_RECOMMENDATIONS)
    .clamp(1, MAX_RECOMMENDATIONS);
  let current = state.performance();

  let candidates: Vec<String> = match direction {
    TradeDirection::Buy => matrix.tickers().map(str::to_string).collect(),
    TradeDirection::Sell => state.weights().keys().cloned().collect(),
  };

  let outcomes: Vec<CandidateOutcome> = candidates
    .into_par_iter()
    .map(|ticker| evaluate(state, matrix, direction, amount, policy, &current, ticker))
    .collect();

  let mut top: Vec<CandidateScore> = outcomes
    .iter()
    .filter_map(|outcome| match outcome {
      CandidateOutcome::Ranked(score) => Some(score.clone()),
      CandidateOutcome::Skipped { .. } => None,
    })
    .collect();
  top.sort_by(|a, b| {
    b.improvement
      .partial_cmp(&a.improvement)
      .unwrap_or(Ordering::Equal)
      .then_with(|| a.ticker.cmp(&b.ticker))
  });
  top.truncate(max);

  debug!(
    ?direction,
    evaluated = outcomes.len(),
    ranked = top.len(),
    "ranking complete"
  );

  Ok(Ranking {
    direction,
    amount,
    current,
    top,
    outcomes,
  })
}

fn evaluate(
  state: &PortfolioState,
  matrix: &PriceMatrix,
  direction: TradeDirection,
  amount: f64,
  policy: &RankingPolicy,
  current: &PerformanceStats,
  ticker: String,
) -> CandidateOutcome {
  match direction {
    TradeDirection::Buy => {
      if let Some(cap) = policy.concentration_cap {
        let weight = state.weight(&ticker);
        if weight > cap {
          return CandidateOutcome::Skipped {
            ticker,
            reason: SkipReason::Overweight { weight },
          };
        }
      }
    }
    TradeDirection::Sell => {
      let held = state.held_value(&ticker);
      if held < amount {
        return CandidateOutcome::Skipped {
          ticker,
          reason: SkipReason::InsufficientHolding { held },
        };
      }
    }
  }

  let projection = match direction {
    TradeDirection::Buy => project_buy(state, matrix, &ticker, amount),
    TradeDirection::Sell => project_sell(state, matrix, &ticker, amount),
  };
  let projection = match projection {
    Ok(projection) => projection,
    Err(error) => {
      return CandidateOutcome::Skipped {
        ticker,
        reason: SkipReason::Projection(error),
      }
    }
  };

  let projected = performance_stats(&projection.returns, state.risk_free());
  let improvement = projected.sharpe - current.sharpe;
  if policy.require_improvement && improvement <= 0.0 {
    return CandidateOutcome::Skipped {
      ticker,
      reason: SkipReason::NoImprovement { improvement },
    };
  }

  CandidateOutcome::Ranked(CandidateScore {
    ticker,
    improvement,
    projected,
  })
}
