//! # Recommendation Report
//!
//! $$
//! \text{report} = (\text{current},\ \text{top},\ \text{recommendation},\ V)
//! $$
//!
//! Serializable output contract of one recommendation query.

use serde::Serialize;

use super::TradeDirection;
use super::ranker::Ranking;

/// Annualized performance of the unmodified portfolio.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CurrentPerformance {
  /// Annualized return of the aggregate series.
  #[serde(rename = "return")]
  pub annualized_return: f64,
  /// Annualized volatility of the aggregate series.
  #[serde(rename = "std")]
  pub annualized_vol: f64,
  /// Annualized Sharpe ratio.
  #[serde(rename = "riskReward")]
  pub risk_reward: f64,
}

/// One ranked candidate.
#[derive(Clone, Debug, Serialize)]
pub struct TopCandidate {
  /// Candidate ticker.
  pub ticker: String,
  /// Sharpe improvement over the current portfolio (the ranking key).
  #[serde(rename = "riskReward")]
  pub risk_reward: f64,
  /// Projected annualized return after the hypothetical trade.
  #[serde(rename = "expectedReturn")]
  pub expected_return: f64,
  /// Projected annualized volatility after the hypothetical trade.
  #[serde(rename = "expectedStd")]
  pub expected_std: f64,
}

/// The single advised trade, present when any candidate improves the
/// portfolio.
#[derive(Clone, Debug, Serialize)]
pub struct TradeAdvice {
  /// Buy or sell.
  pub action: TradeDirection,
  /// Advised ticker.
  pub ticker: String,
  /// Sharpe improvement of the advised trade.
  #[serde(rename = "riskRewardDiff")]
  pub risk_reward_diff: f64,
  /// Change in annualized return.
  #[serde(rename = "returnDiff")]
  pub return_diff: f64,
  /// Change in annualized volatility.
  #[serde(rename = "stdDiff")]
  pub std_diff: f64,
  /// Dollar amount of the advised trade.
  pub amount: f64,
}

/// Output contract of one recommendation query.
#[derive(Clone, Debug, Serialize)]
pub struct RebalanceReport {
  /// Current portfolio performance.
  pub current: CurrentPerformance,
  /// Ranked candidates, Sharpe improvement descending.
  pub top: Vec<TopCandidate>,
  /// Best candidate, `null` when nothing improves the portfolio.
  pub recommendation: Option<TradeAdvice>,
  /// Portfolio value before the advised trade.
  #[serde(rename = "portfolioValue")]
  pub portfolio_value: f64,
}

impl RebalanceReport {
  /// Assemble the report from a ranking run and the portfolio value.
  pub fn from_ranking(ranking: &Ranking, portfolio_value: f64) -> Self {
    let current = CurrentPerformance {
      annualized_return: ranking.current.annualized_return,
      annualized_vol: ranking.current.annualized_vol,
      risk_reward: ranking.current.sharpe,
    };

    let top = ranking
      .top
      .iter()
      .map(|score| TopCandidate {
        ticker: score.ticker.clone(),
        risk_reward: score.improvement,
        expected_return: score.projected.annualized_return,
        expected_std: score.projected.annualized_vol,
      })
      .collect();

    let recommendation = ranking.top.first().map(|best| TradeAdvice {
      action: ranking.direction,
      ticker: best.ticker.clone(),
      risk_reward_diff: best.improvement,
      return_diff: best.projected.annualized_return - ranking.current.annualized_return,
      std_diff: best.projected.annualized_vol - ranking.current.annualized_vol,
      amount: ranking.amount,
    });

    Self {
      current,
      top,
      recommendation,
      portfolio_value,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::portfolio::CandidateScore;
  use crate::portfolio::sharpe::PerformanceStats;

  fn ranking_with(top: Vec<CandidateScore>) -> Ranking {
    Ranking {
      direction: TradeDirection::Buy,
      amount: 500.0,
      current: PerformanceStats {
        annualized_return: 0.10,
        annualized_vol: 0.20,
        sharpe: 0.275,
      },
      top,
      outcomes: Vec::new(),
    }
  }

  #[test]
  fn empty_ranking_serializes_a_null_recommendation() {
    let report = RebalanceReport::from_ranking(&ranking_with(Vec::new()), 1_000.0);
    let json = serde_json::to_value(&report).unwrap();

    assert!(json["recommendation"].is_null());
    assert_eq!(json["top"].as_array().unwrap().len(), 0);
    assert_eq!(json["portfolioValue"], 1_000.0);
  }

  #[test]
  fn report_uses_the_wire_field_names() {
    let score = CandidateScore {
      ticker: "AAA".to_string(),
      improvement: 0.125,
      projected: PerformanceStats {
        annualized_return: 0.12,
        annualized_vol: 0.18,
        sharpe: 0.4,
      },
    };
    let report = RebalanceReport::from_ranking(&ranking_with(vec![score]), 1_000.0);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["current"]["riskReward"], 0.275);
    assert_eq!(json["current"]["return"], 0.10);
    assert_eq!(json["current"]["std"], 0.20);
    assert_eq!(json["top"][0]["ticker"], "AAA");
    assert_eq!(json["top"][0]["riskReward"], 0.125);
    assert_eq!(json["top"][0]["expectedReturn"], 0.12);
    assert_eq!(json["top"][0]["expectedStd"], 0.18);

    let advice = &json["recommendation"];
    assert_eq!(advice["action"], "buy");
    assert_eq!(advice["ticker"], "AAA");
    assert_eq!(advice["riskRewardDiff"], 0.125);
    assert_eq!(advice["amount"], 500.0);
  }
}
