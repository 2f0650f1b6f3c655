use anyhow::Result;
use chrono::NaiveDate;
use rebalance_rs::market::SyntheticUniverse;
use rebalance_rs::portfolio::RebalanceConfig;
use rebalance_rs::portfolio::Rebalancer;
use tracing_subscriber::EnvFilter;

const TRADE_AMOUNT: f64 = 5_000.0;
const MAX_ROUNDS: usize = 100;

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let start = NaiveDate::from_ymd_opt(2022, 1, 3).expect("valid calendar date");
  let matrix = SyntheticUniverse::new(start, 756)
    .asset("AAPL", 0.12, 0.28, 170.0)
    .asset("AMZN", 0.10, 0.32, 130.0)
    .asset("GLD", 0.05, 0.14, 180.0)
    .asset("JNJ", 0.06, 0.16, 155.0)
    .asset("JPM", 0.08, 0.24, 145.0)
    .asset("MSFT", 0.13, 0.26, 310.0)
    .asset("TLT", 0.03, 0.12, 100.0)
    .asset("TSLA", 0.15, 0.55, 240.0)
    .build()?;

  let tickers: Vec<String> = ["AAPL", "AMZN", "JPM", "MSFT", "TSLA"]
    .iter()
    .map(|s| s.to_string())
    .collect();
  let amounts = vec![15_000.0, 30_000.0, 15_000.0, 40_000.0, 15_000.0];

  let mut rebalancer = Rebalancer::new(matrix, &tickers, &amounts, RebalanceConfig::default())?;

  println!("Asset metrics (annualized):");
  for metrics in rebalancer.asset_metrics() {
    println!(
      "  {:<6} return {:>7.2}%  vol {:>6.2}%",
      metrics.ticker,
      metrics.annualized_return * 100.0,
      metrics.annualized_vol * 100.0
    );
  }

  let summary = rebalancer.summary();
  println!("\nInitial portfolio:");
  println!("  value:  {:.2}", summary.value);
  println!("  sharpe: {:.4}", summary.sharpe_ratio);
  println!("  positions: {}", summary.positions);

  // Alternate the best buy and the best sell until both land on the same
  // ticker.
  let mut converged = false;
  for round in 0..MAX_ROUNDS {
    let buy_report = rebalancer.recommend_buy(TRADE_AMOUNT)?;
    let Some(best_buy) = buy_report.recommendation else {
      println!("\nno buy improves the portfolio, stopping after {round} rounds");
      break;
    };
    rebalancer.buy(&best_buy.ticker, TRADE_AMOUNT)?;
    println!(
      "round {:>3}: buy  {:<6} dSharpe {:+.5}",
      round, best_buy.ticker, best_buy.risk_reward_diff
    );

    let sell_report = rebalancer.recommend_sell(TRADE_AMOUNT)?;
    let Some(best_sell) = sell_report.recommendation else {
      println!("\nno sell improves the portfolio, stopping after {round} rounds");
      break;
    };
    if best_sell.ticker == best_buy.ticker {
      println!("\nconverged at round {round} on {}", best_sell.ticker);
      converged = true;
      break;
    }
    rebalancer.sell(&best_sell.ticker, TRADE_AMOUNT)?;
    println!(
      "round {:>3}: sell {:<6} dSharpe {:+.5}",
      round, best_sell.ticker, best_sell.risk_reward_diff
    );
  }
  if !converged {
    println!("\nstopped without buy/sell convergence");
  }

  let summary = rebalancer.summary();
  println!("\nFinal portfolio:");
  println!("  value:  {:.2}", summary.value);
  println!("  sharpe: {:.4}", summary.sharpe_ratio);
  for (ticker, weight) in &summary.weights {
    println!(
      "  {:<6} {:>6.2}%  ({:.2})",
      ticker,
      weight * 100.0,
      weight * summary.value
    );
  }

  let report = rebalancer.recommend_buy(TRADE_AMOUNT)?;
  println!("\nNext buy recommendation report:");
  println!("{}", serde_json::to_string_pretty(&report)?);

  Ok(())
}
