//! # rebalance-rs
//!
//! $$
//! \max_{(s,\,\pm a)}\ \text{Sharpe}\big(R'\big) - \text{Sharpe}\big(R\big)
//! $$
//!
//! Sharpe-ratio driven portfolio rebalancing engine over an in-memory matrix
//! of historical daily prices. The engine is computation-only: price
//! acquisition, persistence and the serving layer are collaborators that
//! feed it a validated price matrix and holdings.
//!
//! ## Modules
//!
//! | Module        | Description                                                         |
//! |---------------|---------------------------------------------------------------------|
//! | [`market`]    | Validated price matrix, CSV loading and synthetic path generation.  |
//! | [`portfolio`] | Portfolio state, incremental return algebra, ranking and execution. |
//!
//! ## Example
//!
//! ```rust
//! use rebalance_rs::market::PriceMatrix;
//! use rebalance_rs::portfolio::{RebalanceConfig, Rebalancer};
//!
//! let matrix: PriceMatrix = load_prices();
//! let tickers = vec!["AAPL".to_string(), "MSFT".to_string()];
//! let mut rebalancer =
//!   Rebalancer::new(matrix, &tickers, &[15_000.0, 30_000.0], RebalanceConfig::default())?;
//!
//! let report = rebalancer.recommend_buy(5_000.0)?;
//! if let Some(advice) = &report.recommendation {
//!   rebalancer.buy(&advice.ticker, advice.amount)?;
//! }
//! ```

pub mod market;
pub mod portfolio;
