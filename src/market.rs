//! # Market Data
//!
//! $$
//! P \in \mathbb{R}^{T\times N}_{>0}
//! $$
//!
//! Price history construction: the validated price matrix, a loader for wide
//! daily-price CSV files and synthetic path generation for tests and demos.

pub mod csv;
pub mod matrix;
pub mod synthetic;

pub use self::csv::PriceCsvError;
pub use self::csv::load_prices_csv;
pub use matrix::PriceMatrix;
pub use synthetic::GbmPrices;
pub use synthetic::SyntheticUniverse;
pub use synthetic::trading_dates;
