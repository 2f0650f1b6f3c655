//! # CSV Price Loading
//!
//! $$
//! \text{CSV}\,(\text{Date}, s_1, \dots, s_N) \to P
//! $$
//!
//! Loader for wide daily-price files: a `Date` column followed by one
//! gap-free price column per ticker.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use thiserror::Error;

use super::matrix::PriceMatrix;
use crate::portfolio::error::PortfolioError;

/// Failures while reading a wide price CSV.
#[derive(Debug, Error)]
pub enum PriceCsvError {
  /// Underlying CSV reader failure.
  #[error("csv read failed: {0}")]
  Csv(#[from] csv::Error),
  /// Unparseable date cell.
  #[error("bad date in row {row}: {source}")]
  Date {
    /// Zero-based data row of the bad cell.
    row: usize,
    /// Parse failure reported by chrono.
    #[source]
    source: chrono::ParseError,
  },
  /// Unparseable price cell.
  #[error("bad price for {ticker} in row {row}: {source}")]
  Price {
    /// Column the bad cell belongs to.
    ticker: String,
    /// Zero-based data row of the bad cell.
    row: usize,
    /// Parse failure reported by the float parser.
    #[source]
    source: std::num::ParseFloatError,
  },
  /// Header missing or not starting with a `Date` column.
  #[error("first header column must be Date, got {0:?}")]
  Header(String),
  /// The parsed grid failed price-matrix validation.
  #[error(transparent)]
  Matrix(#[from] PortfolioError),
}

/// Read a wide price CSV (`Date,TICKER,...`, ISO dates) into a
/// [`PriceMatrix`].
pub fn load_prices_csv(path: impl AsRef<Path>) -> Result<PriceMatrix, PriceCsvError> {
  let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

  let headers = reader.headers()?.clone();
  let first = headers.get(0).unwrap_or("").to_string();
  if !first.eq_ignore_ascii_case("date") {
    return Err(PriceCsvError::Header(first));
  }
  let tickers: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

  let mut dates = Vec::new();
  let mut columns: BTreeMap<String, Vec<f64>> = tickers
    .iter()
    .map(|ticker| (ticker.clone(), Vec::new()))
    .collect();

  for (row, record) in reader.records().enumerate() {
    let record = record?;
    let date = NaiveDate::parse_from_str(record.get(0).unwrap_or(""), "%Y-%m-%d")
      .map_err(|source| PriceCsvError::Date { row, source })?;
    dates.push(date);

    for (ticker, cell) in tickers.iter().zip(record.iter().skip(1)) {
      let price: f64 = cell.trim().parse().map_err(|source| PriceCsvError::Price {
        ticker: ticker.clone(),
        row,
        source,
      })?;
      if let Some(column) = columns.get_mut(ticker) {
        column.push(price);
      }
    }
  }

  Ok(PriceMatrix::new(dates, columns)?)
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use super::*;

  fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
  }

  #[test]
  fn loads_a_wide_price_file() {
    let file = write_csv(
      "Date,AAA,BBB\n\
       2024-01-02,100.0,50.0\n\
       2024-01-03,101.0,49.5\n\
       2024-01-04,102.5,50.5\n",
    );

    let matrix = load_prices_csv(file.path()).unwrap();
    assert_eq!(matrix.n_tickers(), 2);
    assert_eq!(matrix.dates().len(), 3);
    assert_eq!(matrix.prices("AAA").unwrap()[2], 102.5);
  }

  #[test]
  fn rejects_a_missing_date_header() {
    let file = write_csv("Ticker,AAA\n2024-01-02,100.0\n");
    assert!(matches!(
      load_prices_csv(file.path()),
      Err(PriceCsvError::Header(_))
    ));
  }

  #[test]
  fn rejects_unparseable_cells() {
    let file = write_csv("Date,AAA\n2024-01-02,abc\n2024-01-03,100.0\n");
    assert!(matches!(
      load_prices_csv(file.path()),
      Err(PriceCsvError::Price { .. })
    ));

    let file = write_csv("Date,AAA\nnot-a-date,100.0\n2024-01-03,100.0\n");
    assert!(matches!(
      load_prices_csv(file.path()),
      Err(PriceCsvError::Date { .. })
    ));
  }

  #[test]
  fn surfaces_matrix_validation_failures() {
    // one row is too short a history for a return series
    let file = write_csv("Date,AAA\n2024-01-02,100.0\n");
    assert!(matches!(
      load_prices_csv(file.path()),
      Err(PriceCsvError::Matrix(PortfolioError::InvalidInput(_)))
    ));
  }
}
