//! CSV price data adapter.
//!
//! Reference provider for local data sets: one `{code}.csv` per instrument
//! plus a `market.csv` of index closes that drives trading-day detection.
//! Files carry `date,close,volume` rows with a header.

use crate::domain::error::EtfRankError;
use crate::domain::price_series::DailyClose;
use crate::ports::price_port::PricePort;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub const MARKET_FILE: &str = "market.csv";

pub struct CsvPriceAdapter {
    base_path: PathBuf,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }

    fn read_closes(
        &self,
        code: &str,
        path: &PathBuf,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, EtfRankError> {
        let content = fs::read_to_string(path).map_err(|e| EtfRankError::PriceData {
            code: code.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut closes = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| EtfRankError::PriceData {
                code: code.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| EtfRankError::PriceData {
                code: code.to_string(),
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                EtfRankError::PriceData {
                    code: code.to_string(),
                    reason: format!("invalid date format: {}", e),
                }
            })?;

            if date < start || date > end {
                continue;
            }

            let close: f64 = record
                .get(1)
                .ok_or_else(|| EtfRankError::PriceData {
                    code: code.to_string(),
                    reason: "missing close column".into(),
                })?
                .parse()
                .map_err(|e| EtfRankError::PriceData {
                    code: code.to_string(),
                    reason: format!("invalid close value: {}", e),
                })?;

            let volume: i64 = record
                .get(2)
                .ok_or_else(|| EtfRankError::PriceData {
                    code: code.to_string(),
                    reason: "missing volume column".into(),
                })?
                .parse()
                .map_err(|e| EtfRankError::PriceData {
                    code: code.to_string(),
                    reason: format!("invalid volume value: {}", e),
                })?;

            closes.push(DailyClose {
                date,
                close,
                volume,
            });
        }

        closes.sort_by_key(|c| c.date);
        Ok(closes)
    }
}

#[async_trait]
impl PricePort for CsvPriceAdapter {
    async fn fetch_closes(
        &self,
        code: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, EtfRankError> {
        self.read_closes(code, &self.csv_path(code), start, end)
    }

    async fn market_has_data(&self, date: NaiveDate) -> Result<bool, EtfRankError> {
        let path = self.base_path.join(MARKET_FILE);
        let closes = self.read_closes("market", &path, date, date)?;
        Ok(!closes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let prices = "date,close,volume\n\
            2024-01-15,10500.0,50000\n\
            2024-01-16,10750.0,60000\n\
            2024-01-17,10600.0,55000\n";
        fs::write(path.join("069500.csv"), prices).unwrap();

        let market = "date,close,volume\n\
            2024-01-15,2500.0,1000000\n\
            2024-01-16,2510.0,1100000\n\
            2024-01-17,2490.0,900000\n";
        fs::write(path.join("market.csv"), market).unwrap();

        (dir, path)
    }

    #[tokio::test]
    async fn fetch_closes_returns_rows_in_range() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);

        let closes = adapter
            .fetch_closes("069500", day(2024, 1, 15), day(2024, 1, 17))
            .await
            .unwrap();
        assert_eq!(closes.len(), 3);
        assert_eq!(closes[0].date, day(2024, 1, 15));
        assert_eq!(closes[0].close, 10500.0);
        assert_eq!(closes[0].volume, 50000);
    }

    #[tokio::test]
    async fn fetch_closes_filters_by_date() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);

        let closes = adapter
            .fetch_closes("069500", day(2024, 1, 16), day(2024, 1, 16))
            .await
            .unwrap();
        assert_eq!(closes.len(), 1);
        assert_eq!(closes[0].close, 10750.0);
    }

    #[tokio::test]
    async fn missing_instrument_file_is_a_price_data_error() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);

        let result = adapter
            .fetch_closes("999999", day(2024, 1, 1), day(2024, 1, 31))
            .await;
        assert!(matches!(
            result,
            Err(EtfRankError::PriceData { code, .. }) if code == "999999"
        ));
    }

    #[tokio::test]
    async fn malformed_close_value_is_a_price_data_error() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("BAD.csv"),
            "date,close,volume\n2024-01-15,not_a_price,100\n",
        )
        .unwrap();
        let adapter = CsvPriceAdapter::new(path);

        let result = adapter
            .fetch_closes("BAD", day(2024, 1, 1), day(2024, 1, 31))
            .await;
        assert!(matches!(result, Err(EtfRankError::PriceData { .. })));
    }

    #[tokio::test]
    async fn market_has_data_reflects_the_index_file() {
        let (_dir, path) = setup_test_data();
        let adapter = CsvPriceAdapter::new(path);

        assert!(adapter.market_has_data(day(2024, 1, 16)).await.unwrap());
        // 2024-01-18 is a weekday absent from the market file, i.e. a holiday.
        assert!(!adapter.market_has_data(day(2024, 1, 18)).await.unwrap());
    }

    #[tokio::test]
    async fn missing_market_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvPriceAdapter::new(dir.path().to_path_buf());
        let result = adapter.market_has_data(day(2024, 1, 16)).await;
        assert!(matches!(
            result,
            Err(EtfRankError::PriceData { code, .. }) if code == "market"
        ));
    }
}
