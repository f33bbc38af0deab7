use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::{consts::VAR_METRIC, prelude::*, Record, RecordRange, StreamReader};

/// A record whose value has been parsed to a finite float.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRecord {
    /// Date or timestamp of the source record
    pub label: String,
    pub value: f64,
}

impl fmt::Display for ProcessedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Date (DateValue): {}, Value: {:.6}", self.label, self.value)
    }
}

/// Named scalar metrics, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskMetrics(BTreeMap<String, f64>);

impl RiskMetrics {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Mean of the fetched values, absent when nothing was fetched.
    pub fn var(&self) -> Option<f64> {
        self.get(VAR_METRIC)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl fmt::Display for RiskMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Parse record values, dropping the ones that are not finite numbers.
pub fn process_records(records: &[Record]) -> Vec<ProcessedRecord> {
    records
        .iter()
        .filter_map(|record| match record.value_f64() {
            Ok(value) => {
                let label = record.label();
                debug!(date = %label, value, "Processed record");
                Some(ProcessedRecord { label, value })
            }
            Err(_) => {
                warn!(record = ?record, "Non-finite value encountered, skipping record");
                None
            }
        })
        .collect()
}

/// Arithmetic mean of the values under [`VAR_METRIC`]; empty input gives empty metrics.
pub fn calculate_risk_metrics(data: &[ProcessedRecord]) -> RiskMetrics {
    let mut metrics = RiskMetrics::default();
    if data.is_empty() {
        return metrics;
    }
    let sum: f64 = data.iter().map(|r| r.value).sum();
    metrics.insert(VAR_METRIC, sum / data.len() as f64);
    metrics
}

/// Fetch a range from `reader` and parse it.
pub async fn fetch_processed(
    reader: &dyn StreamReader,
    range: RecordRange,
) -> Result<Vec<ProcessedRecord>> {
    debug!(stream = %reader.locator(), range = %range, "Fetching stream");
    let records = reader.get_record(range).await?;
    Ok(process_records(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, StreamId, StreamLocator};
    use alloy::primitives::Address;
    use async_trait::async_trait;

    fn rec(ts: i64, value: &str) -> Record {
        Record {
            event_time: Some(ts),
            date_value: None,
            value: value.to_string(),
        }
    }

    fn processed(values: &[f64]) -> Vec<ProcessedRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ProcessedRecord {
                label: i.to_string(),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_empty_input_has_no_var() {
        let metrics = calculate_risk_metrics(&[]);
        assert!(metrics.is_empty());
        assert_eq!(metrics.var(), None);
        assert_eq!(metrics.to_string(), "{}");
    }

    #[test]
    fn test_single_value_is_its_own_mean() {
        let metrics = calculate_risk_metrics(&processed(&[42.5]));
        assert_eq!(metrics.var(), Some(42.5));
    }

    #[test]
    fn test_mean() {
        let metrics = calculate_risk_metrics(&processed(&[1.0, 2.0, 3.0, 6.0]));
        assert_eq!(metrics.var(), Some(3.0));
        assert_eq!(metrics.to_string(), "{VaR: 3}");
    }

    #[test]
    fn test_process_records_skips_non_finite() {
        let out = process_records(&[rec(1, "1.5"), rec(2, "NaN"), rec(3, "x"), rec(4, "2.5")]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label, "1");
        assert_eq!(out[1].value, 2.5);
    }

    struct StubReader {
        locator: StreamLocator,
        records: Vec<Record>,
        fail: bool,
    }

    #[async_trait]
    impl StreamReader for StubReader {
        fn locator(&self) -> &StreamLocator {
            &self.locator
        }

        async fn get_record(&self, _range: RecordRange) -> Result<Vec<Record>> {
            if self.fail {
                return Err(Error::GenericRequest("connection refused".into()));
            }
            Ok(self.records.clone())
        }
    }

    fn stub(records: Vec<Record>, fail: bool) -> StubReader {
        StubReader {
            locator: StreamLocator::new(StreamId::generate("stub"), Address::ZERO),
            records,
            fail,
        }
    }

    #[tokio::test]
    async fn test_fetch_processed() {
        let reader = stub(vec![rec(1, "999"), rec(2, "1003"), rec(3, "inf")], false);
        let data = fetch_processed(&reader, RecordRange::default()).await.unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(calculate_risk_metrics(&data).var(), Some(1001.0));
    }

    #[tokio::test]
    async fn test_fetch_processed_propagates_errors() {
        let reader = stub(vec![], true);
        let err = fetch_processed(&reader, RecordRange::default())
            .await
            .unwrap_err();
        assert!(err.is_remote());
    }
}
