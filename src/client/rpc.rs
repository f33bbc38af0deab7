//! Wire structures for the gateway's JSON-RPC interface.

use alloy::hex;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{prelude::*, signature::EthPersonalSigner, Error, Record};

pub(crate) const METHOD_CALL: &str = "user.call";
pub(crate) const METHOD_HEALTH: &str = "user.health";

/// Read-only action invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActionCall {
    pub namespace: String,
    pub action: String,
    pub inputs: Vec<serde_json::Value>,
}

impl ActionCall {
    /// Message the caller signs: a fixed header plus the SHA-256 of the body.
    pub(crate) fn signing_message(&self) -> Result<String> {
        let body = serde_json::to_vec(self).map_err(|e| Error::json_parse(e.to_string()))?;
        let digest = Sha256::digest(&body);
        Ok(format!("tn call\n\ndigest: {}", hex::encode(digest)))
    }
}

/// `user.call` parameters: the body plus the caller's authentication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CallParams {
    pub body: ActionCall,
    pub sender: String,
    pub auth_type: String,
    pub signature: String,
}

impl CallParams {
    pub(crate) fn signed(body: ActionCall, signer: &EthPersonalSigner) -> Result<Self> {
        let message = body.signing_message()?;
        let signature = signer.sign_personal(message.as_bytes())?;
        Ok(Self {
            body,
            sender: hex::encode_prefixed(signer.address()),
            auth_type: signer.auth_type().to_string(),
            signature,
        })
    }
}

/// Tabular result of a read-only action.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct QueryResult {
    #[serde(default)]
    pub column_names: Vec<String>,
    #[serde(default)]
    pub column_types: Vec<serde_json::Value>,
    #[serde(default)]
    pub values: Vec<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CallResult {
    #[serde(default)]
    pub(crate) query_result: Option<QueryResult>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// Node status reported by `user.health`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct HealthResponse {
    #[serde(default)]
    pub healthy: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub block_height: i64,
}

impl QueryResult {
    fn column(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Map rows to records by column name. Only the `value` column is required.
    pub fn into_records(self) -> Result<Vec<Record>> {
        let value_idx = self
            .column("value")
            .ok_or_else(|| Error::malformed("missing 'value' column"))?;
        let event_time_idx = self.column("event_time");
        let date_idx = self.column("date_value").or_else(|| self.column("date"));

        self.values
            .iter()
            .enumerate()
            .map(|(row_no, row)| {
                let cell = |idx: usize| {
                    row.get(idx).ok_or_else(|| {
                        Error::malformed(format!("row {row_no} has {} cells", row.len()))
                    })
                };
                let value = cell_to_string(cell(value_idx)?);
                let event_time = match event_time_idx {
                    Some(idx) => cell_to_i64(cell(idx)?)?,
                    None => None,
                };
                let date_value = match date_idx {
                    Some(idx) => cell_to_date(cell(idx)?)?,
                    None => None,
                };
                Ok(Record {
                    event_time,
                    date_value,
                    value,
                })
            })
            .collect()
    }
}

fn cell_to_string(cell: &serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_i64(cell: &serde_json::Value) -> Result<Option<i64>> {
    match cell {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::malformed(format!("event_time {n} is not an integer"))),
        serde_json::Value::String(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::malformed(format!("event_time '{s}' is not an integer"))),
        other => Err(Error::malformed(format!("unexpected event_time {other}"))),
    }
}

fn cell_to_date(cell: &serde_json::Value) -> Result<Option<NaiveDate>> {
    match cell {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| Error::malformed(format!("date '{s}' is not YYYY-MM-DD"))),
        other => Err(Error::malformed(format!("unexpected date {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query(columns: &[&str], values: serde_json::Value) -> QueryResult {
        QueryResult {
            column_names: columns.iter().map(|c| c.to_string()).collect(),
            column_types: vec![],
            values: serde_json::from_value(values).unwrap(),
        }
    }

    #[test]
    fn test_rows_with_event_time() {
        let records = query(
            &["event_time", "value"],
            json!([[1672531200, "101.5"], ["1672617600", 102]]),
        )
        .into_records()
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event_time, Some(1672531200));
        assert_eq!(records[0].value, "101.5");
        assert_eq!(records[1].event_time, Some(1672617600));
        assert_eq!(records[1].value, "102");
        assert!(records[0].date_value.is_none());
    }

    #[test]
    fn test_rows_with_dates() {
        let records = query(&["date_value", "value"], json!([["2023-01-02", "3.25"]]))
            .into_records()
            .unwrap();
        assert_eq!(records[0].date_value, NaiveDate::from_ymd_opt(2023, 1, 2));
        assert_eq!(records[0].label(), "2023-01-02");
    }

    #[test]
    fn test_missing_value_column() {
        let err = query(&["event_time"], json!([[1]])).into_records().unwrap_err();
        assert!(matches!(err, Error::MalformedResult(_)));
    }

    #[test]
    fn test_short_row() {
        let err = query(&["event_time", "value"], json!([[1]]))
            .into_records()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResult(_)));
    }

    #[test]
    fn test_bad_date_cell() {
        let err = query(&["date_value", "value"], json!([["01/02/2023", "1"]]))
            .into_records()
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResult(_)));
    }

    #[test]
    fn test_empty_result() {
        let records = query(&["event_time", "value"], json!([]))
            .into_records()
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_signed_params() {
        let signer = EthPersonalSigner::from_hex(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let body = ActionCall {
            namespace: "main".into(),
            action: "get_record".into(),
            inputs: vec![json!("0xabc"), json!("st00"), json!(1), json!(2), json!(null)],
        };
        let message = body.signing_message().unwrap();
        assert!(message.starts_with("tn call\n\ndigest: "));

        let params = CallParams::signed(body, &signer).unwrap();
        assert_eq!(params.auth_type, "secp256k1_ep");
        assert_eq!(
            params.sender,
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );

        let sig_bytes = hex::decode(&params.signature).unwrap();
        let sig = alloy::primitives::Signature::from_raw(&sig_bytes).unwrap();
        let recovered = sig.recover_address_from_msg(message.as_bytes()).unwrap();
        assert_eq!(recovered, signer.address());
    }
}
