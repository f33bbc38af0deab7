//! Mean-based "risk" metrics over fetched records and the threshold alert on top of them.

mod alerts;
mod metrics;

pub use alerts::{check_var, generate_alerts, Alert, AlertConfig};
pub use metrics::{
    calculate_risk_metrics, fetch_processed, process_records, ProcessedRecord, RiskMetrics,
};
