use std::fmt;

use tracing::info;

use crate::consts::DEFAULT_VAR_THRESHOLD;
use crate::RiskMetrics;

/// Threshold settings for the VaR alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertConfig {
    pub threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_VAR_THRESHOLD,
        }
    }
}

/// VaR above threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub value: f64,
    pub threshold: f64,
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ALERT: Portfolio Value-at-Risk exceeds threshold! VaR: {:.2}",
            self.value
        )
    }
}

/// `Some` iff a VaR is present and strictly greater than the threshold.
pub fn check_var(metrics: &RiskMetrics, config: &AlertConfig) -> Option<Alert> {
    metrics
        .var()
        .filter(|var| *var > config.threshold)
        .map(|value| Alert {
            value,
            threshold: config.threshold,
        })
}

/// Print the alert to stdout when it fires, otherwise log that nothing triggered.
pub fn generate_alerts(label: &str, metrics: &RiskMetrics, config: &AlertConfig) -> Option<Alert> {
    let alert = check_var(metrics, config);
    match &alert {
        Some(alert) => println!("{alert}"),
        None => info!(
            stream = label,
            threshold = config.threshold,
            "No alert triggered. VaR: {:.2}",
            metrics.var().unwrap_or(0.0)
        ),
    }
    alert
}
