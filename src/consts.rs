/// Production gateway.
pub const MAINNET_API_URL: &str = "https://gateway.mainnet.truf.network";
/// Staging gateway used by the bundled programs.
pub const STAGING_API_URL: &str = "https://staging.tsn.truflation.com";
/// Local node started with the default kwild ports.
pub const LOCAL_API_URL: &str = "http://localhost:8484";

/// JSON-RPC endpoint path on every gateway.
pub(crate) const RPC_PATH: &str = "/rpc/v1";

/// Namespace holding the stream actions.
pub(crate) const STREAM_NAMESPACE: &str = "main";

/// Metric key under which the mean of a stream is stored.
pub const VAR_METRIC: &str = "VaR";

/// Default alert threshold for the VaR metric.
pub const DEFAULT_VAR_THRESHOLD: f64 = 1000.0;
