use thiserror::Error;

/// Main SDK error type
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Client HTTP error (4xx)
    #[error("Client error: status code: {status_code}, error code: {error_code:?}, error message: {error_message}, error data: {error_data:?}")]
    ClientRequest {
        status_code: u16,
        error_code: Option<i64>,
        error_message: String,
        error_data: Option<String>,
    },

    /// Server HTTP error (5xx)
    #[error("Server error: status code: {status_code}, error message: {error_message}")]
    ServerRequest {
        status_code: u16,
        error_message: String,
    },

    /// Generic request error
    #[error("Generic request error: {0}")]
    GenericRequest(String),

    /// JSON-RPC level error returned by the gateway
    #[error("RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    /// JSON parse error
    #[error("Json parse error: {0}")]
    JsonParse(String),

    /// Private key parse error
    #[error("Private key parse error: {0}")]
    PrivateKeyParse(String),

    /// Signature failure
    #[error("ECDSA signature failed: {0}")]
    SignatureFailure(String),

    /// Data provider address could not be parsed
    #[error("Invalid provider address: {0}")]
    InvalidAddress(String),

    /// Stream id is not `st` + 30 hex characters
    #[error("Invalid stream id: {0}")]
    InvalidStreamId(String),

    /// Record range with `from` after `to`, or an impossible calendar date
    #[error("Invalid record range: {0}")]
    InvalidRange(String),

    /// Unknown network name or malformed URL
    #[error("Unknown network '{0}'. Use: mainnet, staging, localhost or an http(s) URL")]
    InvalidBaseUrl(String),

    /// Query result is missing a column or has a bad cell
    #[error("Malformed query result: {0}")]
    MalformedResult(String),

    /// Record value is not a finite decimal
    #[error("Non-finite record value: {0}")]
    NonFiniteValue(String),

    /// Required environment variable (or config key) is absent
    #[error("{0} not found in environment")]
    MissingEnv(&'static str),

    /// Config file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

// Convenience constructors for common error patterns
impl Error {
    /// Create a JSON parse error
    pub fn json_parse(msg: impl Into<String>) -> Self {
        Error::JsonParse(msg.into())
    }

    /// Create a signature failure error
    pub fn signature_failure(msg: impl Into<String>) -> Self {
        Error::SignatureFailure(msg.into())
    }

    /// Create a malformed result error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedResult(msg.into())
    }

    /// Whether the error came from the transport or the remote service rather
    /// than from local input.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::ClientRequest { .. }
                | Error::ServerRequest { .. }
                | Error::GenericRequest(_)
                | Error::Rpc { .. }
        )
    }
}
