#![deny(unreachable_pub)]

// Core modules
mod consts;
mod errors;
mod helpers;
mod prelude;
mod req;
mod signature;

pub mod types;

// Feature modules
pub mod client;
pub mod config;
pub mod logging;
pub mod risk;

// Re-exports
pub use client::*;
pub use config::{AppConfig, LogFormat};
pub use consts::{
    DEFAULT_VAR_THRESHOLD, LOCAL_API_URL, MAINNET_API_URL, STAGING_API_URL, VAR_METRIC,
};
pub use errors::Error;
pub use helpers::BaseUrl;
pub use req::HttpClient;
pub use risk::*;
pub use signature::{EthPersonalSigner, AUTH_TYPE_ETH_PERSONAL};
pub use types::*;
