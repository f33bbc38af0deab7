//! Client for reading streams from a TRUF Network gateway.
//!
//! - `tn_client` - connection, authentication and the raw `get_record` call
//! - `primitive` - stream-bound and locator-per-call views over the client
//! - `rpc` - JSON-RPC wire structures

mod primitive;
mod rpc;
mod tn_client;

pub use primitive::{PrimitiveActions, PrimitiveStream, StreamReader};
pub use rpc::{ActionCall, CallParams, HealthResponse, QueryResult};
pub use tn_client::TnClient;
