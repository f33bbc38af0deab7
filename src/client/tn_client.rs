use alloy::primitives::Address;
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    client::{
        primitive::{PrimitiveActions, PrimitiveStream},
        rpc::{ActionCall, CallParams, CallResult, HealthResponse, METHOD_CALL, METHOD_HEALTH},
    },
    consts::STREAM_NAMESPACE,
    prelude::*,
    req::HttpClient,
    signature::EthPersonalSigner,
    BaseUrl, Error, GetRecordInput, Record, StreamId, StreamLocator,
};

/// JSON-RPC code used when an action fails inside an otherwise successful call.
const ACTION_ERROR_CODE: i64 = -32000;

pub struct TnClient {
    pub http_client: HttpClient,
    signer: EthPersonalSigner,
}

impl std::fmt::Debug for TnClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TnClient")
            .field("http_client", &self.http_client)
            .field("signer", &self.signer)
            .finish()
    }
}

impl TnClient {
    pub fn new(base_url: BaseUrl, signer: EthPersonalSigner, client: Option<Client>) -> Self {
        let client = client.unwrap_or_default();
        let base_url = base_url.get_url();
        info!(base_url = %base_url, signer = %signer.address(), "TN client initialised");
        TnClient {
            http_client: HttpClient::new(client, base_url),
            signer,
        }
    }

    /// Address of the signing identity.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Locator for a stream owned by this client's signer.
    pub fn own_stream_locator(&self, stream_id: StreamId) -> StreamLocator {
        StreamLocator::new(stream_id, self.address())
    }

    /// View bound to one stream.
    pub fn load_primitive_stream(&self, locator: StreamLocator) -> PrimitiveStream<'_> {
        PrimitiveStream::new(self, locator)
    }

    /// View that takes the locator on each call.
    pub fn load_primitive_actions(&self) -> PrimitiveActions<'_> {
        PrimitiveActions::new(self)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.http_client
            .rpc_call(METHOD_HEALTH, serde_json::json!({}))
            .await
    }

    /// Signed read-only action call.
    pub async fn call(&self, body: ActionCall) -> Result<crate::QueryResult> {
        let action = body.action.clone();
        let params = CallParams::signed(body, &self.signer)?;
        let result: CallResult = self.http_client.rpc_call(METHOD_CALL, params).await?;
        if let Some(message) = result.error {
            return Err(Error::Rpc {
                code: ACTION_ERROR_CODE,
                message: format!("{action}: {message}"),
            });
        }
        Ok(result.query_result.unwrap_or_default())
    }

    pub async fn get_record(&self, input: &GetRecordInput) -> Result<Vec<Record>> {
        let (from, to) = input.range.bounds_json();
        let body = ActionCall {
            namespace: STREAM_NAMESPACE.to_string(),
            action: "get_record".to_string(),
            inputs: vec![
                input.locator.provider_hex().into(),
                input.locator.stream_id.as_str().into(),
                from,
                to,
                input.frozen_at.into(),
            ],
        };
        let records = self.call(body).await?.into_records()?;
        debug!(
            stream = %input.locator,
            range = %input.range,
            count = records.len(),
            "Fetched records"
        );
        Ok(records)
    }
}
