use async_trait::async_trait;

use crate::{prelude::*, GetRecordInput, Record, RecordRange, StreamLocator, TnClient};

/// Source of records for a single stream.
/// Abstracts the client so metric pipelines can be tested without a gateway.
#[async_trait]
pub trait StreamReader: Send + Sync {
    fn locator(&self) -> &StreamLocator;

    async fn get_record(&self, range: RecordRange) -> Result<Vec<Record>>;
}

/// A primitive stream bound to its locator.
#[derive(Debug)]
pub struct PrimitiveStream<'a> {
    client: &'a TnClient,
    locator: StreamLocator,
}

impl<'a> PrimitiveStream<'a> {
    pub(crate) fn new(client: &'a TnClient, locator: StreamLocator) -> Self {
        Self { client, locator }
    }
}

#[async_trait]
impl<'a> StreamReader for PrimitiveStream<'a> {
    fn locator(&self) -> &StreamLocator {
        &self.locator
    }

    async fn get_record(&self, range: RecordRange) -> Result<Vec<Record>> {
        let input = GetRecordInput::new(self.locator.clone(), range);
        self.client.get_record(&input).await
    }
}

/// Primitive stream actions addressed by locator on every call.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveActions<'a> {
    client: &'a TnClient,
}

impl<'a> PrimitiveActions<'a> {
    pub(crate) fn new(client: &'a TnClient) -> Self {
        Self { client }
    }

    pub async fn get_record(&self, input: GetRecordInput) -> Result<Vec<Record>> {
        self.client.get_record(&input).await
    }
}
