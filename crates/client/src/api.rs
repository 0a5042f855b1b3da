//! REST client for the `/routemix` and `/tariff_trunks` endpoints.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{RequestBuilder, StatusCode};
use routemix_core::allocation::wire::BatchSavePayload;
use routemix_core::allocation::{
    BucketAllocation, PersistedAllocation, TrunkEntry, ValidAllocation,
};
use routemix_core::error::CoreError;
use routemix_core::store::AllocationStore;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Success envelope produced by the server: `{ "data": ... }`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// HTTP client for one routemix API server.
#[derive(Debug, Clone)]
pub struct RoutemixClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl RoutemixClient {
    /// Build a client with its own connection pool and the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Reuse an existing [`reqwest::Client`]. Its own timeout settings apply.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `GET /tariff_trunks`
    pub async fn trunks(&self) -> Result<Vec<TrunkEntry>, ClientError> {
        self.fetch(self.client.get(self.url("/tariff_trunks"))).await
    }

    /// `GET /routemix/user/{bucket}`
    pub async fn bucket_allocation(
        &self,
        bucket: &str,
    ) -> Result<Vec<PersistedAllocation>, ClientError> {
        let url = self.url(&bucket_path(bucket));
        self.fetch(self.client.get(url)).await
    }

    /// `POST /routemix/batch-save`
    pub async fn batch_save(
        &self,
        bucket: &str,
        rows: &[ValidAllocation],
    ) -> Result<Vec<PersistedAllocation>, ClientError> {
        let payload = BatchSavePayload {
            user: bucket,
            trunks: rows,
        };
        let request = self.client.post(self.url("/routemix/batch-save")).json(&payload);
        let saved: Vec<PersistedAllocation> = self.fetch(request).await?;

        tracing::debug!(bucket, rows = saved.len(), "Load balance submitted");
        Ok(saved)
    }

    /// `GET /routemix`
    pub async fn all_allocations(&self) -> Result<Vec<BucketAllocation>, ClientError> {
        self.fetch(self.client.get(self.url("/routemix"))).await
    }

    /// `DELETE /routemix/user/{bucket}`. Returns `false` when the bucket had
    /// no stored rows.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<bool, ClientError> {
        let url = self.url(&bucket_path(bucket));
        let response = self.authorize(self.client.delete(url)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ClientError::from_response(status, &body))
            }
        }
    }

    /// `GET /health` on the server root.
    pub async fn ping(&self) -> Result<(), ClientError> {
        let url = reqwest::Url::parse(&self.config.api_url)
            .and_then(|base| base.join("/health"))
            .map_err(|e| ClientError::Config(format!("Invalid API URL: {e}")))?;

        #[derive(Deserialize)]
        struct Health {
            db_healthy: bool,
        }

        let response = self.client.get(url).send().await?;
        let health: Health = Self::parse_response(response).await?;
        if !health.db_healthy {
            return Err(ClientError::Api {
                status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
                code: String::new(),
                message: "Server reports its database as unreachable".into(),
            });
        }
        Ok(())
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send an authorized request and unwrap the `{data}` envelope.
    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorize(request).send().await?;
        let envelope: Envelope<T> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::from_response(status, &body));
        }
        Ok(response.json::<T>().await?)
    }
}

/// Bytes escaped in a bucket path segment: everything but RFC 3986 unreserved.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

fn bucket_path(bucket: &str) -> String {
    format!("/routemix/user/{}", utf8_percent_encode(bucket, SEGMENT))
}

#[async_trait]
impl AllocationStore for RoutemixClient {
    async fn list_trunks(&self) -> Result<Vec<TrunkEntry>, CoreError> {
        Ok(self.trunks().await?)
    }

    async fn fetch_allocation(&self, bucket: &str) -> Result<Vec<PersistedAllocation>, CoreError> {
        Ok(self.bucket_allocation(bucket).await?)
    }

    async fn replace_allocation(
        &self,
        bucket: &str,
        rows: &[ValidAllocation],
    ) -> Result<Vec<PersistedAllocation>, CoreError> {
        Ok(self.batch_save(bucket, rows).await?)
    }

    async fn list_allocations(&self) -> Result<Vec<BucketAllocation>, CoreError> {
        Ok(self.all_allocations().await?)
    }

    /// The API does not report how many rows were removed, so a successful
    /// delete counts as one.
    async fn delete_allocation(&self, bucket: &str) -> Result<u64, CoreError> {
        Ok(u64::from(self.delete_bucket(bucket).await?))
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(self.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_names_are_path_encoded() {
        assert_eq!(bucket_path("LB-Trunk-1"), "/routemix/user/LB-Trunk-1");
        assert_eq!(bucket_path("LB trunk/2"), "/routemix/user/LB%20trunk%2F2");
        assert_eq!(bucket_path("a?b#c%d"), "/routemix/user/a%3Fb%23c%25d");
    }

    #[test]
    fn non_ascii_bucket_names_are_utf8_encoded() {
        assert_eq!(bucket_path("Zürich"), "/routemix/user/Z%C3%BCrich");
    }

    #[test]
    fn urls_join_base_and_path() {
        let client = RoutemixClient::new(ClientConfig::new("http://panel.test/api/v1/")).unwrap();
        assert_eq!(
            client.url("/tariff_trunks"),
            "http://panel.test/api/v1/tariff_trunks"
        );
    }
}
