use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{AppError, Block, ImportRequest, ImportResult};

use super::{ApiContext, ImportError, ImportGateway};

const IMPORT_PATH: &str = "customers/bulk-import";
const BLOCKS_PATH: &str = "blocks";
const CUSTOMERS_PATH: &str = "customers";

/// Lists come back either bare or wrapped in a `data` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListBody<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListBody<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListBody::Bare(items) | ListBody::Wrapped { data: items } => items,
        }
    }
}

/// `ImportGateway` over the admin REST backend.
pub struct HttpGateway {
    client: Client,
    context: ApiContext,
}

impl HttpGateway {
    pub fn new(context: ApiContext, timeout: Duration) -> Result<Self, AppError> {
        if context.base_url.trim().is_empty() {
            return Err(AppError::new("The backend URL is not configured."));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::new(format!("Failed to create the HTTP client: {err}")))?;

        Ok(Self { client, context })
    }

    pub fn context(&self) -> &ApiContext {
        &self.context
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.context.base_url.trim_end_matches('/'), path)
    }

    /// Tenant scoping and auth shared by every request.
    fn scoped(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.query(&[
            ("tenant_id", self.context.tenant_id.as_str()),
            ("admin_id", self.context.admin_id.as_str()),
        ]);
        match &self.context.token {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ImportError> {
        let response = self
            .scoped(builder)
            .send()
            .await
            .map_err(|err| ImportError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ImportError> {
        let body = response
            .text()
            .await
            .map_err(|err| ImportError::Transport(err.to_string()))?;
        serde_json::from_str(&body).map_err(|err| ImportError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ImportGateway for HttpGateway {
    async fn import_customers(&self, request: &ImportRequest) -> Result<ImportResult, ImportError> {
        let url = self.url(IMPORT_PATH);
        debug!(url = %url, records = request.users.len(), "POST import");
        let response = self.send(self.client.post(&url).json(request)).await?;
        Self::decode(response).await
    }

    async fn fetch_blocks(&self) -> Result<Vec<Block>, ImportError> {
        let url = self.url(BLOCKS_PATH);
        debug!(url = %url, "GET blocks");
        let response = self.send(self.client.get(&url)).await?;
        let body: ListBody<Block> = Self::decode(response).await?;
        Ok(body.into_vec())
    }

    async fn refresh_customers(&self) -> Result<usize, ImportError> {
        let url = self.url(CUSTOMERS_PATH);
        debug!(url = %url, "GET customers");
        let response = self.send(self.client.get(&url)).await?;
        let body: ListBody<Value> = Self::decode(response).await?;
        Ok(body.into_vec().len())
    }
}
