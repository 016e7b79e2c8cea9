use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, ClientBuilder, StatusCode};
use std::time::Duration;

use crate::models::document::{Direction, Document, InsertResponse};

/// The narrow document-collection contract the remote store depends on.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Insert a new document and return the id the collection generated for it.
    async fn insert(&self, fields: &serde_json::Value) -> Result<String>;
    async fn get(&self, id: &str) -> Result<Option<Document>>;
    async fn update_field(&self, id: &str, field: &str, value: &serde_json::Value) -> Result<()>;
    async fn query_ordered(&self, field: &str, direction: Direction) -> Result<Vec<Document>>;
}

pub struct HttpCollection {
    client: Client,
    base_url: String,
    collection: String,
}

fn client_builder(token: Option<String>) -> Result<ClientBuilder> {
    let mut headers = header::HeaderMap::new();
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))
                .context("remote token is not a valid header value")?,
        );
    }

    Ok(Client::builder()
        .timeout(Duration::from_secs(30))
        .default_headers(headers))
}

impl HttpCollection {
    pub fn new(base_url: String, token: Option<String>, collection: String) -> Result<Self> {
        let client = client_builder(token)?
            .build()
            .context("cannot build HTTP client")?;

        Ok(Self::with_client(client, base_url, collection))
    }

    fn with_client(client: Client, base_url: String, collection: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection,
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/v1/collections/{}/documents",
            self.base_url, self.collection
        )
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.documents_url(), id)
    }
}

async fn error_from(action: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    anyhow::anyhow!("cannot {} with status {}: {}", action, status, error_text)
}

#[async_trait]
impl DocumentCollection for HttpCollection {
    async fn insert(&self, fields: &serde_json::Value) -> Result<String> {
        let response = self
            .client
            .post(self.documents_url())
            .json(fields)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from("insert document", response).await);
        }

        let inserted: InsertResponse = response.json().await?;
        Ok(inserted.id)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        let response = self.client.get(self.document_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(error_from("get document", response).await);
        }

        let document: Document = response.json().await?;
        Ok(Some(document))
    }

    async fn update_field(&self, id: &str, field: &str, value: &serde_json::Value) -> Result<()> {
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), value.clone());

        let response = self
            .client
            .patch(self.document_url(id))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from("update document", response).await);
        }

        Ok(())
    }

    async fn query_ordered(&self, field: &str, direction: Direction) -> Result<Vec<Document>> {
        let response = self
            .client
            .get(self.documents_url())
            .query(&[("order_by", field), ("direction", direction.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from("query documents", response).await);
        }

        let documents: Vec<Document> = response.json().await?;
        Ok(documents)
    }
}
