//! Pinecone vector index client.
//!
//! The index host is resolved once through the control plane
//! (`GET {control_url}/indexes/{name}`); queries then go straight to the
//! data plane (`POST {host}/query`). Both calls authenticate with the
//! `Api-Key` header.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

use medibot_core::rag::ports::VectorIndex;
use medibot_types::rag::{IndexMatch, RagError};

use super::http::{check_status, decode, request_failed};

const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
    #[serde(default)]
    dimension: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_values: bool,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}

/// A connected Pinecone index.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: SecretString,
    api_version: String,
    name: String,
    host: String,
    dimension: Option<u32>,
}

impl PineconeIndex {
    /// Resolve the index host through the control plane.
    ///
    /// Fails with [`RagError::IndexNotFound`] when the index does not exist.
    pub async fn connect(
        client: reqwest::Client,
        api_key: SecretString,
        control_url: &str,
        api_version: &str,
        name: &str,
    ) -> Result<Self, RagError> {
        let url = format!("{}/indexes/{name}", control_url.trim_end_matches('/'));
        let response = client
            .get(&url)
            .header("Api-Key", api_key.expose_secret())
            .header(API_VERSION_HEADER, api_version)
            .send()
            .await
            .map_err(request_failed)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RagError::IndexNotFound(name.to_string()));
        }
        let described: DescribeIndexResponse = decode(check_status(response).await?).await?;

        let host = normalize_host(&described.host);
        info!(index = name, host = %host, dimension = ?described.dimension, "connected to vector index");

        Ok(Self {
            client,
            api_key,
            api_version: api_version.to_string(),
            name: name.to_string(),
            host,
            dimension: described.dimension,
        })
    }

    /// Vector width reported by the control plane.
    pub fn dimension(&self) -> Option<u32> {
        self.dimension
    }
}

/// The control plane returns bare hostnames; add a scheme when missing.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<IndexMatch>, RagError> {
        let body = QueryRequest {
            vector,
            top_k,
            include_values: true,
            include_metadata: true,
        };

        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", self.api_key.expose_secret())
            .header(API_VERSION_HEADER, &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let parsed: QueryResponse = decode(check_status(response).await?).await?;
        Ok(parsed.matches)
    }
}
