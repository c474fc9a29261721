// Knowledge service client - retrieval query and document dump
use crate::application::sources::KnowledgeSource;
use crate::domain::knowledge::{
    KnowledgeAnswer, KnowledgeDocument, KnowledgeMatch, KnowledgeQuery, Metadata,
};
use crate::domain::source_result::SourceResult;
use crate::infrastructure::backend_client::get_json;
use crate::infrastructure::config::resource_url;
use crate::infrastructure::fetch_error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpKnowledgeClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct AnswerWire {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    top_matches: Vec<MatchWire>,
}

#[derive(Debug, Deserialize)]
struct MatchWire {
    #[serde(default)]
    preview: String,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DumpWire {
    List(Vec<DocumentWire>),
    Wrapped { documents: Vec<DocumentWire> },
}

#[derive(Debug, Deserialize)]
struct DocumentWire {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    preview: String,
    #[serde(default)]
    metadata: Metadata,
}

impl DocumentWire {
    fn into_document(self) -> KnowledgeDocument {
        let id = match self.id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        KnowledgeDocument::ingest(id, self.preview, self.metadata)
    }
}

impl HttpKnowledgeClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build knowledge HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn post_query(&self, request: &KnowledgeQuery) -> Result<AnswerWire, FetchError> {
        let url = resource_url(&self.base_url, "/query_ai");
        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl KnowledgeSource for HttpKnowledgeClient {
    async fn query(&self, request: &KnowledgeQuery) -> SourceResult<KnowledgeAnswer> {
        tracing::debug!("Querying knowledge base (top_k={})", request.top_k);

        self.post_query(request)
            .await
            .map(|wire| KnowledgeAnswer {
                summary: wire.summary,
                top_matches: wire
                    .top_matches
                    .into_iter()
                    .map(|m| KnowledgeMatch::ingest(m.preview, m.metadata))
                    .collect(),
            })
            .into()
    }

    async fn dump(&self) -> SourceResult<Vec<KnowledgeDocument>> {
        let url = resource_url(&self.base_url, "/dump");

        get_json::<DumpWire>(&self.client, &url)
            .await
            .map(|wire| {
                let documents = match wire {
                    DumpWire::List(documents) => documents,
                    DumpWire::Wrapped { documents } => documents,
                };
                documents.into_iter().map(DocumentWire::into_document).collect()
            })
            .into()
    }
}
