// Knowledge service - Use cases for the retrieval chat panel and document explorer
use crate::application::sources::KnowledgeSource;
use crate::domain::knowledge::{DocumentSource, KnowledgeAnswer, KnowledgeDocument, KnowledgeQuery};
use crate::domain::source_result::{SourceResult, UnavailableReason};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_TOP_K: u32 = 5;
pub const MAX_TOP_K: u32 = 20;
const DAILY_SUMMARY_PROMPT: &str = "What were today's key company updates?";
const DAILY_SUMMARY_TOP_K: u32 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum KnowledgeError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("knowledge service unavailable: {0}")]
    Unavailable(UnavailableReason),
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentListing {
    pub total: usize,
    pub counts: BTreeMap<DocumentSource, usize>,
    pub documents: Vec<KnowledgeDocument>,
}

#[derive(Clone)]
pub struct KnowledgeService {
    source: Arc<dyn KnowledgeSource>,
}

impl KnowledgeService {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self { source }
    }

    pub async fn query(
        &self,
        text: &str,
        top_k: Option<u32>,
    ) -> Result<KnowledgeAnswer, KnowledgeError> {
        let query = text.trim();
        if query.is_empty() {
            return Err(KnowledgeError::EmptyQuery);
        }

        let request = KnowledgeQuery {
            query: query.to_string(),
            top_k: top_k.unwrap_or(DEFAULT_TOP_K).clamp(1, MAX_TOP_K),
        };
        settle(self.source.query(&request).await)
    }

    pub async fn daily_summary(&self) -> Result<KnowledgeAnswer, KnowledgeError> {
        self.query(DAILY_SUMMARY_PROMPT, Some(DAILY_SUMMARY_TOP_K)).await
    }

    /// Indexed documents, optionally narrowed by a title/source search. Counts cover
    /// the whole index so the explorer can show totals next to a filtered list.
    pub async fn documents(&self, search: Option<&str>) -> Result<DocumentListing, KnowledgeError> {
        let documents = settle(self.source.dump().await)?;

        let mut counts = BTreeMap::new();
        for source in DocumentSource::ALL {
            counts.insert(source, 0);
        }
        for document in &documents {
            *counts.entry(document.source).or_insert(0) += 1;
        }
        let total = documents.len();

        let documents = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => documents.into_iter().filter(|d| d.matches(needle)).collect(),
            None => documents,
        };

        Ok(DocumentListing {
            total,
            counts,
            documents,
        })
    }
}

fn settle<T>(result: SourceResult<T>) -> Result<T, KnowledgeError> {
    match result {
        SourceResult::Success(value) => Ok(value),
        SourceResult::Unavailable(reason) => {
            tracing::warn!("Knowledge service unavailable: {}", reason);
            Err(KnowledgeError::Unavailable(reason))
        }
    }
}
