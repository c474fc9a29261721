// Knowledge base domain models
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Metadata = Map<String, Value>;

/// Where an indexed document came from. Resolved once when a document is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSource {
    Docs,
    Mail,
    Sheets,
    Other,
}

impl DocumentSource {
    pub const ALL: [DocumentSource; 4] = [
        DocumentSource::Docs,
        DocumentSource::Mail,
        DocumentSource::Sheets,
        DocumentSource::Other,
    ];

    /// Resolve from metadata `type` first, then the looser `source` tag.
    pub fn resolve(metadata: &Metadata) -> Self {
        let by_type = metadata.get("type").and_then(Value::as_str).and_then(|t| match t {
            "google_doc" => Some(DocumentSource::Docs),
            "gmail" => Some(DocumentSource::Mail),
            "google_sheet" => Some(DocumentSource::Sheets),
            _ => None,
        });
        if let Some(source) = by_type {
            return source;
        }

        match metadata.get("source").and_then(Value::as_str) {
            Some("docs") => DocumentSource::Docs,
            Some("mail") => DocumentSource::Mail,
            Some("sheets") => DocumentSource::Sheets,
            _ => DocumentSource::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeQuery {
    pub query: String,
    pub top_k: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeMatch {
    pub preview: String,
    pub metadata: Metadata,
    pub source: DocumentSource,
}

impl KnowledgeMatch {
    pub fn ingest(preview: String, metadata: Metadata) -> Self {
        let source = DocumentSource::resolve(&metadata);
        Self {
            preview,
            metadata,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeAnswer {
    pub summary: String,
    pub top_matches: Vec<KnowledgeMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeDocument {
    pub id: String,
    pub title: String,
    pub preview: String,
    pub metadata: Metadata,
    pub source: DocumentSource,
}

impl KnowledgeDocument {
    pub fn ingest(id: String, preview: String, metadata: Metadata) -> Self {
        let source = DocumentSource::resolve(&metadata);
        let title = metadata
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| if id.is_empty() { "Untitled".to_string() } else { id.clone() });
        Self {
            id,
            title,
            preview,
            metadata,
            source,
        }
    }

    pub fn source_tag(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }

    /// Case-insensitive match against the title and the raw source tag.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .source_tag()
                .is_some_and(|s| s.to_lowercase().contains(&needle))
    }
}
