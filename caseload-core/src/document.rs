//! Document metadata shared by the assistant and the CLI.
//!
//! Documents themselves live in blob storage; this crate only sees their
//! metadata and, at ingestion time, their text content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of document a team member uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Report,
    Plan,
    Assessment,
    Note,
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Report => "report",
            Self::Plan => "plan",
            Self::Assessment => "assessment",
            Self::Note => "note",
        };
        write!(f, "{}", name)
    }
}

/// Lightweight reference to a document, as shown in document lists.
///
/// Similarity queries return these after resolving ranked identifiers against
/// the caller's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: String,
}

impl DocumentRef {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        doc_type: DocumentType,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            doc_type,
            uploaded_at: Utc::now(),
            uploaded_by: uploaded_by.into(),
        }
    }
}

/// File-level metadata recorded at upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub size: u64,
    pub format: String,
    pub last_modified: DateTime<Utc>,
}

/// A full document including its text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub content: String,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub metadata: Option<DocumentMetadata>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        doc_type: DocumentType,
        content: impl Into<String>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            doc_type,
            content: content.into(),
            uploaded_by: uploaded_by.into(),
            uploaded_at: Utc::now(),
            tags: Vec::new(),
            metadata: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Returns the list-item view of this document.
    pub fn to_ref(&self) -> DocumentRef {
        DocumentRef {
            id: self.id.clone(),
            title: self.title.clone(),
            doc_type: self.doc_type,
            uploaded_at: self.uploaded_at,
            uploaded_by: self.uploaded_by.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_serializes_lowercase() {
        let json = serde_json::to_string(&DocumentType::Assessment).unwrap();
        assert_eq!(json, "\"assessment\"");
        assert_eq!(DocumentType::Plan.to_string(), "plan");
    }

    #[test]
    fn test_document_json_uses_camel_case() {
        let json = r#"{
            "id": "doc-1",
            "title": "Speech therapy assessment",
            "type": "assessment",
            "content": "Articulation goals for spring term",
            "uploadedBy": "Mike Brown",
            "uploadedAt": "2024-01-10T10:00:00Z",
            "metadata": null
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.doc_type, DocumentType::Assessment);
        assert!(doc.tags.is_empty());

        let reference = doc.to_ref();
        assert_eq!(reference.id, "doc-1");
        assert_eq!(reference.uploaded_by, "Mike Brown");
        assert_eq!(reference.uploaded_at, doc.uploaded_at);
    }

    #[test]
    fn test_document_metadata_is_optional() {
        let bare = r#"{"id":"1","title":"IEP","type":"plan","content":"goals","uploadedBy":"Sarah Wilson","uploadedAt":"2024-01-10T10:00:00Z"}"#;
        let doc: Document = serde_json::from_str(bare).unwrap();
        assert!(doc.metadata.is_none());

        let with_metadata = r#"{"id":"2","title":"Q1","type":"report","content":"","uploadedBy":"Sarah Wilson","uploadedAt":"2024-01-10T10:00:00Z","metadata":{"size":2048,"format":"pdf","lastModified":"2024-01-09T08:00:00Z"}}"#;
        let doc: Document = serde_json::from_str(with_metadata).unwrap();
        let metadata = doc.metadata.unwrap();
        assert_eq!(metadata.size, 2048);
        assert_eq!(metadata.format, "pdf");
    }
}
