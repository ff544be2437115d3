use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// User-facing notice for unsupported uploads.
pub const UNSUPPORTED_UPLOAD_NOTICE: &str =
    "Sorry, Suplo only supports PDF and DOCX files at the moment.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn parse(file_type: &str) -> Option<Self> {
        match file_type.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Sorry Document type not supported")]
    Unsupported { file_type: String },
    #[error("document extraction failed: {0}")]
    Extraction(String),
}

/// Text extraction backend for one document kind. The actual extraction
/// libraries are external collaborators; deployments inject their own
/// implementations and tests use fakes.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, data: &[u8]) -> Result<String, DocumentError>;
}

/// Placeholder extractor for deployments without a configured backend.
pub struct NoopDocumentExtractor {
    kind: DocumentKind,
}

impl NoopDocumentExtractor {
    pub fn new(kind: DocumentKind) -> Self {
        Self { kind }
    }
}

#[async_trait]
impl DocumentExtractor for NoopDocumentExtractor {
    async fn extract(&self, _data: &[u8]) -> Result<String, DocumentError> {
        Err(DocumentError::Extraction(format!(
            "no {} extractor configured for this deployment",
            self.kind.as_str()
        )))
    }
}

/// Routes an uploaded document to the extractor for its type.
pub struct DocumentPipeline {
    pdf: Arc<dyn DocumentExtractor>,
    docx: Arc<dyn DocumentExtractor>,
}

impl DocumentPipeline {
    pub fn new(pdf: Arc<dyn DocumentExtractor>, docx: Arc<dyn DocumentExtractor>) -> Self {
        Self { pdf, docx }
    }

    pub fn noop() -> Self {
        Self::new(
            Arc::new(NoopDocumentExtractor::new(DocumentKind::Pdf)),
            Arc::new(NoopDocumentExtractor::new(DocumentKind::Docx)),
        )
    }

    pub async fn extract_text(
        &self,
        file_type: &str,
        data: &[u8],
    ) -> Result<String, DocumentError> {
        match DocumentKind::parse(file_type) {
            Some(DocumentKind::Pdf) => self.pdf.extract(data).await,
            Some(DocumentKind::Docx) => self.docx.extract(data).await,
            None => Err(DocumentError::Unsupported { file_type: file_type.to_owned() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::{DocumentError, DocumentExtractor, DocumentKind, DocumentPipeline};

    struct FixedExtractor(&'static str);

    #[async_trait]
    impl DocumentExtractor for FixedExtractor {
        async fn extract(&self, _data: &[u8]) -> Result<String, DocumentError> {
            Ok(self.0.to_owned())
        }
    }

    fn pipeline() -> DocumentPipeline {
        DocumentPipeline::new(
            Arc::new(FixedExtractor("pdf text")),
            Arc::new(FixedExtractor("docx text")),
        )
    }

    #[tokio::test]
    async fn pdf_routes_to_the_pdf_extractor() {
        let text = pipeline().extract_text("pdf", b"%PDF").await.expect("pdf extraction");
        assert!(!text.is_empty());
        assert_eq!(text, "pdf text");
    }

    #[tokio::test]
    async fn docx_routes_to_the_docx_extractor() {
        let text = pipeline().extract_text("docx", b"PK").await.expect("docx extraction");
        assert_eq!(text, "docx text");
    }

    #[tokio::test]
    async fn unknown_type_fails_with_the_fixed_message() {
        let error = pipeline().extract_text("xls", b"...").await.expect_err("unsupported");
        assert_eq!(error.to_string(), "Sorry Document type not supported");
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!(DocumentKind::parse("PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::parse(" Docx "), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::parse("pptx"), None);
    }
}
