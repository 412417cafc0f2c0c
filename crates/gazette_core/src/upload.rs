use thiserror::Error;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Largest document accepted for upload (50 MB).
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// A document picked for processing, held in memory until it is submitted.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    /// Builds an upload, inferring the content type from the PDF magic bytes
    /// or the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = infer_content_type(&file_name, &bytes).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn with_content_type(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

// Uploads can be tens of megabytes; keep them out of debug output.
impl std::fmt::Debug for DocumentUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("no file selected")]
    Empty,
    #[error("please select a PDF file (got {content_type})")]
    NotPdf { content_type: String },
    #[error("file size must be less than 50MB ({size} bytes, max {max})")]
    TooLarge { size: u64, max: u64 },
}

/// Local checks run before any network call.
pub fn validate_upload(upload: &DocumentUpload) -> Result<(), UploadError> {
    if upload.bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    let essence = upload
        .content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim();
    if !essence.eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
        return Err(UploadError::NotPdf {
            content_type: upload.content_type.clone(),
        });
    }
    if upload.size() > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size: upload.size(),
            max: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

fn infer_content_type(file_name: &str, bytes: &[u8]) -> &'static str {
    let has_pdf_extension = file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("pdf"));
    if bytes.starts_with(PDF_MAGIC) || has_pdf_extension {
        PDF_CONTENT_TYPE
    } else {
        FALLBACK_CONTENT_TYPE
    }
}
