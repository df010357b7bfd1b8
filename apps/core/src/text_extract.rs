//! Text extraction for uploaded documents.
//! Supports: PDF, DOCX, TXT, MD, CSV, JSON

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::AppError;

/// Converts an uploaded file into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync + 'static {
    async fn extract(&self, file_name: String, bytes: Vec<u8>) -> Result<String, AppError>;
}

/// In-process extractor; parsing runs on the blocking thread pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTextExtractor;

#[async_trait]
impl TextExtractor for LocalTextExtractor {
    async fn extract(&self, file_name: String, bytes: Vec<u8>) -> Result<String, AppError> {
        tokio::task::spawn_blocking(move || extract_text_from_bytes(&file_name, &bytes)).await?
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Pdf,
    Docx,
    PlainText,
}

/// Magic bytes first, then the file extension.
fn detect_kind(file_name: &str, bytes: &[u8]) -> Result<FileKind, AppError> {
    let sniffed = infer::get(bytes).map(|t| t.extension());
    match sniffed {
        Some("pdf") => return Ok(FileKind::Pdf),
        Some("docx") => return Ok(FileKind::Docx),
        _ => {}
    }

    let extension = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(FileKind::Pdf),
        "docx" => Ok(FileKind::Docx),
        "txt" | "md" | "csv" | "json" => Ok(FileKind::PlainText),
        _ => Err(AppError::Extraction(format!(
            "Unsupported file type: {}",
            sniffed.unwrap_or(if extension.is_empty() { "unknown" } else { extension.as_str() })
        ))),
    }
}

/// Extracts and cleans the text of `file_data`. Empty results are an error.
pub fn extract_text_from_bytes(file_name: &str, file_data: &[u8]) -> Result<String, AppError> {
    let kind = detect_kind(file_name, file_data)?;
    info!(file_name, kind = ?kind, bytes = file_data.len(), "Extracting text");

    let raw = match kind {
        FileKind::PlainText => String::from_utf8(file_data.to_vec())
            .map_err(|e| AppError::Extraction(format!("Invalid UTF-8 content: {}", e)))?,
        FileKind::Pdf => extract_pdf_text(file_data)?,
        FileKind::Docx => extract_docx_text(file_data)?,
    };

    let cleaned = clean_extracted_text(&raw);
    if cleaned.is_empty() {
        warn!(file_name, "Extraction produced no text");
        return Err(AppError::Extraction(format!("{} returned no text", file_name)));
    }

    info!(file_name, chars = cleaned.chars().count(), "Extraction successful");
    Ok(cleaned)
}

fn extract_pdf_text(file_data: &[u8]) -> Result<String, AppError> {
    pdf_extract::extract_text_from_mem(file_data).map_err(|e| {
        warn!("PDF extraction failed: {}", e);
        AppError::Extraction(format!("Failed to extract PDF text: {}", e))
    })
}

fn extract_docx_text(file_data: &[u8]) -> Result<String, AppError> {
    let docx = docx_rs::read_docx(file_data).map_err(|e| {
        warn!("DOCX extraction failed: {}", e);
        AppError::Extraction(format!("Failed to extract DOCX text: {}", e))
    })?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            docx_rs::DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    para.children
        .iter()
        .filter_map(|pc| match pc {
            docx_rs::ParagraphChild::Run(run) => Some(
                run.children
                    .iter()
                    .filter_map(|rc| match rc {
                        docx_rs::RunChild::Text(t) => Some(t.text.as_str()),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect()
}

/// Trims every line and drops blank ones.
fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
