//! Text Extraction Module Tests
//!
//! Extraction through the async `TextExtractor` collaborator, from files on disk
//! and from in-memory uploads.

use crate::error::AppError;
use crate::text_extract::{self, LocalTextExtractor, TextExtractor};
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

async fn extract_file(file: &NamedTempFile, file_name: &str) -> Result<String, AppError> {
    let bytes = tokio::fs::read(file.path()).await?;
    LocalTextExtractor.extract(file_name.to_string(), bytes).await
}

fn temp_file_with(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content).expect("write temp file");
    file
}

#[cfg(test)]
mod text_extraction_tests {
    use super::*;

    #[tokio::test]
    async fn test_extract_plain_text_file() {
        let file = temp_file_with(b"LEASE AGREEMENT\n\n  1. Rent is $900.  \n");
        let text = extract_file(&file, "lease.txt").await.unwrap();
        assert_eq!(text, "LEASE AGREEMENT\n1. Rent is $900.");
    }

    #[tokio::test]
    async fn test_extract_markdown_and_csv() {
        let markdown = temp_file_with(b"# Terms\n\nThe **tenant** pays rent.");
        assert!(extract_file(&markdown, "terms.md").await.unwrap().contains("Terms"));

        let csv = temp_file_with(b"item,amount\nrent,900\ndeposit,1800");
        let text = extract_file(&csv, "fees.csv").await.unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_extension_is_case_insensitive() {
        let file = temp_file_with(br#"{"clause": "Rent is due monthly."}"#);
        assert!(extract_file(&file, "CLAUSES.JSON").await.is_ok());
    }

    #[tokio::test]
    async fn test_unicode_content() {
        let file = temp_file_with("किराया ₹15,000 प्रति माह है।\nLoyer : 900 €".as_bytes());
        let text = extract_file(&file, "contract.txt").await.unwrap();
        assert!(text.contains("₹15,000"));
        assert!(text.contains("900 €"));
    }

    #[tokio::test]
    async fn test_unsupported_format() {
        let file = temp_file_with(&[0x00, 0x01, 0x02, 0x03]);
        match extract_file(&file, "binary.exe").await {
            Err(AppError::Extraction(message)) => assert!(message.contains("Unsupported file type")),
            other => panic!("expected extraction error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_whitespace_only_file_reports_no_text() {
        let file = temp_file_with(b"\n   \n\t\n");
        match extract_file(&file, "blank.txt").await {
            Err(AppError::Extraction(message)) => assert_eq!(message, "blank.txt returned no text"),
            other => panic!("expected extraction error, got {:?}", other),
        }
    }
}

#[cfg(test)]
mod pdf_extraction_tests {
    use super::*;

    #[test]
    fn test_pdf_extraction_invalid_bytes() {
        let result = text_extract::extract_text_from_bytes("contract.pdf", b"This is not a PDF");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }

    #[test]
    fn test_pdf_extraction_empty_bytes() {
        let result = text_extract::extract_text_from_bytes("contract.pdf", &[]);
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod docx_extraction_tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};

    fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let docx = paragraphs.iter().fold(Docx::new(), |doc, text| {
            doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)))
        });
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).expect("pack docx");
        buffer.into_inner()
    }

    #[tokio::test]
    async fn test_docx_paragraphs_become_lines() {
        let bytes = build_docx(&["SERVICE AGREEMENT", "1. The Contractor shall deliver monthly reports."]);
        let text = LocalTextExtractor
            .extract("agreement.docx".to_string(), bytes)
            .await
            .unwrap();
        assert_eq!(text, "SERVICE AGREEMENT\n1. The Contractor shall deliver monthly reports.");
    }

    #[test]
    fn test_docx_extraction_invalid_bytes() {
        let result = text_extract::extract_text_from_bytes("contract.docx", b"This is not a DOCX file");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
