//! Document text extraction.
//!
//! Turns uploaded file bytes into plain text for the ingestion pipeline.
//! PDF and DOCX parsing sit behind the `pdf` and `docx` features; plain text
//! and markdown decode best-effort (invalid bytes replaced, never raised);
//! images are handed to the vision model, whose description is treated as
//! the document text.

use std::path::Path;

use crate::llm::ollama::OllamaClient;
use crate::types::{AppError, Result};

/// Extract text from `content`, dispatching on the filename extension.
pub async fn extract_text(content: &[u8], filename: &str, ollama: &OllamaClient) -> Result<String> {
    match extension_of(filename).as_str() {
        "pdf" => extract_pdf(content),
        "docx" => extract_docx(content),
        "png" | "jpg" | "jpeg" => ollama.describe_image(content).await,
        // Plain text, markdown, and anything else: best-effort decode.
        _ => Ok(String::from_utf8_lossy(content).into_owned()),
    }
}

/// Lowercased extension of `filename`, or empty when there is none.
pub fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(feature = "pdf")]
fn extract_pdf(content: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(content)
        .map_err(|e| AppError::Extraction(format!("failed to parse PDF: {e}")))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_content: &[u8]) -> Result<String> {
    Err(AppError::Extraction(
        "PDF support not enabled (rebuild with the `pdf` feature)".to_string(),
    ))
}

#[cfg(feature = "docx")]
fn extract_docx(content: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(content)
        .map_err(|e| AppError::Extraction(format!("failed to parse DOCX: {e}")))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            paragraphs.push(paragraph.raw_text());
        }
    }
    Ok(paragraphs.join("\n"))
}

#[cfg(not(feature = "docx"))]
fn extract_docx(_content: &[u8]) -> Result<String> {
    Err(AppError::Extraction(
        "DOCX support not enabled (rebuild with the `docx` feature)".to_string(),
    ))
}
