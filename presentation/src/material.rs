use anyhow::{bail, Context};
use docx_rs::{read_docx, DocumentChild};
use shared::types::Result;
use shared::utils::is_supported_material;
use std::path::Path;

/// Plain text of a teacher's material file (txt, md, pdf or docx).
pub fn read_material(path: &Path) -> Result<String> {
    if !is_supported_material(path) {
        bail!(
            "cannot read '{}': supported formats are text, markdown, PDF and DOCX",
            path.display()
        );
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let text = match ext.as_str() {
        "pdf" => pdf_extract::extract_text(path)
            .with_context(|| format!("extracting text from PDF '{}'", path.display()))?,
        "docx" => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading DOCX file '{}'", path.display()))?;
            docx_text(&bytes).with_context(|| format!("parsing DOCX '{}'", path.display()))?
        }
        _ => std::fs::read_to_string(path)
            .with_context(|| format!("reading '{}' as text", path.display()))?,
    };
    if text.trim().is_empty() {
        bail!("no text content found in '{}'", path.display());
    }
    tracing::debug!(path = %path.display(), chars = text.chars().count(), "material loaded");
    Ok(text)
}

fn docx_text(bytes: &[u8]) -> Result<String> {
    let docx = read_docx(bytes)?;
    let mut text = String::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => {
                text.push_str(&p.raw_text());
                text.push('\n');
            }
            DocumentChild::Table(_) => text.push_str("[Table content not extracted]\n"),
            _ => {}
        }
    }
    Ok(text)
}
