use anyhow::Context;
use docx_rs::{Docx, Paragraph, Run};
use domain::notes::{NotesExporter, StudyNotes, MATH_SECTION_TITLE};
use shared::types::Result;
use std::fs::File;
use std::path::Path;

/// Body text size in half-points (12pt).
const BODY_SIZE: usize = 24;
const HEADING_SIZE: usize = 28;

/// Writes notes as a Word document: one paragraph per answer line, then an
/// optional bold math section.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxNotesExporter;

fn text_paragraph(line: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(line).size(BODY_SIZE))
}

fn build_document(notes: &StudyNotes) -> Docx {
    let mut doc = Docx::new();
    for line in notes.answer.lines() {
        doc = doc.add_paragraph(text_paragraph(line));
    }
    if let Some(math) = &notes.math {
        doc = doc.add_paragraph(
            Paragraph::new().add_run(Run::new().add_text(MATH_SECTION_TITLE).bold().size(HEADING_SIZE)),
        );
        for line in math.lines() {
            doc = doc.add_paragraph(text_paragraph(line));
        }
    }
    doc
}

impl NotesExporter for DocxNotesExporter {
    fn export(&self, notes: &StudyNotes, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        build_document(notes)
            .build()
            .pack(file)
            .with_context(|| format!("writing notes to {}", path.display()))?;
        tracing::info!(path = %path.display(), math = notes.math.is_some(), "notes exported");
        Ok(())
    }
}
