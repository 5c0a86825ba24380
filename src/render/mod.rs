//! Prescription PDF rendering and atomic file placement.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use printpdf::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("cannot write prescription file: {0}")]
    Io(#[from] std::io::Error),
}

/// Trims medication lines and drops the blank ones. Order is preserved.
pub fn normalize_medications(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders one prescription to PDF bytes.
///
/// Layout: title, patient name, prescription id, then the medications as a
/// numbered list on a single A4 page.
pub fn render_prescription_pdf(
    prescription_id: &str,
    patient_name: &str,
    medications: &[String],
) -> Result<Vec<u8>, RenderError> {
    let (doc, page1, layer1) = PdfDocument::new("Prescription", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(format!("font error: {e}")))?;

    let mut y = Mm(277.0);

    layer.use_text("Prescription", 18.0, Mm(20.0), y, &bold);
    y -= Mm(12.0);

    layer.use_text(format!("Patient: {patient_name}"), 11.0, Mm(20.0), y, &font);
    y -= Mm(6.0);
    layer.use_text(
        format!("Prescription ID: {prescription_id}"),
        11.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(12.0);

    layer.use_text("Medications:", 12.0, Mm(20.0), y, &bold);
    y -= Mm(7.0);

    for (i, medication) in medications.iter().enumerate() {
        layer.use_text(
            format!("{}. {}", i + 1, medication),
            10.0,
            Mm(25.0),
            y,
            &font,
        );
        y -= Mm(5.5);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| RenderError::Pdf(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| RenderError::Pdf(format!("buffer error: {e}")))
}

/// Writes rendered bytes to `<dir>/<prescription_id>.pdf` atomically: the
/// bytes land in a temp file in the same directory and are renamed into
/// place, so a reader never observes a half-written document.
pub fn write_prescription_file(
    dir: &Path,
    prescription_id: &str,
    bytes: &[u8],
) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    let path = dir.join(format!("{prescription_id}.pdf"));
    tmp.persist(&path).map_err(|e| RenderError::Io(e.error))?;

    tracing::info!(path = %path.display(), size = bytes.len(), "prescription PDF written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meds(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn renders_valid_pdf_bytes() {
        let bytes = render_prescription_pdf(
            "rx-7",
            "Alice Johnson",
            &meds(&["Sumatriptan 50mg as needed", "Hydration"]),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn empty_medication_list_still_renders() {
        let bytes = render_prescription_pdf("rx-0", "Bob", &[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn normalization_trims_and_drops_blanks() {
        let lines = meds(&["  Paracetamol 500mg  ", "", "   ", "Rest and fluids"]);
        assert_eq!(
            normalize_medications(&lines),
            vec!["Paracetamol 500mg", "Rest and fluids"]
        );
    }

    #[test]
    fn file_lands_under_prescription_id() {
        let tmp = tempfile::tempdir().unwrap();
        let bytes = render_prescription_pdf("rx-9", "Alice", &meds(&["Rest"])).unwrap();
        let path = write_prescription_file(tmp.path(), "rx-9", &bytes).unwrap();
        assert_eq!(path.file_name().unwrap(), "rx-9.pdf");
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn rewrite_replaces_previous_document() {
        let tmp = tempfile::tempdir().unwrap();
        write_prescription_file(tmp.path(), "rx-9", b"%PDF-old").unwrap();
        let path = write_prescription_file(tmp.path(), "rx-9", b"%PDF-new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-new");
    }
}
