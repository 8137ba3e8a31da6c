//! Reporting service: renders advisory reports to text and PDF files
//!
//! Both artifacts of a run share one timestamp token in their file names so
//! they can be matched up later. Previous runs' files are left in place.

use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use serde::Serialize;
use shared::{AdvisoryReport, REPORT_FILE_PREFIX};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::{AppError, AppResult};

/// US letter, in points
const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;
const LEFT_MARGIN_PT: f32 = 50.0;
const TOP_LINE_PT: f32 = 750.0;
const BOTTOM_MARGIN_PT: f32 = 50.0;
const FONT_SIZE_PT: f32 = 12.0;
const LINE_HEIGHT_PT: f32 = 14.4;

/// Kind of generated artifact
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Txt,
    Pdf,
}

impl ArtifactKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Txt => "txt",
            ArtifactKind::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Txt => "text/plain; charset=utf-8",
            ArtifactKind::Pdf => "application/pdf",
        }
    }

    /// Recognise a generated artifact name, e.g. `AgriSmart_Report_20240703_090507.pdf`
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let rest = file_name.strip_prefix(REPORT_FILE_PREFIX)?;
        let (token, extension) = rest.split_once('.')?;

        let bytes = token.as_bytes();
        let token_ok = bytes.len() == 15
            && bytes[8] == b'_'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 8 || b.is_ascii_digit());
        if !token_ok {
            return None;
        }

        match extension {
            "txt" => Some(ArtifactKind::Txt),
            "pdf" => Some(ArtifactKind::Pdf),
            _ => None,
        }
    }
}

/// In-memory text and PDF renderings of one report
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    pub file_stem: String,
    pub text: String,
    pub pdf: Vec<u8>,
}

impl ReportArtifacts {
    pub fn render(report: &AdvisoryReport) -> AppResult<Self> {
        let text = report.render_text();
        let pdf = render_pdf(&report.file_stem(), &text)?;
        Ok(Self {
            file_stem: report.file_stem(),
            text,
            pdf,
        })
    }

    pub fn file_name(&self, kind: ArtifactKind) -> String {
        format!("{}.{}", self.file_stem, kind.extension())
    }
}

/// Where a run's artifacts were written
#[derive(Debug, Clone, Serialize)]
pub struct SavedReport {
    pub txt_file: String,
    pub pdf_file: String,
    #[serde(skip)]
    pub txt_path: PathBuf,
    #[serde(skip)]
    pub pdf_path: PathBuf,
}

/// Lines that fit on one page between the first baseline and the bottom margin
fn lines_per_page() -> usize {
    (((TOP_LINE_PT - BOTTOM_MARGIN_PT) / LINE_HEIGHT_PT).floor() as usize) + 1
}

/// Render text as a PDF: one output line per input line, single builtin font
pub fn render_pdf(title: &str, text: &str) -> AppResult<Vec<u8>> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut pages = lines.chunks(lines_per_page());

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm::from(Pt(PAGE_WIDTH_PT)),
        Mm::from(Pt(PAGE_HEIGHT_PT)),
        "Report",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AppError::ReportRender(e.to_string()))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut page_lines = pages.next().unwrap_or(&[]);
    loop {
        layer.begin_text_section();
        layer.set_font(&font, FONT_SIZE_PT);
        layer.set_line_height(LINE_HEIGHT_PT);
        layer.set_text_cursor(Mm::from(Pt(LEFT_MARGIN_PT)), Mm::from(Pt(TOP_LINE_PT)));
        for line in page_lines {
            layer.write_text(*line, &font);
            layer.add_line_break();
        }
        layer.end_text_section();

        match pages.next() {
            Some(next) => {
                let (page, page_layer) =
                    doc.add_page(Mm::from(Pt(PAGE_WIDTH_PT)), Mm::from(Pt(PAGE_HEIGHT_PT)), "Report");
                layer = doc.get_page(page).get_layer(page_layer);
                page_lines = next;
            }
            None => break,
        }
    }

    doc.save_to_bytes()
        .map_err(|e| AppError::ReportRender(e.to_string()))
}

/// Reporting service writing artifacts into an output directory
#[derive(Clone)]
pub struct ReportingService {
    output_dir: PathBuf,
}

impl ReportingService {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write both artifacts, or neither
    ///
    /// Each file is written to a temporary sibling and renamed into place.
    /// If the second file fails, the first one is removed again so no
    /// half-finished report is ever offered for download.
    pub fn write_artifacts(&self, artifacts: &ReportArtifacts) -> AppResult<SavedReport> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            AppError::ReportWrite(format!("{}: {}", self.output_dir.display(), e))
        })?;

        let txt_file = artifacts.file_name(ArtifactKind::Txt);
        let pdf_file = artifacts.file_name(ArtifactKind::Pdf);
        let txt_path = self.output_dir.join(&txt_file);
        let pdf_path = self.output_dir.join(&pdf_file);

        self.write_atomic(&txt_path, artifacts.text.as_bytes())?;
        if let Err(e) = self.write_atomic(&pdf_path, &artifacts.pdf) {
            if let Err(cleanup) = std::fs::remove_file(&txt_path) {
                tracing::warn!(path = %txt_path.display(), error = %cleanup, "Failed to remove orphaned text report");
            }
            return Err(e);
        }

        tracing::info!(txt = %txt_file, pdf = %pdf_file, "Report artifacts written");

        Ok(SavedReport {
            txt_file,
            pdf_file,
            txt_path,
            pdf_path,
        })
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> AppResult<()> {
        let write_err = |e: std::io::Error| AppError::ReportWrite(format!("{}: {}", path.display(), e));

        let mut file = NamedTempFile::new_in(&self.output_dir).map_err(write_err)?;
        file.write_all(contents).map_err(write_err)?;
        file.as_file().sync_all().map_err(write_err)?;
        file.persist(path).map_err(|e| write_err(e.error))?;
        Ok(())
    }

    /// Read a previously generated artifact by file name
    pub fn read_artifact(&self, file_name: &str) -> AppResult<(ArtifactKind, Vec<u8>)> {
        let kind = ArtifactKind::from_file_name(file_name)
            .ok_or_else(|| AppError::NotFound("Report".to_string()))?;

        let path = self.output_dir.join(file_name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok((kind, bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("Report".to_string()))
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
