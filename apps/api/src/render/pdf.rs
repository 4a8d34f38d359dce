//! HTML → PDF rendering and the transient PDF file served back to the client.
//!
//! Rendering is CPU-bound and synchronous: call it from `spawn_blocking`.

use std::io::{self, Write};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use printpdf::{
    BuiltinFont, Color, Line as PdfLine, LinePoint, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions,
    Point, Pt, Rgb, TextItem,
};
use tempfile::TempPath;
use thiserror::Error;
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::render::layout::{
    blocks_from_html, layout_blocks, PageLayout, MARGIN_PT, PAGE_HEIGHT_PT, PAGE_WIDTH_PT,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("PDF renderer produced an empty document")]
    Empty,
}

/// Converts a complete HTML document into PDF bytes.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Pure-Rust renderer for print-variant resume HTML.
///
/// Block layout happens in [`crate::render::layout`]; this type only turns the
/// placed lines into printpdf drawing ops with the builtin Helvetica faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlPdfRenderer;

/// #2c3e50
const HEADING_COLOR: (f32, f32, f32) = (44.0 / 255.0, 62.0 / 255.0, 80.0 / 255.0);
/// #3498db
const RULE_COLOR: (f32, f32, f32) = (52.0 / 255.0, 152.0 / 255.0, 219.0 / 255.0);
const TEXT_COLOR: (f32, f32, f32) = (0.0, 0.0, 0.0);
const RULE_THICKNESS_PT: f32 = 1.5;

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> Point {
    Point { x: Pt(x), y: Pt(y) }
}

/// Drawing ops for one laid-out page.
///
/// Each line gets its own text object: `SetTextCursor` is relative inside a
/// text object, so sharing one would offset every line by the previous one.
fn page_ops(page: &PageLayout) -> Vec<Op> {
    let mut ops = Vec::with_capacity(page.rules.len() * 3 + page.texts.len() * 6);

    for &y in &page.rules {
        ops.push(Op::SetOutlineColor {
            col: rgb(RULE_COLOR),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(RULE_THICKNESS_PT),
        });
        ops.push(Op::DrawLine {
            line: PdfLine {
                points: vec![
                    LinePoint {
                        p: point(MARGIN_PT, y),
                        bezier: false,
                    },
                    LinePoint {
                        p: point(PAGE_WIDTH_PT - MARGIN_PT, y),
                        bezier: false,
                    },
                ],
                is_closed: false,
            },
        });
    }

    for text in &page.texts {
        let (font, color) = if text.bold {
            (BuiltinFont::HelveticaBold, HEADING_COLOR)
        } else {
            (BuiltinFont::Helvetica, TEXT_COLOR)
        };
        ops.push(Op::StartTextSection);
        ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(text.size),
            font,
        });
        ops.push(Op::SetFillColor { col: rgb(color) });
        ops.push(Op::SetTextCursor {
            pos: point(text.x, text.baseline),
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.text.clone())],
            font,
        });
        ops.push(Op::EndTextSection);
    }

    ops
}

impl HtmlPdfRenderer {
    /// Lays out the document's blocks as A4 pages. Fails on a body with no blocks.
    fn build_document(html: &str) -> Result<PdfDocument, RenderError> {
        let blocks = blocks_from_html(html);
        if blocks.is_empty() {
            return Err(RenderError::Empty);
        }

        let pages: Vec<PdfPage> = layout_blocks(&blocks)
            .iter()
            .map(|page| {
                PdfPage::new(
                    Mm::from(Pt(PAGE_WIDTH_PT)),
                    Mm::from(Pt(PAGE_HEIGHT_PT)),
                    page_ops(page),
                )
            })
            .collect();
        debug!("Laid out {} blocks on {} pages", blocks.len(), pages.len());

        let mut doc = PdfDocument::new("Resume");
        doc.with_pages(pages);
        Ok(doc)
    }
}

impl PdfRenderer for HtmlPdfRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let doc = Self::build_document(html)?;

        let mut save_warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut save_warnings);
        debug!(
            "Rendered PDF: {} bytes, {} save warnings",
            bytes.len(),
            save_warnings.len()
        );

        if bytes.is_empty() {
            return Err(RenderError::Empty);
        }
        if !bytes.starts_with(b"%PDF-") {
            return Err(RenderError::Pdf("output is missing the PDF header".to_string()));
        }
        Ok(bytes)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Transient PDF file
// ────────────────────────────────────────────────────────────────────────────

/// A rendered PDF on disk, named `resume_*.pdf`.
///
/// The file is removed when this value is dropped, including every error path
/// after creation. Removal failures are ignored.
#[derive(Debug)]
pub struct TempPdf {
    path: TempPath,
    size: u64,
}

impl TempPdf {
    /// Writes `bytes` to a fresh uniquely named file inside `dir`.
    pub fn write(dir: &Path, bytes: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("resume_")
            .suffix(".pdf")
            .tempfile_in(dir)?;
        // A failed write drops `file`, which deletes the partial PDF.
        file.write_all(bytes)?;
        file.flush()?;

        Ok(Self {
            path: file.into_temp_path(),
            size: bytes.len() as u64,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Opens the file as a body stream that owns it.
    pub async fn into_stream(self) -> io::Result<PdfStream> {
        let file = File::open(&self.path).await?;
        Ok(PdfStream {
            reader: ReaderStream::new(file),
            _file: self,
        })
    }
}

/// Chunked reader over a [`TempPdf`]; dropping it deletes the file.
pub struct PdfStream {
    // Field order matters: the handle closes before the path is removed.
    reader: ReaderStream<File>,
    _file: TempPdf,
}

impl Stream for PdfStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.reader).poll_next(cx)
    }
}
