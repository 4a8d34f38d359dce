// Output rendering: resume text → HTML (screen or print), print HTML → page
// layout → PDF.
// PDF rendering is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod formatter;
pub mod layout;
pub mod pdf;

// Re-export the public API consumed by the handlers.
pub use formatter::{render_html, LineGrammar, Style};
pub use pdf::{HtmlPdfRenderer, PdfRenderer, RenderError, TempPdf};
