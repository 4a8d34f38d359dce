//! Axum route handlers for the Generation API.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::{generate_resume_text, GenerationRequest};
use crate::render::{render_html, Style, TempPdf};
use crate::state::AppState;

const PDF_DISPOSITION: &str = "attachment; filename=\"resume.pdf\"";

#[derive(Debug, Serialize)]
pub struct ResumeHtmlResponse {
    pub resume_html: String,
}

/// POST /generate_resume
///
/// Generates resume text and returns it as screen-styled HTML.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Json<ResumeHtmlResponse>, AppError> {
    let generator = state.generator()?;

    let generated = generate_resume_text(generator, &request).await;
    let resume_html = render_html(generated.text(), Style::Screen, &state.grammar);

    info!(
        "Resume HTML ready ({} bytes, fallback={})",
        resume_html.len(),
        generated.is_fallback()
    );

    Ok(Json(ResumeHtmlResponse { resume_html }))
}

/// POST /generate_pdf
///
/// Generates resume text, renders print-styled HTML to PDF and streams it back
/// as `resume.pdf`. The temporary file lives exactly as long as the response body.
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> Result<Response, AppError> {
    let generator = state.generator()?;

    let generated = generate_resume_text(generator, &request).await;
    let html = render_html(generated.text(), Style::Print, &state.grammar);

    let renderer = Arc::clone(&state.renderer);
    let temp_dir = state.config.pdf_temp_dir.clone();
    let pdf = tokio::task::spawn_blocking(move || -> Result<TempPdf, AppError> {
        let bytes = renderer.render(&html)?;
        Ok(TempPdf::write(&temp_dir, &bytes)?)
    })
    .await
    .map_err(|e| anyhow::anyhow!("PDF rendering task failed: {e}"))??;

    info!(
        "PDF ready at {} ({} bytes, fallback={})",
        pdf.path().display(),
        pdf.size(),
        generated.is_fallback()
    );

    let size = pdf.size();
    let stream = pdf.into_stream().await?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/pdf"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static(PDF_DISPOSITION),
            ),
            (header::CONTENT_LENGTH, HeaderValue::from(size)),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}
