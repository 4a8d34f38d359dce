use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::render::{LineGrammar, PdfRenderer};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no Hugging Face token was configured.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub renderer: Arc<dyn PdfRenderer>,
    /// Line classification table shared by both formatter styles.
    pub grammar: Arc<LineGrammar>,
    pub config: Config,
}

impl AppState {
    /// The configured text generator, or the missing-credential error.
    pub fn generator(&self) -> Result<&dyn TextGenerator, AppError> {
        self.generator.as_deref().ok_or(AppError::MissingCredential)
    }
}
