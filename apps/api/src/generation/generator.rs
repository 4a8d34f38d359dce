//! Resume text generation — builds the prompt, makes the single inference call
//! and applies the quality gate.
//!
//! Flow: build_resume_prompt → TextGenerator::generate → assess_output.
//!
//! Every failure of the remote call ends in `GeneratedText::Fallback`, whose
//! text is the prompt itself. Callers always get a complete four-section
//! resume back; they never see an inference error.

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::generation::prompts::{RESUME_INSTRUCTION, RESUME_PROMPT_TEMPLATE};
use crate::llm_client::TextGenerator;

/// Generated text shorter than this (in characters, after trimming) is rejected.
const MIN_GENERATED_CHARS: usize = 50;
/// Marker that must occur exactly once in usable output.
const SUMMARY_MARKER: &str = "SUMMARY";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body shared by both generation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub experience: String,
    pub job_description: String,
    /// Accepted for compatibility with existing clients; the template is fixed.
    #[allow(dead_code)]
    pub prompt: String,
}

/// Why the fallback template was returned instead of model output.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// Transport error, timeout, any status but 200, or a body without text.
    Unavailable(String),
    TooShort { chars: usize },
    MarkerCount { count: usize },
}

/// Outcome of a generation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedText {
    Generated(String),
    Fallback { text: String, reason: FallbackReason },
}

impl GeneratedText {
    pub fn text(&self) -> &str {
        match self {
            GeneratedText::Generated(text) => text,
            GeneratedText::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GeneratedText::Fallback { .. })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

/// Builds the resume prompt. Caller text is inserted verbatim, unescaped.
pub fn build_resume_prompt(experience: &str, job_description: &str) -> String {
    fill_template(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("{instruction}", RESUME_INSTRUCTION),
            ("{job_description}", job_description),
            ("{experience}", experience),
        ],
    )
}

/// Single-pass placeholder substitution.
///
/// Unlike chained `str::replace`, a value that itself contains a placeholder
/// is copied through untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    loop {
        let next = values
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|pos| (pos, *key, *value)))
            .min_by_key(|(pos, _, _)| *pos);

        match next {
            Some((pos, key, value)) => {
                out.push_str(&rest[..pos]);
                out.push_str(value);
                rest = &rest[pos + key.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Runs one generation attempt for the request.
pub async fn generate_resume_text(
    generator: &dyn TextGenerator,
    request: &GenerationRequest,
) -> GeneratedText {
    let prompt = build_resume_prompt(&request.experience, &request.job_description);

    let outcome = match generator.generate(&prompt).await {
        Ok(raw) => assess_output(prompt, &raw),
        Err(e) => {
            error!("Error generating resume: {e}");
            GeneratedText::Fallback {
                text: prompt,
                reason: FallbackReason::Unavailable(e.to_string()),
            }
        }
    };

    match &outcome {
        GeneratedText::Generated(text) => info!("Using model output ({} bytes)", text.len()),
        GeneratedText::Fallback { reason, .. } => {
            warn!("Using fallback resume template: {reason:?}")
        }
    }

    outcome
}

/// Quality gate for raw model output. `prompt` is returned on rejection.
fn assess_output(prompt: String, raw: &str) -> GeneratedText {
    let text = raw.trim();

    let chars = text.chars().count();
    if chars < MIN_GENERATED_CHARS {
        return GeneratedText::Fallback {
            text: prompt,
            reason: FallbackReason::TooShort { chars },
        };
    }

    let count = text.matches(SUMMARY_MARKER).count();
    if count != 1 {
        return GeneratedText::Fallback {
            text: prompt,
            reason: FallbackReason::MarkerCount { count },
        };
    }

    GeneratedText::Generated(text.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
