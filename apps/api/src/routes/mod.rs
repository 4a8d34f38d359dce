pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate_resume", post(handlers::handle_generate_resume))
        .route("/generate_pdf", post(handlers::handle_generate_pdf))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::render::{LineGrammar, PdfRenderer, RenderError};

    /// Counts calls; optionally fails every one of them.
    struct MockGenerator {
        calls: AtomicUsize,
        reply: Option<String>,
    }

    impl MockGenerator {
        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: None,
            })
        }

        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Some(text.to_string()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(LlmError::Api {
                status: 503,
                message: "Model is currently loading".to_string(),
            })
        }
    }

    /// Wraps the HTML in a fake PDF envelope so tests can inspect what was rendered.
    struct MockRenderer {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockRenderer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail,
            })
        }
    }

    impl PdfRenderer for MockRenderer {
        fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RenderError::Pdf("layout engine crashed".to_string()));
            }
            Ok(format!("%PDF-1.7\n{html}\n%%EOF").into_bytes())
        }
    }

    fn test_config(temp_dir: &Path) -> Config {
        Config {
            hf_api_token: Some("test-token".to_string()),
            hf_model: "gpt2".to_string(),
            hf_api_base: "http://127.0.0.1:9".to_string(),
            generation_timeout: Duration::from_secs(10),
            pdf_temp_dir: temp_dir.to_path_buf(),
            max_list_item: 5,
            port: 8001,
            rust_log: "info".to_string(),
        }
    }

    fn test_state(
        generator: Option<Arc<MockGenerator>>,
        renderer: Arc<dyn PdfRenderer>,
        temp_dir: &Path,
    ) -> AppState {
        AppState {
            generator: generator.map(|g| g as Arc<dyn TextGenerator>),
            renderer,
            grammar: Arc::new(LineGrammar::default()),
            config: test_config(temp_dir),
        }
    }

    fn post_json(uri: &str) -> Request<Body> {
        let body = json!({
            "experience": "Built X",
            "job_description": "backend roles",
            "prompt": "ignored"
        });
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn dir_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_generate_resume_falls_back_on_generation_failure() {
        let dir = tempfile::tempdir().unwrap();
        let generator = MockGenerator::failing();
        let app = build_router(test_state(
            Some(generator.clone()),
            MockRenderer::new(false),
            dir.path(),
        ));

        let response = app.oneshot(post_json("/generate_resume")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let value = json_body(response).await;
        let html = value["resume_html"].as_str().unwrap();
        for heading in ["SUMMARY", "EXPERIENCE", "SKILLS", "ACHIEVEMENTS"] {
            assert!(html.contains(&format!(">{heading}</h2>")), "missing {heading}");
        }
        assert!(html.contains("backend roles"));
        assert!(html.contains("<p style='margin: 10px 0;'>Built X</p>"));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_resume_uses_model_output() {
        let dir = tempfile::tempdir().unwrap();
        let generator = MockGenerator::replying(
            "SUMMARY\nPlatform engineer with a decade of distributed systems work.\nSKILLS\n1. Rust",
        );
        let app = build_router(test_state(Some(generator), MockRenderer::new(false), dir.path()));

        let response = app.oneshot(post_json("/generate_resume")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = json_body(response).await["resume_html"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(html.contains("Platform engineer with a decade"));
        assert!(html.contains("<li style='margin: 10px 0;'>Rust</li>"));
        assert!(!html.contains(">ACHIEVEMENTS</h2>"));
    }

    #[tokio::test]
    async fn test_generate_pdf_streams_pdf_and_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MockRenderer::new(false);
        let app = build_router(test_state(
            Some(MockGenerator::failing()),
            renderer.clone(),
            dir.path(),
        ));

        let response = app.oneshot(post_json("/generate_pdf")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"resume.pdf\""
        );
        assert!(!dir_is_empty(dir.path()), "file exists while the body is pending");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!body.is_empty());
        assert!(body.starts_with(b"%PDF"));

        let rendered = String::from_utf8(body.to_vec()).unwrap();
        assert!(rendered.contains("@page"));
        assert!(rendered.contains("<h2>SKILLS</h2>"));
        assert!(rendered.contains("backend roles"));

        assert!(dir_is_empty(dir.path()));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_pdf_renderer_failure_is_500_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(
            Some(MockGenerator::failing()),
            MockRenderer::new(true),
            dir.path(),
        ));

        let response = app.oneshot(post_json("/generate_pdf")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({ "detail": "PDF rendering failed: layout engine crashed" })
        );
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_generate_pdf_unwritable_temp_dir_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let app = build_router(test_state(
            Some(MockGenerator::failing()),
            MockRenderer::new(false),
            &missing,
        ));

        let response = app.oneshot(post_json("/generate_pdf")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(detail.starts_with("I/O error"));
    }

    #[tokio::test]
    async fn test_missing_credential_fails_both_endpoints_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MockRenderer::new(false);
        let app = build_router(test_state(None, renderer.clone(), dir.path()));

        for uri in ["/generate_resume", "/generate_pdf"] {
            let response = app.clone().oneshot(post_json(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            assert_eq!(
                json_body(response).await,
                json!({ "detail": "Hugging Face API token not configured" })
            );
        }
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
        assert!(dir_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let generator = MockGenerator::failing();
        let app = build_router(test_state(
            Some(generator.clone()),
            MockRenderer::new(false),
            dir.path(),
        ));

        let request = Request::builder()
            .method("POST")
            .uri("/generate_resume")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"experience": "Built X"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_router(test_state(None, MockRenderer::new(false), dir.path()));

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }
}
