//! HTTP surface for the document summarizer.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Liveness text.
//! - `POST /summarize` – Upload a document as the multipart field `file`; returns the extracted
//!   text, the summary, keywords, and their translations. Optional query parameters
//!   `target_language`, `max_summary_words`, and `top_n` override the configured defaults.
//! - `GET /metrics` – Observe pipeline counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! Every failure is reported as `500` with a JSON `{ "error": message }` body. Each response
//! carries an `x-request-id` header, echoed from the request when present.

use crate::extraction::Document;
use crate::processing::{PipelineApi, PipelineError, SummarizeOptions, SummarizeReport};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, Query, Request, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    http::{HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const LIVENESS_MESSAGE: &str = "Document summarizer backend is running!";

/// Build the HTTP router exposing the summarizer API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: PipelineApi + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/summarize", post(summarize_document::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(middleware::from_fn(request_id))
        .layer(cors)
        .with_state(service)
}

async fn home() -> &'static str {
    LIVENESS_MESSAGE
}

/// Optional per-request overrides for `POST /summarize`.
#[derive(Debug, Default, Deserialize)]
struct SummarizeParams {
    #[serde(default)]
    target_language: Option<String>,
    #[serde(default)]
    max_summary_words: Option<usize>,
    #[serde(default)]
    top_n: Option<usize>,
}

/// Success response for `POST /summarize`.
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    /// Text as extracted from the upload.
    pub complete_text: String,
    /// Refined summary.
    pub summary: String,
    /// Keyword terms in descending score order.
    pub keywords: Vec<String>,
    /// Summary in the target language.
    pub translated_summary: String,
    /// Keywords in the target language, in keyword order.
    pub translated_keywords: Vec<String>,
}

impl From<SummarizeReport> for SummarizeResponse {
    fn from(report: SummarizeReport) -> Self {
        let keywords = report.keyword_terms();
        Self {
            complete_text: report.complete_text,
            summary: report.summary,
            keywords,
            translated_summary: report.translated_summary,
            translated_keywords: report.translated_keywords,
        }
    }
}

/// Run the full pipeline over an uploaded document.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    params: Result<Query<SummarizeParams>, QueryRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: PipelineApi,
{
    let Query(params) =
        params.map_err(|rejection| PipelineError::InvalidRequest(rejection.body_text()))?;
    let mut multipart =
        multipart.map_err(|rejection| PipelineError::InvalidRequest(rejection.body_text()))?;

    let document = read_upload(&mut multipart).await?;
    let options = SummarizeOptions {
        target_language: params.target_language,
        max_summary_words: params.max_summary_words,
        top_n: params.top_n,
        skip_translation: false,
    };
    let report = service.summarize_document(document, options).await?;
    Ok(Json(SummarizeResponse::from(report)))
}

/// Pull the `file` field out of the multipart body.
async fn read_upload(multipart: &mut Multipart) -> Result<Document, PipelineError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| PipelineError::InvalidRequest(error.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|error| PipelineError::InvalidRequest(error.body_text()))?;
        tracing::debug!(filename = %filename, bytes = bytes.len(), "Received upload");
        return Ok(Document::new(filename, bytes.to_vec()));
    }
    Err(PipelineError::MissingFile)
}

/// Return the pipeline counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsResponse>
where
    S: PipelineApi,
{
    let snapshot = service.metrics_snapshot();
    Json(MetricsResponse {
        documents_processed: snapshot.documents_processed,
        chunks_summarized: snapshot.chunks_summarized,
        chunks_skipped: snapshot.chunks_skipped,
        failed_documents: snapshot.failed_documents,
    })
}

/// Response body for `GET /metrics`.
#[derive(Serialize)]
struct MetricsResponse {
    documents_processed: u64,
    chunks_summarized: u64,
    chunks_skipped: u64,
    failed_documents: u64,
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Upload a PDF, DOCX, image, or text file as multipart field 'file'. Response returns { \"complete_text\", \"summary\", \"keywords\", \"translated_summary\", \"translated_keywords\" }.",
                request_example: Some(json!({
                    "query": {
                        "target_language": "hi",
                        "max_summary_words": 1000,
                        "top_n": 10
                    },
                    "multipart": { "file": "judgment.pdf" }
                })),
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return pipeline counters useful for observability dashboards.",
                request_example: None,
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/",
                description: "Liveness check returning a plain-text banner.",
                request_example: None,
            },
        ],
    })
}

/// Tag every request with a correlation id and run it inside a span carrying that id.
async fn request_id(request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path()
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

struct AppError(PipelineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.0.kind(), error = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::{REQUEST_ID_HEADER, create_router, get_commands};
    use crate::extraction::{Document, DocumentKind};
    use crate::metrics::MetricsSnapshot;
    use crate::processing::{
        PipelineApi, PipelineError, ScoredKeyword, SummarizeOptions, SummarizeReport,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "docsum-test-boundary";

    #[derive(Debug, Clone)]
    struct RecordedCall {
        filename: String,
        kind: DocumentKind,
        bytes: Vec<u8>,
        options: SummarizeOptions,
    }

    #[derive(Default)]
    struct StubPipeline {
        calls: Mutex<Vec<RecordedCall>>,
        fail: bool,
    }

    impl StubPipeline {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        async fn recorded_calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl PipelineApi for StubPipeline {
        async fn summarize_document(
            &self,
            document: Document,
            options: SummarizeOptions,
        ) -> Result<SummarizeReport, PipelineError> {
            self.calls.lock().await.push(RecordedCall {
                filename: document.filename.clone(),
                kind: document.kind.clone(),
                bytes: document.bytes.clone(),
                options,
            });
            if self.fail {
                return Err(PipelineError::Internal("stub failure".into()));
            }
            Ok(SummarizeReport {
                complete_text: String::from_utf8_lossy(&document.bytes).into_owned(),
                summary: "Short summary.".into(),
                keywords: vec![ScoredKeyword {
                    term: "appeal".into(),
                    score: 1.0,
                }],
                translated_summary: "अनुवाद".into(),
                translated_keywords: vec!["अपील".into()],
                target_language: "hi".into(),
                chunks_total: 1,
                chunks_summarized: 1,
            })
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                documents_processed: 3,
                chunks_summarized: 7,
                chunks_skipped: 2,
                failed_documents: 1,
            }
        }
    }

    fn multipart_body(field: &str, filename: &str, contents: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("request")
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json body")
    }

    #[tokio::test]
    async fn commands_catalog_exposes_summarize_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let summarize = commands
            .iter()
            .find(|cmd| cmd.name == "summarize")
            .expect("summarize command present");

        assert_eq!(summarize.method, "POST");
        assert_eq!(summarize.path, "/summarize");
        assert!(summarize.description.contains("file"));
        assert!(commands.len() >= 3);
    }

    #[tokio::test]
    async fn root_reports_liveness() {
        let app = create_router(Arc::new(StubPipeline::default()), 1024);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(&body[..], b"Document summarizer backend is running!");
    }

    #[tokio::test]
    async fn summarize_route_forwards_upload_and_overrides() {
        let service = Arc::new(StubPipeline::default());
        let app = create_router(service.clone(), 1024 * 1024);

        let response = app
            .oneshot(upload_request(
                "/summarize?target_language=fr&max_summary_words=50&top_n=3",
                multipart_body("file", "Ruling.TXT", b"The appeal is dismissed."),
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["complete_text"], "The appeal is dismissed.");
        assert_eq!(json["summary"], "Short summary.");
        assert_eq!(json["keywords"], serde_json::json!(["appeal"]));
        assert_eq!(json["translated_summary"], "अनुवाद");
        assert_eq!(json["translated_keywords"], serde_json::json!(["अपील"]));

        let calls = service.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        let call = &calls[0];
        assert_eq!(call.filename, "Ruling.TXT");
        assert_eq!(call.kind, DocumentKind::PlainText);
        assert_eq!(call.bytes, b"The appeal is dismissed.");
        assert_eq!(call.options.target_language.as_deref(), Some("fr"));
        assert_eq!(call.options.max_summary_words, Some(50));
        assert_eq!(call.options.top_n, Some(3));
    }

    #[tokio::test]
    async fn missing_file_field_is_a_json_error() {
        let service = Arc::new(StubPipeline::default());
        let app = create_router(service.clone(), 1024);

        let response = app
            .oneshot(upload_request(
                "/summarize",
                multipart_body("document", "a.txt", b"text"),
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("file"));
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn non_multipart_request_is_a_json_error() {
        let app = create_router(Arc::new(StubPipeline::default()), 1024);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/summarize")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn invalid_query_is_a_json_error() {
        let app = create_router(Arc::new(StubPipeline::default()), 1024);

        let response = app
            .oneshot(upload_request(
                "/summarize?top_n=many",
                multipart_body("file", "a.txt", b"text"),
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn pipeline_failure_is_a_json_error() {
        let app = create_router(Arc::new(StubPipeline::failing()), 1024);

        let response = app
            .oneshot(upload_request(
                "/summarize",
                multipart_body("file", "a.txt", b"text"),
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Pipeline failure: stub failure");
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let service = Arc::new(StubPipeline::default());
        let app = create_router(service.clone(), 64);

        let response = app
            .oneshot(upload_request(
                "/summarize",
                multipart_body("file", "big.txt", &[b'a'; 512]),
            ))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn metrics_route_reports_counters() {
        let app = create_router(Arc::new(StubPipeline::default()), 1024);
        let response = app
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["documents_processed"], 3);
        assert_eq!(json["chunks_summarized"], 7);
        assert_eq!(json["chunks_skipped"], 2);
        assert_eq!(json["failed_documents"], 1);
    }

    #[tokio::test]
    async fn request_id_header_is_echoed() {
        let app = create_router(Arc::new(StubPipeline::default()), 1024);
        let response = app
            .oneshot(
                Request::get("/metrics")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "req-123"
        );
    }

    #[tokio::test]
    async fn cors_preflight_allows_any_origin() {
        let app = create_router(Arc::new(StubPipeline::default()), 1024);
        let preflight = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/summarize")
                    .header("origin", "http://localhost:3000")
                    .header("access-control-request-method", "POST")
                    .header("access-control-request-headers", "content-type")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(preflight.status(), StatusCode::OK);
        let headers = preflight.headers();
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(headers.get("access-control-allow-methods").unwrap(), "*");
        assert_eq!(headers.get("access-control-allow-headers").unwrap(), "*");

        let response = app
            .oneshot(
                Request::get("/")
                    .header("origin", "http://localhost:3000")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
