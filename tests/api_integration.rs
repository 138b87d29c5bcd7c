use std::{io::Write, sync::Arc};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use docsum::{api::create_router, config::Config, processing::PipelineService};
use httpmock::{Method::POST, Mock, MockServer};
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "docsum-integration-boundary";

struct Harness {
    model: MockServer,
    translator: MockServer,
}

impl Harness {
    async fn start() -> Self {
        Self {
            model: MockServer::start_async().await,
            translator: MockServer::start_async().await,
        }
    }

    fn router(&self) -> Router {
        let config = Config {
            summarization_url: Some(self.model.base_url()),
            translation_url: self.translator.base_url(),
            ..Config::default()
        };
        let service = PipelineService::from_config(&config).expect("pipeline service");
        create_router(Arc::new(service), config.max_upload_bytes)
    }

    async fn mock_summary(&self, summary: &str) -> Mock<'_> {
        let summary = summary.to_string();
        self.model
            .mock_async(|when, then| {
                when.method(POST).path("/models/t5-small");
                then.status(200)
                    .json_body(json!([{ "summary_text": summary }]));
            })
            .await
    }

    async fn mock_translation(&self, translated: &str) -> Mock<'_> {
        let translated = translated.to_string();
        self.translator
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/translate_a/single")
                    .query_param("tl", "hi");
                then.status(200)
                    .json_body(json!([[[translated, "source", null, null, 1]], null, "en"]));
            })
            .await
    }
}

fn upload(filename: &str, contents: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/summarize?top_n=3")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.expect("router response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json body"))
}

#[tokio::test]
async fn plain_text_document_runs_the_full_pipeline() {
    let harness = Harness::start().await;
    let model = harness
        .mock_summary("quick brown fox jumps . lazy dog sleeps.")
        .await;
    let translation = harness.mock_translation("अनुवाद").await;

    let input = "the quick brown fox jumps. the lazy dog sleeps.";
    let (status, json) = send(harness.router(), upload("story.txt", input.as_bytes())).await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {json}");
    assert_eq!(json["complete_text"], input);
    assert_eq!(json["summary"], "Quick brown fox jumps.\nLazy dog sleeps.");
    assert_eq!(json["keywords"], json!(["brown", "dog", "fox"]));
    assert_eq!(json["translated_summary"], "अनुवाद");
    assert_eq!(
        json["translated_keywords"],
        json!(["अनुवाद", "अनुवाद", "अनुवाद"])
    );

    model.assert_hits_async(1).await;
    translation.assert_hits_async(4).await;
}

#[tokio::test]
async fn normalized_text_is_what_reaches_the_model() {
    let harness = Harness::start().await;
    let model = harness
        .model
        .mock_async(|when, then| {
            when.method(POST)
                .path("/models/t5-small")
                .json_body_partial(r#"{"inputs": "quick brown fox jumps lazy dog sleeps"}"#);
            then.status(200)
                .json_body(json!([{ "summary_text": "a fox and a dog." }]));
        })
        .await;
    harness.mock_translation("x").await;

    let (status, _) = send(
        harness.router(),
        upload(
            "story.md",
            b"The quick, brown fox jumps!\n\nThe lazy dog sleeps.",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    model.assert_async().await;
}

#[tokio::test]
async fn docx_upload_is_extracted_before_summarizing() {
    let harness = Harness::start().await;
    harness.mock_summary("the appeal was dismissed.").await;
    harness.mock_translation("अपील").await;

    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>The appeal is dismissed.</w:t></w:r></w:p>
    <w:p><w:r><w:t>Costs follow the event.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file(
        "word/document.xml",
        zip::write::SimpleFileOptions::default(),
    )
    .expect("zip start file");
    zip.write_all(xml.as_bytes()).expect("write xml");
    let docx = zip.finish().expect("finish zip").into_inner();

    let (status, json) = send(harness.router(), upload("ruling.docx", &docx)).await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {json}");
    assert_eq!(
        json["complete_text"],
        "The appeal is dismissed.\nCosts follow the event."
    );
    assert_eq!(json["summary"], "The appeal was dismissed.");
    assert_eq!(json["keywords"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unknown_extension_with_utf8_content_is_decoded_verbatim() {
    let harness = Harness::start().await;
    harness.mock_summary("parties settled.").await;
    harness.mock_translation("x").await;

    let input = "party,amount\nplaintiff,100\ndefendant,200";
    let (status, json) = send(harness.router(), upload("ledger.csv", input.as_bytes())).await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {json}");
    assert_eq!(json["complete_text"], input);
}

#[tokio::test]
async fn malformed_pdf_fails_before_the_model_is_called() {
    let harness = Harness::start().await;
    let model = harness.mock_summary("unused").await;
    let translation = harness.mock_translation("unused").await;

    let (status, json) = send(
        harness.router(),
        upload("broken.pdf", b"this is not really a pdf"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|message| message.contains("PDF")),
        "unexpected body: {json}"
    );
    model.assert_hits_async(0).await;
    translation.assert_hits_async(0).await;
}

#[tokio::test]
async fn model_outage_is_reported_as_error() {
    let harness = Harness::start().await;
    harness
        .model
        .mock_async(|when, then| {
            when.method(POST).path("/models/t5-small");
            then.status(503)
                .json_body(json!({ "error": "Model t5-small is currently loading" }));
        })
        .await;
    let translation = harness.mock_translation("unused").await;

    let (status, json) = send(
        harness.router(),
        upload("notes.txt", b"contract breach damages"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        json["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("Model inference failed")),
        "unexpected body: {json}"
    );
    translation.assert_hits_async(0).await;
}

#[tokio::test]
async fn metrics_reflect_processed_and_failed_documents() {
    let harness = Harness::start().await;
    harness.mock_summary("a summary.").await;
    harness.mock_translation("x").await;
    let router = harness.router();

    let (status, _) = send(router.clone(), upload("a.txt", b"contract breach damages")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(router.clone(), upload("b.pdf", b"garbage")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let response = router
        .oneshot(Request::get("/metrics").body(Body::empty()).expect("request"))
        .await
        .expect("router response");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json body");

    assert_eq!(json["documents_processed"], 1);
    assert_eq!(json["chunks_summarized"], 1);
    assert_eq!(json["chunks_skipped"], 0);
    assert_eq!(json["failed_documents"], 1);
}
