mod common;

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use common::{config_for, two_page_pdf, upload_request};
use httpmock::{Method::POST, MockServer};
use mediclarity::{
    api::{AppState, create_router},
    extraction::{PdfTextExtractor, TextExtractor},
    mail::HttpMailer,
    processing::{ReportService, assemble_keywords},
    summarization::OpenAiSummarizationClient,
};
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(server: &MockServer, upload_dir: &std::path::Path) -> axum::Router {
    let config = Arc::new(config_for(
        &server.base_url(),
        &server.url("/emails"),
        upload_dir,
    ));
    let summarizer = OpenAiSummarizationClient::from_config(&config).expect("summarizer");
    let mailer = HttpMailer::from_config(&config).expect("mailer");
    create_router(AppState {
        config,
        reports: Arc::new(ReportService::new(
            Box::new(PdfTextExtractor::new()),
            Box::new(summarizer),
        )),
        mailer: Arc::new(mailer),
    })
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn pdf_extractor_reads_first_page_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("report.pdf");
    std::fs::write(
        &path,
        two_page_pdf(&["Hemoglobin 13.5 g/dL", "Glucose 98 mg/dL"], &["Cholesterol 240"]),
    )
    .expect("write pdf");

    let fragments = PdfTextExtractor::new()
        .extract_first_page(&path)
        .await
        .expect("fragments");
    let keywords = assemble_keywords(&fragments);

    assert!(fragments.iter().all(|fragment| fragment.page_index == 0));
    assert!(keywords.contains("Hemoglobin"), "keywords: {keywords}");
    assert!(keywords.contains("Glucose"), "keywords: {keywords}");
    assert!(!keywords.contains("Cholesterol"), "keywords: {keywords}");
}

#[tokio::test]
async fn upload_summarizes_pdf_and_removes_transient_file() {
    let server = MockServer::start_async().await;
    let completion = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_contains("Keywords: Hemoglobin");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "role": "assistant", "content": "Your hemoglobin is normal." } }]
            }));
        })
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let pdf = two_page_pdf(&["Hemoglobin 13.5 g/dL"], &["Page two"]);

    let response = app(&server, dir.path())
        .oneshot(upload_request("cbc.pdf", &pdf))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "summary": "Your hemoglobin is normal." })
    );
    completion.assert_async().await;
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
}

#[tokio::test]
async fn corrupt_upload_is_unprocessable_and_never_summarized() {
    let server = MockServer::start_async().await;
    let completion = server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;
    let dir = tempfile::tempdir().expect("tempdir");

    let response = app(&server, dir.path())
        .oneshot(upload_request("scan.pdf", b"this is not a pdf"))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json_body(response).await["error"].is_string());
    completion.assert_hits_async(0).await;
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
}

#[tokio::test]
async fn upstream_failure_is_generic_500() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).body("{\"error\":{\"message\":\"Incorrect API key provided\"}}");
        })
        .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let pdf = two_page_pdf(&["WBC 7.2"], &[]);

    let response = app(&server, dir.path())
        .oneshot(upload_request("cbc.pdf", &pdf))
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({ "error": "An error occurred while uploading the file" })
    );
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
}

#[tokio::test]
async fn send_email_relays_acknowledgement() {
    let server = MockServer::start_async().await;
    let mail = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer mail-key")
                .body_contains("Dear Grace,")
                .body_contains("MediClarity <clinic@example.org>");
            then.status(200).json_body(json!({ "id": "4ef9a417" }));
        })
        .await;
    let dir = tempfile::tempdir().expect("tempdir");

    let response = app(&server, dir.path())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/send-email")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "name": "Grace",
                        "email": "grace@example.org",
                        "message": "Question about my results"
                    })
                    .to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("router response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Email sent successfully");
    assert_eq!(body["data"]["messageId"], "4ef9a417");
    assert_eq!(body["data"]["accepted"], json!(["grace@example.org"]));
    mail.assert_async().await;
}
