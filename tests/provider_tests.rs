// tests/provider_tests.rs
use actix_web::{web, App, HttpResponse, HttpServer};
use serde_json::{json, Value};

use testgen::config::{GeminiConfig, OllamaConfig};
use testgen::errors::ErrorKind;
use testgen::providers::gemini::GeminiProvider;
use testgen::providers::ollama::OllamaProvider;
use testgen::providers::{CompletionClient, Sampling};

const GEMINI_ROUTE: &str = "/v1beta/models/gemini-test:generateContent";

/// Echoes the sampling settings and prompt it received.
async fn gemini_echo(req: actix_web::HttpRequest, body: web::Json<Value>) -> HttpResponse {
    if req.headers().get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return HttpResponse::Forbidden().json(json!({ "error": { "message": "bad key" } }));
    }
    let config = &body["generationConfig"];
    let text = format!(
        "temperature={} max={} prompt={}",
        config["temperature"],
        config.get("maxOutputTokens").cloned().unwrap_or(Value::Null),
        body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default()
    );
    HttpResponse::Ok().json(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
}

async fn gemini_overloaded() -> HttpResponse {
    HttpResponse::ServiceUnavailable().body("model overloaded")
}

async fn ollama_echo(body: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "response": format!(
            "model={} temperature={} stream={}",
            body["model"].as_str().unwrap_or_default(),
            body["options"]["temperature"],
            body["stream"]
        )
    }))
}

/// Starts a throwaway server and returns its base URL.
async fn spawn_upstream(overloaded: bool) -> String {
    let server = HttpServer::new(move || {
        let app = App::new().route("/api/generate", web::post().to(ollama_echo));
        if overloaded {
            app.route(GEMINI_ROUTE, web::post().to(gemini_overloaded))
        } else {
            app.route(GEMINI_ROUTE, web::post().to(gemini_echo))
        }
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

fn gemini(api_base: String, api_key: &str) -> GeminiProvider {
    GeminiProvider::new(
        reqwest::Client::new(),
        GeminiConfig {
            api_base,
            api_key: api_key.to_string(),
            model: "gemini-test".to_string(),
        },
    )
}

#[actix_rt::test]
async fn test_gemini_sends_sampling_and_returns_text() {
    let base = spawn_upstream(false).await;
    let provider = gemini(base, "test-key");

    let completion = provider.complete("hello", &Sampling::CODE).await.unwrap();
    assert_eq!(completion.text, "temperature=0.3 max=null prompt=hello");

    let sampling = Sampling::new(0.7, Some(256)).unwrap();
    let completion = provider.complete("again", &sampling).await.unwrap();
    assert_eq!(completion.text, "temperature=0.7 max=256 prompt=again");
    assert_eq!(provider.model(), "gemini-test");
}

#[actix_rt::test]
async fn test_gemini_error_status_is_upstream_error() {
    let base = spawn_upstream(false).await;
    let err = gemini(base, "wrong-key")
        .complete("hello", &Sampling::SCENARIOS)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamError);
    assert!(err.to_string().contains("403"));

    let base = spawn_upstream(true).await;
    let err = gemini(base, "test-key")
        .complete("hello", &Sampling::SCENARIOS)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamError);
    assert!(err.to_string().contains("model overloaded"));
}

#[actix_rt::test]
async fn test_unreachable_upstream_is_unavailable() {
    // Bind then drop a listener so the port is known to be closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let err = gemini(format!("http://{}", addr), "test-key")
        .complete("hello", &Sampling::SCENARIOS)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[actix_rt::test]
async fn test_truncated_body_is_unavailable() {
    // Promises more body than it sends, then hangs up.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        use std::io::{Read, Write};
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf);
        let _ = stream.write_all(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"candidates\":",
        );
        let _ = stream.flush();
    });

    let err = gemini(format!("http://{}", addr), "test-key")
        .complete("hello", &Sampling::SCENARIOS)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
}

#[actix_rt::test]
async fn test_ollama_generate() {
    let base = spawn_upstream(false).await;
    let provider = OllamaProvider::new(
        reqwest::Client::new(),
        OllamaConfig { api_base: format!("{}/", base), model: "llama3".to_string() },
    );

    let completion = provider.complete("hi", &Sampling::SCENARIOS).await.unwrap();
    assert_eq!(completion.text, "model=llama3 temperature=0.7 stream=false");
}
