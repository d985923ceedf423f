//! HTTP behaviour of the Ollama and SearXNG clients against mock servers.
//!
//! The clients are blocking, so each test drives them from `spawn_blocking`
//! while the mock server runs on the async runtime.

use std::time::Duration;

use askweb::{
    AgentConfigBuilder, NO_RESULTS_SUMMARY, OllamaClientBuilder, OllamaClientTrait, OllamaError,
    PipelineError, Query, QueryPipeline, SearchProvider, SearxngClientBuilder,
};
use askweb::search::SearchError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn searxng_body(results: serde_json::Value) -> serde_json::Value {
    json!({
        "query": "q",
        "number_of_results": 0,
        "results": results,
        "answers": [],
        "suggestions": []
    })
}

// =============================================================================
// Ollama
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn generate_sends_model_prompt_and_separate_system() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({
            "model": "llama3.2",
            "prompt": "what is rust",
            "system": "Output ONLY the search query",
            "stream": false
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"response": "rust programming language", "done": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = OllamaClientBuilder::new()
            .base_url(uri)
            .model("llama3.2")
            .build()
            .unwrap();
        client.generate("what is rust", Some("Output ONLY the search query"))
    })
    .await
    .unwrap();

    assert_eq!(result.unwrap(), "rust programming language");
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_without_system_omits_the_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({"model": "llama3.2", "prompt": "hi", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": ""})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = OllamaClientBuilder::new().base_url(uri).build().unwrap();
        client.generate("hi", None)
    })
    .await
    .unwrap();

    assert_eq!(result.unwrap(), "", "empty text is a success, not a failure");
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_maps_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "model not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = OllamaClientBuilder::new().base_url(uri).build().unwrap();
        client.generate("hi", None)
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(OllamaError::Http { status: 404 })));
}

#[tokio::test(flavor = "multi_thread")]
async fn generate_maps_slow_response_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "late"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        let client = OllamaClientBuilder::new()
            .base_url(uri)
            .timeout(Duration::from_millis(300))
            .build()
            .unwrap();
        client.generate("hi", None)
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(OllamaError::Timeout(_))));
}

#[test]
fn generate_reports_refused_connection() {
    let client = OllamaClientBuilder::new()
        .base_url("http://127.0.0.1:9")
        .build()
        .unwrap();

    let result = client.generate("hi", None);

    assert!(matches!(result, Err(OllamaError::Network(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_models_sorts_largest_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {"name": "llama3.2:latest", "size": 2_000_000_000u64},
                {"name": "qwen2.5:14b", "size": 9_000_000_000u64}
            ]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let models = tokio::task::spawn_blocking(move || {
        OllamaClientBuilder::new()
            .base_url(uri)
            .build()
            .unwrap()
            .list_models()
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(models, vec!["qwen2.5:14b", "llama3.2:latest"]);
}

// =============================================================================
// SearXNG
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn search_requests_json_english_single_engine() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "paris weather"))
        .and(query_param("format", "json"))
        .and(query_param("language", "en"))
        .and(query_param("engines", "brave"))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_body(json!([
            {"title": "Forecast", "content": "Sunny", "url": "https://w.example"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let results = tokio::task::spawn_blocking(move || {
        let client = SearxngClientBuilder::new().base_url(uri).build().unwrap();
        client.search_one_engine("paris weather", "brave")
    })
    .await
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url(), Some("https://w.example"));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_failures_become_empty_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engines", "google"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engines", "bing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (google, bing, fetched) = tokio::task::spawn_blocking(move || {
        let client = SearxngClientBuilder::new().base_url(uri).build().unwrap();
        (
            client.search_one_engine("q", "google"),
            client.search_one_engine("q", "bing"),
            client.fetch("q", "bing"),
        )
    })
    .await
    .unwrap();

    assert!(google.is_empty());
    assert!(bing.is_empty());
    assert!(matches!(fetched, Err(SearchError::Decode(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn probe_detects_disabled_json_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let uri = server.uri();
    let result = tokio::task::spawn_blocking(move || {
        SearxngClientBuilder::new()
            .base_url(uri)
            .build()
            .unwrap()
            .probe()
    })
    .await
    .unwrap();

    assert!(result.unwrap_err().is_json_format_disabled());
}

// =============================================================================
// Full pipeline over HTTP
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_falls_back_from_failing_engine_and_summarizes() {
    let ollama = MockServer::start().await;
    let searxng = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_json(json!({
            "model": "llama3.2",
            "prompt": "what is the weather in Paris today",
            "system": askweb::pipeline::interpretation_system_prompt(time::macros::date!(2026 - 10 - 16)),
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Paris weather today 2026-10-16\n"})))
        .expect(1)
        .mount(&ollama)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(wiremock::matchers::body_string_contains("User Query: what is the weather in Paris today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Cloudy and 14C according to https://weather.example/paris."
        })))
        .expect(1)
        .mount(&ollama)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engines", "duckduckgo"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&searxng)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engines", "brave"))
        .and(query_param("q", "Paris weather today 2026-10-16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_body(json!([
            {"title": "Paris weather today", "content": "Cloudy, 14C", "url": "https://weather.example/paris"},
            {"title": "Météo Paris", "content": "Rain later", "url": "https://meteo.example/paris"},
            {"url": "https://forecast.example/paris"}
        ]))))
        .expect(1)
        .mount(&searxng)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engines", "wikipedia"))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_body(json!([]))))
        .expect(0)
        .mount(&searxng)
        .await;

    let (ollama_uri, searxng_uri) = (ollama.uri(), searxng.uri());
    let outcome = tokio::task::spawn_blocking(move || {
        let config = AgentConfigBuilder::new()
            .ollama_url(ollama_uri)
            .searxng_url(searxng_uri)
            .model("llama3.2")
            .engines(["duckduckgo", "brave", "wikipedia", "bing", "google"])
            .build()
            .unwrap();
        let pipeline = QueryPipeline::from_config(&config)
            .unwrap()
            .with_date(time::macros::date!(2026 - 10 - 16));
        pipeline.run(&Query::new("what is the weather in Paris today").unwrap())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(outcome.search_query().as_str(), "Paris weather today 2026-10-16");
    assert_eq!(outcome.results().len(), 3);
    assert_eq!(outcome.results()[2].title_or_placeholder(), "No Title");
    assert!(outcome.summary().contains("https://weather.example/paris"));
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_with_unreachable_search_returns_canned_summary() {
    let ollama = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "anything"})))
        .expect(1)
        .mount(&ollama)
        .await;

    let ollama_uri = ollama.uri();
    let outcome = tokio::task::spawn_blocking(move || {
        let config = AgentConfigBuilder::new()
            .ollama_url(ollama_uri)
            .searxng_url("http://127.0.0.1:9")
            .engines(["duckduckgo", "brave"])
            .build()
            .unwrap();
        QueryPipeline::from_config(&config)
            .unwrap()
            .run(&Query::new("anything").unwrap())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(outcome.summary(), NO_RESULTS_SUMMARY);
    assert!(outcome.results().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_with_unreachable_model_fails_interpretation() {
    let searxng = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(searxng_body(json!([]))))
        .expect(0)
        .mount(&searxng)
        .await;

    let searxng_uri = searxng.uri();
    let result = tokio::task::spawn_blocking(move || {
        let config = AgentConfigBuilder::new()
            .ollama_url("http://127.0.0.1:9")
            .searxng_url(searxng_uri)
            .build()
            .unwrap();
        QueryPipeline::from_config(&config)
            .unwrap()
            .run(&Query::new("anything").unwrap())
    })
    .await
    .unwrap();

    assert!(matches!(
        result,
        Err(PipelineError::InterpretationFailed { source: Some(_), .. })
    ));
}
