use httpmock::prelude::*;
use std::time::Duration;
use taskprice::config::toml_config::{GenerationConfig, RemoteConfig};
use taskprice::{
    EstimateSource, GeminiEstimator, LineItem, RemoteEstimationError, RemoteEstimator,
    RequestDescriptor, Urgency,
};

const MODEL_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn remote_config(server: &MockServer) -> RemoteConfig {
    RemoteConfig {
        endpoint: server.url("/v1beta"),
        ..RemoteConfig::default()
    }
}

fn gemini_estimator(server: &MockServer) -> GeminiEstimator {
    GeminiEstimator::new(&remote_config(server), GenerationConfig::default()).unwrap()
}

fn request() -> RequestDescriptor {
    RequestDescriptor::new("Print dokumen", "cetak 5 halaman", Urgency::Normal, 1, Some(1)).unwrap()
}

fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_well_formed_reply_round_trips() {
    let server = MockServer::start();
    let text = "Tentu! Berikut estimasinya:\n{\"basePrice\":15000,\"servicePrice\":10500,\"totalPrice\":25500,\"breakdown\":{\"items\":[{\"name\":\"Biaya dasar\",\"amount\":15000},{\"name\":\"Biaya jasa\",\"amount\":10500}]}}\nTerima kasih.";

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(MODEL_PATH)
            .query_param("key", "test-key")
            .body_contains("\"generationConfig\"")
            .body_contains("\"topK\":40")
            .body_contains("\"maxOutputTokens\":1024")
            .body_contains("Title: Print dokumen");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(gemini_reply(text));
    });

    let estimator = gemini_estimator(&server);
    let estimate = estimator.estimate_remote(&request(), "test-key").await.unwrap();

    api_mock.assert();
    assert_eq!(estimate.source, EstimateSource::Remote);
    assert_eq!(estimate.base_price, 15000);
    assert_eq!(estimate.service_price, 10500);
    assert_eq!(estimate.total_price, 25500);
    assert_eq!(
        estimate.breakdown.items(),
        &[
            LineItem::new("Biaya dasar", 15000),
            LineItem::new("Biaya jasa", 10500)
        ]
    );
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
    let server = MockServer::start();

    for status in [400u16, 403, 429, 500, 503] {
        let mut api_mock = server.mock(|when, then| {
            when.method(POST).path(MODEL_PATH);
            then.status(status).body("{\"error\":{\"message\":\"nope\"}}");
        });

        let estimator = gemini_estimator(&server);
        let err = estimator.estimate_remote(&request(), "k").await.unwrap_err();

        api_mock.assert();
        assert_eq!(err, RemoteEstimationError::HttpError { status });
        api_mock.delete();
    }
}

#[tokio::test]
async fn test_reply_without_candidates_is_malformed() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(200)
            .json_body(serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}}));
    });

    let estimator = gemini_estimator(&server);
    let err = estimator.estimate_remote(&request(), "k").await.unwrap_err();

    assert!(matches!(err, RemoteEstimationError::MalformedBody(_)));
}

#[tokio::test]
async fn test_reply_missing_fields_is_schema_violation() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(200)
            .json_body(gemini_reply("{\"price\": 20000, \"currency\": \"IDR\"}"));
    });

    let estimator = gemini_estimator(&server);
    let err = estimator.estimate_remote(&request(), "k").await.unwrap_err();

    assert!(matches!(err, RemoteEstimationError::SchemaViolation(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_network_failure() {
    let config = RemoteConfig {
        endpoint: "http://127.0.0.1:1/v1beta".to_string(),
        timeout_seconds: 2,
        ..RemoteConfig::default()
    };

    let estimator = GeminiEstimator::new(&config, GenerationConfig::default()).unwrap();
    let err = estimator
        .estimate_remote(&request(), "secret-key")
        .await
        .unwrap_err();

    match err {
        RemoteEstimationError::NetworkFailure(message) => {
            assert!(!message.contains("secret-key"));
        }
        other => panic!("expected network failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_service_times_out_as_network_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(MODEL_PATH);
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(gemini_reply("{}"));
    });

    let config = RemoteConfig {
        timeout_seconds: 1,
        ..remote_config(&server)
    };
    let estimator = GeminiEstimator::new(&config, GenerationConfig::default()).unwrap();
    let err = estimator.estimate_remote(&request(), "k").await.unwrap_err();

    assert!(matches!(err, RemoteEstimationError::NetworkFailure(_)));
}

#[tokio::test]
async fn test_custom_model_and_generation_settings_are_sent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-1.5-pro:generateContent")
            .body_contains("\"temperature\":0.2")
            .body_contains("\"topK\":8");
        then.status(200).json_body(gemini_reply(
            "{\"basePrice\":5000,\"servicePrice\":7000,\"totalPrice\":12000,\"breakdown\":{\"items\":[{\"name\":\"Biaya dasar\",\"amount\":5000},{\"name\":\"Biaya jasa\",\"amount\":7000}]}}",
        ));
    });

    let config = RemoteConfig {
        model: "gemini-1.5-pro".to_string(),
        ..remote_config(&server)
    };
    let generation = GenerationConfig {
        temperature: 0.2,
        top_k: 8,
        ..GenerationConfig::default()
    };

    let estimator = GeminiEstimator::new(&config, generation).unwrap();
    let estimate = estimator.estimate_remote(&request(), "k").await.unwrap();

    api_mock.assert();
    assert_eq!(estimate.total_price, 12000);
}
