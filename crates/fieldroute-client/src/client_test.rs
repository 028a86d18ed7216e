use super::*;

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, 30).expect("client construction should not fail")
}

#[test]
fn endpoint_appends_below_bare_host() {
    let url = client("http://localhost:8000")
        .endpoint(&["routes"], &[])
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/routes");
}

#[test]
fn endpoint_keeps_path_prefix() {
    let url = client("https://routes.example.com/api/v1/")
        .endpoint(&["benchmark", "compare"], &[])
        .unwrap();
    assert_eq!(url.as_str(), "https://routes.example.com/api/v1/benchmark/compare");
}

#[test]
fn endpoint_trailing_empty_segment_adds_slash() {
    let url = client("http://localhost:8000").endpoint(&["reps", ""], &[]).unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/reps/");
}

#[test]
fn endpoint_encodes_query_pairs() {
    let url = client("http://localhost:8000")
        .endpoint(&["routes"], &[("skip", "10".to_string()), ("limit", "5".to_string())])
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/routes?skip=10&limit=5");
}

#[test]
fn endpoint_percent_encodes_identifiers() {
    let url = client("http://localhost:8000")
        .endpoint(&["routes", "a/b c"], &[])
        .unwrap();
    assert_eq!(url.as_str(), "http://localhost:8000/routes/a%2Fb%20c");
}

#[test]
fn new_rejects_relative_base_url() {
    let result = ApiClient::new("localhost", 30);
    assert!(
        matches!(result, Err(ApiError::InvalidUrl { .. })),
        "expected InvalidUrl, got: {result:?}"
    );
}

#[test]
fn from_config_applies_retry_settings() {
    let mut config = AppConfig::defaults();
    config.max_attempts = 4;
    config.retry_delay_ms = 10;
    let client = ApiClient::from_config(&config).unwrap();
    assert_eq!(client.retry_policy().max_attempts, 4);
    assert_eq!(client.retry_policy().delay, Duration::from_millis(10));
    assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
}

#[test]
fn decode_reports_context_on_shape_mismatch() {
    let err = decode::<Vec<String>>(r#"{"not":"a list"}"#, "/routes").unwrap_err();
    assert!(
        matches!(err, ApiError::Deserialize { ref context, .. } if context == "/routes"),
        "expected Deserialize(/routes), got: {err:?}"
    );
}
