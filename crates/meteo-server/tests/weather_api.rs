//! Integration tests for the HTTP routes, with Open-Meteo mocked by wiremock.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use meteo_core::Config;
use meteo_server::handlers::WeatherResponse;
use meteo_server::{router, AppState};
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "integration-test-token";

fn app_for(mock_server: &MockServer) -> Router {
    app_with(mock_server, |_| {})
}

fn app_with(mock_server: &MockServer, tweak: impl FnOnce(&mut Config)) -> Router {
    let mut config = Config::default();
    config.server.api_token = TOKEN.to_string();
    config.weather.geocoding_url = format!("{}/v1/search", mock_server.uri());
    config.weather.archive_url = format!("{}/v1/archive", mock_server.uri());
    tweak(&mut config);
    router(AppState::new(config).unwrap())
}

fn weather_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/weather/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn valid_body() -> serde_json::Value {
    serde_json::json!({
        "token": TOKEN,
        "requester_name": "Jane Doe",
        "location": "Kyiv, Ukraine",
        "date": "2024-02-29"
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

async fn mount_kyiv(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Kyiv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"name": "Kyiv", "latitude": 50.45466, "longitude": 30.5238, "elevation": 187.0,
                 "country": "Ukraine", "country_code": "UA"}
            ]
        })))
        .mount(mock_server)
        .await;
}

async fn mount_archive(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .and(query_param("start_date", "2024-02-29"))
        .and(query_param("end_date", "2024-02-29"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 50.5,
            "longitude": 30.5,
            "elevation": 187.0,
            "timezone": "Europe/Kyiv",
            "daily_units": {"time": "iso8601", "temperature_2m_max": "°C"},
            "daily": {"time": ["2024-02-29"], "temperature_2m_max": [6.3]}
        })))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_home_page() {
    let mock_server = MockServer::start().await;
    let app = app_for(&mock_server);

    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("https://open-meteo.com/"));
}

#[tokio::test]
async fn test_weather_success() {
    let mock_server = MockServer::start().await;
    mount_kyiv(&mock_server).await;
    mount_archive(&mock_server).await;

    let (status, body) = send(app_for(&mock_server), weather_request(valid_body())).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let response: WeatherResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.requester_name, "Jane Doe");
    assert_eq!(response.location, "Kyiv, Ukraine");
    assert_eq!(response.country_code.as_deref(), Some("UA"));
    assert_eq!(response.date, "2024-02-29");
    assert_eq!(response.weather.timezone.as_deref(), Some("Europe/Kyiv"));
    assert_eq!(response.weather.daily.unwrap()["temperature_2m_max"][0], 6.3);
}

#[tokio::test]
async fn test_route_without_trailing_slash() {
    let mock_server = MockServer::start().await;
    mount_kyiv(&mock_server).await;
    mount_archive(&mock_server).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/weather")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(valid_body().to_string()))
        .unwrap();

    let (status, _) = send(app_for(&mock_server), request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token() {
    let mock_server = MockServer::start().await;
    let mut body = valid_body();
    body.as_object_mut().unwrap().remove("token");

    let (status, body) = send(app_for(&mock_server), weather_request(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "token is required");
}

#[tokio::test]
async fn test_wrong_token() {
    let mock_server = MockServer::start().await;
    let mut body = valid_body();
    body["token"] = serde_json::json!("guess");

    let (status, body) = send(app_for(&mock_server), weather_request(body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "wrong API token");
}

#[tokio::test]
async fn test_missing_fields() {
    let mock_server = MockServer::start().await;

    for field in ["requester_name", "location", "date"] {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove(field);

        let (status, body) = send(app_for(&mock_server), weather_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{field}");
        assert_eq!(body["message"], format!("{field} is required"));
    }
}

#[tokio::test]
async fn test_location_needs_country() {
    let mock_server = MockServer::start().await;
    let mut body = valid_body();
    body["location"] = serde_json::json!("Kyiv");

    let (status, body) = send(app_for(&mock_server), weather_request(body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "location must contain city and country");
}

#[tokio::test]
async fn test_invalid_date_never_reaches_upstream() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    for date in ["2023-02-29", "1958-01-01", "abcd-01-01", "2024-01", "2024-04-31"] {
        let mut body = valid_body();
        body["date"] = serde_json::json!(date);

        let (status, body) = send(app_for(&mock_server), weather_request(body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{date}");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn test_non_numeric_date_message_echoes_segment() {
    let mock_server = MockServer::start().await;
    let mut body = valid_body();
    body["date"] = serde_json::json!("2024-0x-01");

    let (status, body) = send(app_for(&mock_server), weather_request(body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "0x in 2024-0x-01 is not a number");
}

#[tokio::test]
async fn test_unknown_city() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.3
        })))
        .mount(&mock_server)
        .await;

    let mut body = valid_body();
    body["location"] = serde_json::json!("Atlantis, Greece");

    let (status, body) = send(app_for(&mock_server), weather_request(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "information for the city Atlantis, Greece not found"
    );
}

#[tokio::test]
async fn test_archive_failure_is_bad_gateway() {
    let mock_server = MockServer::start().await;
    mount_kyiv(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/v1/archive"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": true,
            "reason": "Cannot initialize WeatherVariable from invalid String value"
        })))
        .mount(&mock_server)
        .await;

    let (status, body) = send(app_for(&mock_server), weather_request(valid_body())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("invalid String value"));
}

#[tokio::test]
async fn test_malformed_json_body() {
    let mock_server = MockServer::start().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/weather/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(app_for(&mock_server), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("request body must be a JSON object"));
}

#[tokio::test]
async fn test_slow_geocoder_is_gateway_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let app = app_with(&mock_server, |config| {
        config.weather.request_timeout_secs = 1;
    });

    let (status, body) = send(app, weather_request(valid_body())).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["message"], "weather service timed out");
}

#[tokio::test]
async fn test_slow_request_hits_server_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let app = app_with(&mock_server, |config| {
        config.server.request_timeout_secs = 1;
    });

    let (status, _) = send(app, weather_request(valid_body())).await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
}
