//! Integration tests for HttpFetcher using wiremock.
//!
//! The synthesized URL always points at OpenWeatherMap, so these tests hand the
//! fetcher a URL on the mock server with the same query shape instead.

use weather_core::{Arg, ArgumentModel, FetchOutcome, HttpFetcher, WeatherFetcher, format_weather};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn weather_url(server: &MockServer) -> String {
    format!("{}/data/2.5/weather?q=London&APPID=test", server.uri())
}

async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(serde_json::json!({"test": 0})),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unauthorized() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 401).await;

    let outcome = HttpFetcher::new().fetch(&weather_url(&mock_server)).await.unwrap();
    assert_eq!(outcome, FetchOutcome::BadApiKey);
}

#[tokio::test]
async fn test_not_found() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 404).await;

    let outcome = HttpFetcher::new().fetch(&weather_url(&mock_server)).await.unwrap();
    assert_eq!(outcome, FetchOutcome::LocationUnknown);
}

#[tokio::test]
async fn test_other_status_passed_through() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, 500).await;

    let outcome = HttpFetcher::new().fetch(&weather_url(&mock_server)).await.unwrap();
    assert_eq!(outcome, FetchOutcome::Unclassified(500));
}

#[tokio::test]
async fn test_success_feeds_formatter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("APPID", "test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timezone": 3600,
            "sys": {"sunrise": 1571192970, "sunset": 1571182970},
            "main": {"pressure": 1000, "humidity": 89, "temp_max": 300, "temp_min": 280},
            "clouds": {"all": 50},
            "wind": {"speed": 20, "deg": 75}
        })))
        .mount(&mock_server)
        .await;

    let outcome = HttpFetcher::new().fetch(&weather_url(&mock_server)).await.unwrap();
    let FetchOutcome::Weather(body) = outcome else {
        panic!("expected weather body, got {outcome:?}");
    };

    let model = ArgumentModel::new()
        .with(Arg::Api, "test")
        .with(Arg::City, "London")
        .with(Arg::Temp, "celsius")
        .with(Arg::Wind, true)
        .with(Arg::Sunset, true)
        .with(Arg::Time, true);

    let text = format_weather(&body, &model).unwrap();
    assert_eq!(
        text,
        "The timezone is 1 hour past GMT.  \
         The sun sets at 23:42 GMT.  \
         The wind is moving at 72.0km/h, in a direction of 75 degrees.  \
         The temperature has a high of 26.9 and a low of 6.9 degrees celsius.  "
    );
}
