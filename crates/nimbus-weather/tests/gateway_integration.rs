//! Integration tests for the OpenWeatherMap gateway, city search, and location
//! resolver using wiremock.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use nimbus_core::{GeoDbConfig, Notifier};
use nimbus_weather::city_search::CitySearch;
use nimbus_weather::{
    FixedPositionSource, LocationError, LocationQuery, LocationResolver, OpenWeatherGateway,
    RetryConfig, Unit, UnavailablePositionSource, WeatherApi, WeatherError,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNotifier {
    errors: Mutex<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn success(&self, _title: &str, _message: &str) {}

    fn error(&self, title: &str, message: &str) {
        self.errors.lock().push((title.to_string(), message.to_string()));
    }

    fn info(&self, _title: &str, _message: &str) {}
}

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lat": 59.91, "lon": 10.75},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {
            "temp": 7.4, "feels_like": 5.1, "temp_min": 6.0, "temp_max": 8.2,
            "pressure": 1009, "humidity": 87
        },
        "visibility": 9000,
        "wind": {"speed": 4.6, "deg": 200},
        "clouds": {"all": 90},
        "rain": {"1h": 0.6},
        "dt": 1710000000,
        "sys": {"country": "NO", "sunrise": 1709980000, "sunset": 1710020000},
        "timezone": 3600,
        "id": 3143244,
        "name": name
    })
}

fn forecast_body() -> serde_json::Value {
    let list: Vec<serde_json::Value> = (0..4)
        .map(|i| {
            serde_json::json!({
                "dt": 1710000000 + i * 10800,
                "main": {
                    "temp": 5.0 + i as f64, "feels_like": 4.0, "temp_min": 4.0,
                    "temp_max": 9.0, "pressure": 1010, "humidity": 80
                },
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
                "wind": {"speed": 2.0, "deg": 90},
                "pop": 0.1,
                "dt_txt": "2024-03-09 16:00:00"
            })
        })
        .collect();

    serde_json::json!({
        "list": list,
        "city": {
            "id": 3143244, "name": "Oslo", "country": "NO",
            "coord": {"lat": 59.91, "lon": 10.75}, "timezone": 3600
        }
    })
}

fn gateway(server: &MockServer) -> OpenWeatherGateway {
    OpenWeatherGateway::new(&server.uri(), "test-key", Duration::from_secs(2))
        .unwrap()
        .with_retry(RetryConfig::new(2, 0))
}

#[tokio::test]
async fn test_fetch_current_parses_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Oslo"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Oslo")))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = gateway(&server)
        .fetch_current(&LocationQuery::city("  Oslo "), Unit::Metric)
        .await
        .unwrap();

    assert_eq!(snapshot.city_name, "Oslo");
    assert_eq!(snapshot.country, "NO");
    assert_eq!(snapshot.temperature.current, 7.4);
    assert_eq!(snapshot.humidity, 87);
    assert_eq!(snapshot.precipitation, Some(0.6));
    assert_eq!(snapshot.conditions.main, "Rain");
    assert_eq!(snapshot.unit, Unit::Metric);
}

#[tokio::test]
async fn test_fetch_forecast_by_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "59.91"))
        .and(query_param("lon", "10.75"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let series = gateway(&server)
        .fetch_forecast(&LocationQuery::coords(59.91, 10.75), Unit::Imperial)
        .await
        .unwrap();

    assert_eq!(series.city.name, "Oslo");
    assert_eq!(series.city.timezone_offset_secs, 3600);
    assert_eq!(series.entries.len(), 4);
    assert_eq!(series.entries[3].temperature.current, 8.0);
    assert_eq!(series.unit, Unit::Imperial);
}

#[tokio::test]
async fn test_not_found_is_retried_then_translated_and_notified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let gw = gateway(&server).with_notifier(notifier.clone());

    let err = gw
        .fetch_current(&LocationQuery::city("Atlantis"), Unit::Metric)
        .await
        .unwrap_err();

    assert!(err.is_api_error());
    assert_eq!(err.to_string(), "City not found");

    let errors = notifier.errors.lock();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0], ("API Error".to_string(), "City not found".to_string()));
}

#[tokio::test]
async fn test_unlisted_status_uses_fallback_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&server)
        .await;

    let err = gateway(&server)
        .with_retry(RetryConfig::none())
        .fetch_forecast(&LocationQuery::city("Oslo"), Unit::Metric)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Unable to fetch weather forecast for Oslo");
}

#[tokio::test]
async fn test_recovers_after_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Oslo")))
        .mount(&server)
        .await;

    let snapshot = gateway(&server)
        .fetch_current(&LocationQuery::city("Oslo"), Unit::Metric)
        .await
        .unwrap();
    assert_eq!(snapshot.city_name, "Oslo");
}

#[tokio::test]
async fn test_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Oslo"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let gw = OpenWeatherGateway::new(&server.uri(), "k", Duration::from_millis(100))
        .unwrap()
        .with_retry(RetryConfig::none());

    let err = gw
        .fetch_current(&LocationQuery::city("Oslo"), Unit::Metric)
        .await
        .unwrap_err();
    assert_eq!(err, WeatherError::Timeout);
    assert!(!err.is_api_error());
}

#[tokio::test]
async fn test_resolver_uses_gateway_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "59.91"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Oslo")))
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(
        Arc::new(FixedPositionSource::new(59.91, 10.75)),
        Arc::new(gateway(&server)),
    );

    let result = resolver.get_current_location().await.unwrap();
    assert_eq!(result.city_name.as_deref(), Some("Oslo"));
    assert_eq!(result.position.latitude, 59.91);
}

#[tokio::test]
async fn test_resolver_falls_back_to_region_table() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let resolver = LocationResolver::new(
        Arc::new(FixedPositionSource::new(40.71, -74.0)),
        Arc::new(gateway(&server).with_retry(RetryConfig::none())),
    );

    let result = resolver.get_current_location().await.unwrap();
    assert_eq!(result.city_name.as_deref(), Some("New York"));
}

#[tokio::test]
async fn test_resolver_without_capability() {
    let server = MockServer::start().await;
    let resolver = LocationResolver::new(Arc::new(UnavailablePositionSource), Arc::new(gateway(&server)));

    assert!(!resolver.is_available());
    assert_eq!(
        resolver.get_current_location().await.unwrap_err(),
        LocationError::Unsupported
    );
}

#[tokio::test]
async fn test_city_search_calls_geodb() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/geo/cities"))
        .and(query_param("namePrefix", "Ber"))
        .and(query_param("limit", "5"))
        .and(query_param("sort", "-population"))
        .and(header("X-RapidAPI-Key", "real-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": 42, "name": "Bern", "country": "Switzerland", "countryCode": "CH",
                "region": "Bern", "latitude": 46.95, "longitude": 7.44
            }],
            "metadata": {"currentOffset": 0, "totalCount": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let search = CitySearch::new(GeoDbConfig {
        api_key: "real-key".into(),
        base_url: format!("{}/v1/geo", server.uri()),
        host: "geo.test".into(),
    });

    let results = search.search("Ber", 5).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Bern");
    assert_eq!(results[0].country_code, "CH");
}

#[tokio::test]
async fn test_city_search_falls_back_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let search = CitySearch::new(GeoDbConfig {
        api_key: "real-key".into(),
        base_url: server.uri(),
        host: "geo.test".into(),
    });

    let results = search.search("Berlin", 8).await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].country, "Germany");
}
