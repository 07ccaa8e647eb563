//! Integration tests for the OpenStreetMap clients (wiremock-based)

use std::time::Duration;

use domain::Coordinate;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_osm::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, OsrmConfig,
    OsrmRoutingClient, RoutingClient, RoutingError,
};

fn nominatim_for_mock(base_url: &str) -> NominatimConfig {
    NominatimConfig {
        base_url: base_url.to_string(),
        ..NominatimConfig::for_testing()
    }
}

fn osrm_for_mock(base_url: &str) -> OsrmConfig {
    OsrmConfig {
        base_url: base_url.to_string(),
        ..OsrmConfig::for_testing()
    }
}

/// Serve 200 headers and the first body byte, then stall
async fn stalled_body_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n[",
                    )
                    .await;
                tokio::time::sleep(Duration::from_secs(30)).await;
            });
        }
    });
    format!("http://{addr}")
}

fn waypoints() -> Vec<Coordinate> {
    vec![
        Coordinate::new(-23.5505, -46.6333).unwrap(),
        Coordinate::new(-23.5613, -46.6565).unwrap(),
        Coordinate::new(-23.5874, -46.6576).unwrap(),
    ]
}

const fn sample_route_json() -> &'static str {
    r#"{
        "code": "Ok",
        "routes": [{
            "geometry": {
                "type": "LineString",
                "coordinates": [[-46.6333, -23.5505], [-46.6450, -23.5560], [-46.6565, -23.5613], [-46.6576, -23.5874]]
            },
            "distance": 6234.7,
            "duration": 1021.3,
            "weight": 1021.3,
            "legs": []
        }],
        "waypoints": [
            {"location": [-46.6333, -23.5505], "name": "Praça da Sé"},
            {"location": [-46.6565, -23.5613], "name": "Avenida Paulista"},
            {"location": [-46.6576, -23.5874], "name": "Rua Manoel da Nóbrega"}
        ]
    }"#
}

// ============================================================================
// Nominatim
// ============================================================================

#[tokio::test]
async fn test_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Avenida Paulista, 1578, São Paulo - SP"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(query_param("countrycodes", "br"))
        .and(header("user-agent", "BusManager/1.0 (Transporte Escolar)"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"lat": "-23.5613", "lon": "-46.6565", "display_name": "Avenida Paulista"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let coordinate = client
        .geocode("Avenida Paulista, 1578, São Paulo - SP")
        .await
        .unwrap();

    assert!((coordinate.latitude() + 23.5613).abs() < 1e-9);
    assert!((coordinate.longitude() + 46.6565).abs() < 1e-9);
}

#[tokio::test]
async fn test_geocode_wrapped_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"results": [{"lat": "-22.9068", "lon": "-43.1729"}]}"#),
        )
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let coordinate = client.geocode("Rua do Ouvidor, 50, Rio de Janeiro").await.unwrap();
    assert!((coordinate.latitude() + 22.9068).abs() < 1e-9);
}

#[tokio::test]
async fn test_geocode_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Rua Que Não Existe, 0, Lugar Nenhum").await.unwrap_err();
    assert!(matches!(err, GeocodingError::AddressNotFound(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_geocode_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Rua A, 1, São Paulo").await.unwrap_err();
    assert!(matches!(err, GeocodingError::RateLimitExceeded));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_geocode_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Rua A, 1, São Paulo").await.unwrap_err();
    assert!(matches!(err, GeocodingError::RequestFailed(_)));
}

#[tokio::test]
async fn test_geocode_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Rua A, 1, São Paulo").await.unwrap_err();
    assert!(matches!(err, GeocodingError::ParseError(_)));
}

#[tokio::test]
async fn test_geocode_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = NominatimConfig {
        timeout_secs: 1,
        ..nominatim_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();
    let err = client.geocode("Rua A, 1, São Paulo").await.unwrap_err();
    assert!(matches!(err, GeocodingError::Timeout));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_geocode_stalled_body_times_out() {
    let base_url = stalled_body_server().await;
    let config = NominatimConfig {
        timeout_secs: 1,
        ..nominatim_for_mock(&base_url)
    };

    let client = NominatimGeocodingClient::new(&config).unwrap();
    let err = client.geocode("Rua A, 1, São Paulo").await.unwrap_err();
    assert!(matches!(err, GeocodingError::Timeout), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_geocode_empty_query_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    assert!(client.geocode("   ").await.is_err());
}

#[tokio::test]
async fn test_geocode_cache_hit_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"lat": "-23.5", "lon": "-46.6"}]"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        cache_ttl_hours: 1,
        ..nominatim_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();

    let first = client.geocode("Rua A, 1, São Paulo").await.unwrap();
    let second = client.geocode("RUA A, 1, SÃO PAULO").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_geocode_without_country_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"lat": "-23.5", "lon": "-46.6"}]"#),
        )
        .mount(&server)
        .await;

    let config = NominatimConfig {
        country_filter: String::new(),
        ..nominatim_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();
    client.geocode("Rua A, 1, São Paulo").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(
        !requests[0]
            .url
            .query_pairs()
            .any(|(key, _)| key == "countrycodes")
    );
}

// ============================================================================
// OSRM
// ============================================================================

#[tokio::test]
async fn test_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+;.+;.+$"))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .and(query_param("steps", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let route = client.route(&waypoints()).await.unwrap();

    assert_eq!(route.geometry.len(), 4);
    assert_eq!(route.geometry[0], [-46.6333, -23.5505]);
    assert!((route.distance_meters - 6234.7).abs() < 1e-9);
    assert!((route.duration_seconds - 1021.3).abs() < 1e-9);
    assert_eq!(route.waypoints.len(), 3);
    assert_eq!(route.waypoints[1].name, "Avenida Paulista");
}

#[tokio::test]
async fn test_route_sends_lon_lat_pairs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    client.route(&waypoints()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.path().starts_with("/route/v1/driving/-46.6333,-23.5505;"));
}

#[tokio::test]
async fn test_route_no_route_with_http_400() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            r#"{"code": "NoRoute", "message": "Impossible route between points"}"#,
        ))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client.route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, RoutingError::NoRoute { ref code, .. } if code == "NoRoute"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_route_empty_routes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code": "Ok", "routes": []}"#))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client.route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, RoutingError::NoRoute { .. }));
}

#[tokio::test]
async fn test_route_bad_request_without_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client.route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, RoutingError::RequestFailed(_)));
}

#[tokio::test]
async fn test_route_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client.route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, RoutingError::RequestFailed(_)));
}

#[tokio::test]
async fn test_route_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client.route(&waypoints()).await.unwrap_err();
    assert!(matches!(
        err,
        RoutingError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_route_slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sample_route_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = OsrmConfig {
        timeout_secs: 1,
        ..osrm_for_mock(&server.uri())
    };
    let client = OsrmRoutingClient::new(&config).unwrap();
    let err = client.route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, RoutingError::Timeout { timeout_secs: 1 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_route_stalled_body_times_out() {
    let base_url = stalled_body_server().await;
    let config = OsrmConfig {
        timeout_secs: 1,
        ..osrm_for_mock(&base_url)
    };

    let client = OsrmRoutingClient::new(&config).unwrap();
    let err = client.route(&waypoints()).await.unwrap_err();
    assert!(
        matches!(err, RoutingError::Timeout { timeout_secs: 1 }),
        "got {err:?}"
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_route_single_waypoint_skips_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(0)
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client.route(&waypoints()[..1]).await.unwrap_err();
    assert!(matches!(err, RoutingError::InvalidWaypoints(_)));
}
