// Integration tests for CEP Weather
//
// Both services are exercised end-to-end through actix's test harness, with
// mockito standing in for the external providers (and, for the gateway, for
// the downstream weather-lookup service).

use actix_web::{test, web, App};
use mockito::Matcher;
use std::time::Duration;

use cep_weather::config::TelemetrySettings;
use cep_weather::routes::gateway::{self, GatewayState};
use cep_weather::routes::lookup::{self, LookupState};
use cep_weather::services::{AddressClient, Fetcher, WeatherClient};
use cep_weather::telemetry;

fn lookup_state(viacep_url: String, weather_url: String) -> LookupState {
    let fetcher = Fetcher::new(Duration::from_secs(5));
    LookupState {
        address: AddressClient::new(viacep_url, fetcher.clone()),
        weather: WeatherClient::new(weather_url, "test-key".to_string(), fetcher),
    }
}

fn gateway_state(downstream_url: String) -> GatewayState {
    GatewayState {
        fetcher: Fetcher::new(Duration::from_secs(5)),
        downstream_url,
    }
}

/// Install the W3C propagator without an exporter, so injection and
/// extraction behave as in production.
fn init_propagator() {
    let settings = TelemetrySettings {
        enabled: false,
        ..Default::default()
    };
    telemetry::init_tracing("test", &settings).unwrap();
}

#[actix_web::test]
async fn test_lookup_end_to_end() {
    let mut viacep = mockito::Server::new_async().await;
    let mut weather = mockito::Server::new_async().await;

    let address_mock = viacep
        .mock("GET", "/ws/01001000/json")
        .with_status(200)
        .with_body(r#"{"localidade":"São Paulo","uf":"SP"}"#)
        .create_async()
        .await;

    // The city reaches the weather provider with diacritics stripped.
    let weather_mock = weather
        .mock("GET", "/current.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "test-key".into()),
            Matcher::UrlEncoded("q".into(), "Sao Paulo - SP - Brazil".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"current":{"temp_c":25.0,"temp_f":77.0}}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lookup_state(viacep.url(), weather.url())))
            .configure(lookup::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/01001-000").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["city"], "Sao Paulo/SP");
    assert_eq!(body["temp_C"], 25.0);
    assert_eq!(body["temp_F"], 77.0);
    assert_eq!(body["temp_K"], 298.15);

    address_mock.assert_async().await;
    weather_mock.assert_async().await;
}

#[actix_web::test]
async fn test_lookup_invalid_cep_makes_no_provider_calls() {
    let mut viacep = mockito::Server::new_async().await;
    let mut weather = mockito::Server::new_async().await;

    let address_mock = viacep.mock("GET", Matcher::Any).expect(0).create_async().await;
    let weather_mock = weather.mock("GET", Matcher::Any).expect(0).create_async().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lookup_state(viacep.url(), weather.url())))
            .configure(lookup::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/1234").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 422);
    assert_eq!(test::read_body(resp).await, "invalid zipcode");

    address_mock.assert_async().await;
    weather_mock.assert_async().await;
}

#[actix_web::test]
async fn test_lookup_unknown_cep_skips_weather_provider() {
    let mut viacep = mockito::Server::new_async().await;
    let mut weather = mockito::Server::new_async().await;

    let address_mock = viacep
        .mock("GET", "/ws/99999999/json")
        .with_status(200)
        .with_body(r#"{"erro":"true"}"#)
        .create_async()
        .await;
    let weather_mock = weather.mock("GET", Matcher::Any).expect(0).create_async().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lookup_state(viacep.url(), weather.url())))
            .configure(lookup::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/99999999").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    assert_eq!(test::read_body(resp).await, "can not find zipcode");

    address_mock.assert_async().await;
    weather_mock.assert_async().await;
}

#[actix_web::test]
async fn test_lookup_address_parse_failure_maps_to_500() {
    let mut viacep = mockito::Server::new_async().await;
    let mut weather = mockito::Server::new_async().await;

    let address_mock = viacep
        .mock("GET", "/ws/01001000/json")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;
    let weather_mock = weather.mock("GET", Matcher::Any).expect(0).create_async().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lookup_state(viacep.url(), weather.url())))
            .configure(lookup::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/01001000").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    assert_eq!(test::read_body(resp).await, "Error fetching zipcode data");

    address_mock.assert_async().await;
    weather_mock.assert_async().await;
}

#[actix_web::test]
async fn test_lookup_weather_failure_maps_to_500() {
    let mut viacep = mockito::Server::new_async().await;
    let mut weather = mockito::Server::new_async().await;

    let address_mock = viacep
        .mock("GET", "/ws/01001000/json")
        .with_status(200)
        .with_body(r#"{"localidade":"São Paulo","uf":"SP"}"#)
        .create_async()
        .await;
    let weather_mock = weather
        .mock("GET", "/current.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("oops")
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(lookup_state(viacep.url(), weather.url())))
            .configure(lookup::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/01001000").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    assert_eq!(test::read_body(resp).await, "internal server error");

    address_mock.assert_async().await;
    weather_mock.assert_async().await;
}

#[actix_web::test]
async fn test_gateway_missing_cep_field() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(gateway_state("http://127.0.0.1:1".to_string())))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/")
        .set_json(serde_json::json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 422);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["statuscode"], 422);
    assert_eq!(body["message"], "cep field is missing");
}

#[actix_web::test]
async fn test_gateway_invalid_cep_skips_forward() {
    let mut downstream = mockito::Server::new_async().await;
    let forward_mock = downstream.mock("GET", Matcher::Any).expect(0).create_async().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(gateway_state(downstream.url())))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/")
        .set_json(serde_json::json!({"cep": "1234"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 422);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["statuscode"], 422);
    assert_eq!(body["message"], "invalid zipcode");

    forward_mock.assert_async().await;
}

#[actix_web::test]
async fn test_gateway_relays_downstream_status_and_body() {
    let mut downstream = mockito::Server::new_async().await;
    let forward_mock = downstream
        .mock("GET", "/99999999")
        .with_status(404)
        .with_body("can not find zipcode")
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(gateway_state(downstream.url())))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/")
        .set_json(serde_json::json!({"cep": "99999-999"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // The downstream response passes through untouched.
    assert_eq!(resp.status(), 404);
    assert_eq!(test::read_body(resp).await, "can not find zipcode");

    forward_mock.assert_async().await;
}

#[actix_web::test]
async fn test_gateway_propagates_trace_context() {
    init_propagator();

    let mut downstream = mockito::Server::new_async().await;
    // The downstream hop must see the same trace id the gateway received.
    let forward_mock = downstream
        .mock("GET", "/01001000")
        .match_header(
            "traceparent",
            Matcher::Regex("0af7651916cd43dd8448eb211c80319c".to_string()),
        )
        .with_status(200)
        .with_body(r#"{"city":"Sao Paulo/SP","temp_C":25.0,"temp_F":77.0,"temp_K":298.15}"#)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(gateway_state(downstream.url())))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header((
            "traceparent",
            "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01",
        ))
        .set_json(serde_json::json!({"cep": "01001-000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["city"], "Sao Paulo/SP");

    forward_mock.assert_async().await;
}

#[actix_web::test]
async fn test_gateway_maps_transport_failure_to_500() {
    // Nothing listens on port 1; the forward fails at the transport layer.
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(gateway_state("http://127.0.0.1:1".to_string())))
            .configure(gateway::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/")
        .set_json(serde_json::json!({"cep": "01001-000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["statuscode"], 500);
    assert_eq!(body["message"], "internal server error");
}
