use actix_web::{web, HttpRequest, HttpResponse, Responder};
use opentelemetry::trace::TraceContextExt;
use opentelemetry::Context;

use crate::core::{normalize_cep, strip_diacritics};
use crate::models::WeatherReport;
use crate::services::{AddressClient, AddressError, WeatherClient};
use crate::telemetry;

/// Application state shared across lookup handlers
#[derive(Clone)]
pub struct LookupState {
    pub address: AddressClient,
    pub weather: WeatherClient,
}

/// Configure the weather-lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/{cep}", web::get().to(lookup_weather));
}

/// Weather lookup endpoint
///
/// GET /{cep}
///
/// Continues the trace propagated by the gateway (or starts a new root),
/// then runs the lookup chain: validate -> resolve address -> strip
/// diacritics -> resolve weather -> compose report. The span is ended
/// unconditionally once the response is composed.
async fn lookup_weather(
    state: web::Data<LookupState>,
    path: web::Path<String>,
    http_req: HttpRequest,
) -> impl Responder {
    let cx = telemetry::request_context("request-weather-service", http_req.headers());

    let response = resolve(&state, &cx, &path.into_inner()).await;

    cx.span().end();
    response
}

/// Run the lookup chain and map every failure to its wire status
///
/// This is the only place where failure kinds become status codes:
/// validation -> 422, provider not-found sentinel -> 404, address
/// transport/parse -> 500 "Error fetching zipcode data", weather
/// transport/parse -> 500 "internal server error".
async fn resolve(state: &LookupState, cx: &Context, raw_cep: &str) -> HttpResponse {
    let cep = match normalize_cep(raw_cep) {
        Ok(cep) => cep,
        Err(e) => {
            tracing::info!("Rejected postal code {:?}: {}", raw_cep, e);
            return HttpResponse::UnprocessableEntity().body("invalid zipcode");
        }
    };

    let address = match state.address.resolve(cx, &cep).await {
        Ok(record) => record,
        Err(AddressError::NotFound) => {
            tracing::info!("No address record for CEP {}", cep);
            return HttpResponse::NotFound().body("can not find zipcode");
        }
        Err(e) => {
            tracing::error!("Address lookup failed for {}: {}", cep, e);
            return HttpResponse::InternalServerError().body("Error fetching zipcode data");
        }
    };

    // The weather provider expects ASCII-ish query strings.
    let city = strip_diacritics(&address.localidade);
    let uf = address.uf;

    let weather = match state.weather.resolve(cx, &city, &uf).await {
        Ok(record) => record,
        Err(e) => {
            tracing::error!("Weather lookup failed for {}/{}: {}", city, uf, e);
            return HttpResponse::InternalServerError().body("internal server error");
        }
    };

    tracing::info!(
        "Resolved {} to {}/{} at {}C",
        cep,
        city,
        uf,
        weather.current.temp_c
    );

    HttpResponse::Ok().json(WeatherReport::new(&city, &uf, weather.current.temp_c))
}
