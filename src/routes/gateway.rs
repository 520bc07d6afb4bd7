use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse, Responder};
use opentelemetry::trace::TraceContextExt;

use crate::core::normalize_cep;
use crate::models::{CepRequest, ErrorBody};
use crate::services::Fetcher;
use crate::telemetry;

/// Application state shared across gateway handlers
#[derive(Clone)]
pub struct GatewayState {
    pub fetcher: Fetcher,
    pub downstream_url: String,
}

/// Configure the gateway routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .route("/", web::post().to(forward_cep));
}

/// Map malformed request bodies to the gateway's 422 wire format
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    error::InternalError::from_response(
        err,
        HttpResponse::UnprocessableEntity().json(ErrorBody::new(422, "invalid request body")),
    )
    .into()
}

/// CEP forwarding endpoint
///
/// POST /
///
/// Request body:
/// ```json
/// {
///   "cep": "01001-000"
/// }
/// ```
///
/// Validates the postal code before any network activity, then forwards the
/// normalized code to the weather-lookup service with the trace context
/// injected into the outbound headers, and relays that service's status and
/// body byte-for-byte.
async fn forward_cep(
    state: web::Data<GatewayState>,
    body: web::Json<CepRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if body.cep.is_empty() {
        return HttpResponse::UnprocessableEntity()
            .json(ErrorBody::new(422, "cep field is missing"));
    }

    let cep = match normalize_cep(&body.cep) {
        Ok(cep) => cep,
        Err(e) => {
            tracing::info!("Rejected postal code {:?}: {}", body.cep, e);
            return HttpResponse::UnprocessableEntity().json(ErrorBody::new(422, e.message));
        }
    };

    let cx = telemetry::request_context("request-gateway", http_req.headers());

    let url = format!("{}/{}", state.downstream_url.trim_end_matches('/'), cep);
    let result = state.fetcher.fetch(&cx, &url).await;

    cx.span().end();

    match result {
        Ok(fetched) => {
            let status = StatusCode::from_u16(fetched.status.as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status).body(fetched.body)
        }
        Err(e) => {
            tracing::error!("Forward to weather service failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorBody::new(500, "internal server error"))
        }
    }
}
