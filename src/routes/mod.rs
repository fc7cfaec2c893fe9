//! JSON API handlers mounted under `/api/v1`.
//!
//! Every response uses the same envelope: `{success, message, data, meta}`
//! on success and `{success: false, message, errors}` on failure.

use actix_web::dev::ServiceResponse;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{HttpRequest, HttpResponse, web};
use pushkind_common::services::errors::ServiceError as CommonServiceError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::services::ServiceError;

pub mod accommodations;
pub mod availability;
pub mod bookings;
pub mod quotes;

/// Register every API handler on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .wrap(ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, unauthorized_envelope))
            .service(accommodations::create_accommodation)
            .service(accommodations::set_base_price)
            .service(accommodations::add_pricing_period)
            .service(accommodations::add_fee)
            .service(accommodations::add_tax)
            .service(accommodations::add_tax_exemption)
            .service(quotes::quote_price)
            .service(availability::check_availability)
            .service(availability::block_dates)
            .service(availability::upload_availability)
            .service(bookings::create_booking)
            .service(bookings::list_bookings)
            .service(bookings::show_booking)
            .service(bookings::confirm_booking)
            .service(bookings::decline_booking)
            .service(bookings::cancel_booking)
            .service(bookings::mark_no_show)
            .service(bookings::record_payment),
    );
}

#[derive(Debug, Serialize)]
struct Envelope<'a, T: Serialize> {
    success: bool,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Value>,
}

fn respond<T: Serialize>(
    status: StatusCode,
    message: &str,
    data: T,
    meta: Option<Value>,
) -> HttpResponse {
    HttpResponse::build(status).json(Envelope {
        success: true,
        message,
        data: Some(data),
        meta,
        errors: None,
    })
}

pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::OK, message, data, None)
}

pub fn created<T: Serialize>(message: &str, data: T) -> HttpResponse {
    respond(StatusCode::CREATED, message, data, None)
}

/// Items go to `data`, paging counters to `meta`.
pub fn paginated<T: Serialize>(message: &str, items: T, meta: Value) -> HttpResponse {
    respond(StatusCode::OK, message, items, Some(meta))
}

pub fn failure(status: StatusCode, message: &str, errors: Option<Value>) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::<()> {
        success: false,
        message,
        data: None,
        meta: None,
        errors,
    })
}

/// Map a service failure to its HTTP status. `action` names what failed in
/// the server log.
pub fn service_error(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Common(CommonServiceError::Unauthorized) => {
            failure(StatusCode::UNAUTHORIZED, "Sign in required", None)
        }
        ServiceError::Common(CommonServiceError::NotFound) => {
            failure(StatusCode::NOT_FOUND, "Not found", None)
        }
        ServiceError::Common(CommonServiceError::Conflict) => {
            failure(StatusCode::CONFLICT, "Conflict", None)
        }
        ServiceError::Common(CommonServiceError::Form(message)) => {
            failure(StatusCode::UNPROCESSABLE_ENTITY, &message, None)
        }
        ServiceError::Common(other) => {
            log::error!("Failed to {action}: {other}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
        }
        ServiceError::Forbidden => failure(StatusCode::FORBIDDEN, "Not allowed", None),
        ServiceError::Conflict(message) => failure(StatusCode::CONFLICT, &message, None),
        ServiceError::Validation(errors) => failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Validation failed",
            serde_json::to_value(&errors).ok(),
        ),
        ServiceError::Pricing(err) => {
            failure(StatusCode::UNPROCESSABLE_ENTITY, &err.to_string(), None)
        }
        ServiceError::Internal(message) => {
            log::error!("Failed to {action}: {message}");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
        }
    }
}

/// Rejections from the session extractor get the error envelope.
pub fn unauthorized_envelope<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();
    let response = failure(StatusCode::UNAUTHORIZED, "Sign in required", None);
    let res = ServiceResponse::new(req, response).map_into_right_body();
    Ok(ErrorHandlerResponse::Response(res))
}

/// Body of an action whose payload is optional. An empty body means the
/// defaults; anything else has to be a valid JSON document.
pub fn optional_json<T>(body: &[u8]) -> Result<T, HttpResponse>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|err| {
        failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("Invalid request body: {err}"),
            None,
        )
    })
}

/// Malformed JSON bodies get the error envelope instead of actix's plain text.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = failure(StatusCode::BAD_REQUEST, &message, None);
    actix_web::error::InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = failure(StatusCode::BAD_REQUEST, &message, None);
    actix_web::error::InternalError::from_response(err, response).into()
}
