use actix_multipart::form::MultipartForm;
use actix_web::{Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::forms::availability::{BlockDatesForm, UploadAvailabilityForm};
use crate::forms::quotes::AvailabilityQuery;
use crate::repository::DieselRepository;
use crate::routes::{created, ok, service_error};
use crate::services::availability;

#[get("/accommodations/{id}/availability")]
pub async fn check_availability(
    path: web::Path<i32>,
    params: web::Query<AvailabilityQuery>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match availability::check_availability(repo.get_ref(), path.into_inner(), params.into_inner()) {
        Ok(check) => ok("Availability", check),
        Err(err) => service_error(err, "check availability"),
    }
}

#[post("/accommodations/{id}/availability/blocks")]
pub async fn block_dates(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<BlockDatesForm>,
) -> impl Responder {
    match availability::block_dates(repo.get_ref(), &user, path.into_inner(), form.into_inner()) {
        Ok(count) => created("Dates blocked", json!({ "created": count })),
        Err(err) => service_error(err, "block dates"),
    }
}

#[post("/accommodations/{id}/availability/upload")]
pub async fn upload_availability(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    MultipartForm(form): MultipartForm<UploadAvailabilityForm>,
) -> impl Responder {
    match availability::import_availability(repo.get_ref(), &user, path.into_inner(), form) {
        Ok(count) => created("Availability imported", json!({ "created": count })),
        Err(err) => service_error(err, "import availability"),
    }
}
