use actix_web::{Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::forms::bookings::{BookingsQuery, CreateBookingForm, TransitionForm};
use crate::notifications::Notifier;
use crate::repository::DieselRepository;
use crate::routes::{created, ok, optional_json, paginated, service_error};
use crate::services::bookings;

#[post("/bookings")]
pub async fn create_booking(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<dyn Notifier>,
    form: web::Json<CreateBookingForm>,
) -> impl Responder {
    match bookings::create_booking(repo.get_ref(), notifier.get_ref(), &user, form.into_inner()) {
        Ok(booking) => created("Booking created", booking),
        Err(err) => service_error(err, "create booking"),
    }
}

/// Bookings made by the user, or with `role=host` those on their listings.
#[get("/bookings")]
pub async fn list_bookings(
    params: web::Query<BookingsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match bookings::list_bookings(repo.get_ref(), &user, params.into_inner()) {
        Ok(page) => paginated(
            "Bookings",
            page.bookings,
            json!({ "total": page.total, "per_page": page.per_page }),
        ),
        Err(err) => service_error(err, "list bookings"),
    }
}

#[get("/bookings/{id}")]
pub async fn show_booking(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match bookings::get_booking(repo.get_ref(), &user, path.into_inner()) {
        Ok(booking) => ok("Booking", booking),
        Err(err) => service_error(err, "load booking"),
    }
}

#[post("/bookings/{id}/confirm")]
pub async fn confirm_booking(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<dyn Notifier>,
) -> impl Responder {
    match bookings::confirm_booking(repo.get_ref(), notifier.get_ref(), &user, path.into_inner()) {
        Ok(booking) => ok("Booking confirmed", booking),
        Err(err) => service_error(err, "confirm booking"),
    }
}

#[post("/bookings/{id}/decline")]
pub async fn decline_booking(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<dyn Notifier>,
    body: web::Bytes,
) -> impl Responder {
    let form: TransitionForm = match optional_json(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };
    match bookings::decline_booking(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form,
    ) {
        Ok(booking) => ok("Booking declined", booking),
        Err(err) => service_error(err, "decline booking"),
    }
}

#[post("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<dyn Notifier>,
    body: web::Bytes,
) -> impl Responder {
    let form: TransitionForm = match optional_json(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };
    match bookings::cancel_booking(
        repo.get_ref(),
        notifier.get_ref(),
        &user,
        path.into_inner(),
        form,
    ) {
        Ok(booking) => ok("Booking cancelled", booking),
        Err(err) => service_error(err, "cancel booking"),
    }
}

#[post("/bookings/{id}/no-show")]
pub async fn mark_no_show(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    notifier: web::Data<dyn Notifier>,
) -> impl Responder {
    match bookings::mark_no_show(repo.get_ref(), notifier.get_ref(), &user, path.into_inner()) {
        Ok(booking) => ok("No-show recorded", booking),
        Err(err) => service_error(err, "mark no-show"),
    }
}

#[post("/bookings/{id}/payment")]
pub async fn record_payment(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match bookings::record_payment(repo.get_ref(), &user, path.into_inner()) {
        Ok(booking) => ok("Payment recorded", booking),
        Err(err) => service_error(err, "record payment"),
    }
}
