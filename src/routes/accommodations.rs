use actix_web::{Responder, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::accommodations::CreateAccommodationForm;
use crate::forms::pricing::{
    AddFeeForm, AddPricingPeriodForm, AddTaxExemptionForm, AddTaxForm, SetBasePriceForm,
};
use crate::repository::DieselRepository;
use crate::routes::{created, ok, service_error};
use crate::services::accommodations;

#[post("/accommodations")]
pub async fn create_accommodation(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<CreateAccommodationForm>,
) -> impl Responder {
    match accommodations::create_accommodation(repo.get_ref(), &user, form.into_inner()) {
        Ok(accommodation) => created("Accommodation created", accommodation),
        Err(err) => service_error(err, "create accommodation"),
    }
}

#[put("/accommodations/{id}/pricing")]
pub async fn set_base_price(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<SetBasePriceForm>,
) -> impl Responder {
    match accommodations::set_base_price(
        repo.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(item) => ok("Base price updated", item),
        Err(err) => service_error(err, "set base price"),
    }
}

#[post("/accommodations/{id}/pricing-periods")]
pub async fn add_pricing_period(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddPricingPeriodForm>,
) -> impl Responder {
    match accommodations::add_pricing_period(
        repo.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(period) => created("Pricing period added", period),
        Err(err) => service_error(err, "add pricing period"),
    }
}

#[post("/accommodations/{id}/fees")]
pub async fn add_fee(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddFeeForm>,
) -> impl Responder {
    match accommodations::add_fee(repo.get_ref(), &user, path.into_inner(), form.into_inner()) {
        Ok(fee) => created("Fee added", fee),
        Err(err) => service_error(err, "add fee"),
    }
}

#[post("/accommodations/{id}/taxes")]
pub async fn add_tax(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddTaxForm>,
) -> impl Responder {
    match accommodations::add_tax(repo.get_ref(), &user, path.into_inner(), form.into_inner()) {
        Ok(tax) => created("Tax added", tax),
        Err(err) => service_error(err, "add tax"),
    }
}

#[post("/accommodations/{id}/tax-exemptions")]
pub async fn add_tax_exemption(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddTaxExemptionForm>,
) -> impl Responder {
    match accommodations::add_tax_exemption(
        repo.get_ref(),
        &user,
        path.into_inner(),
        form.into_inner(),
    ) {
        Ok(exemption) => created("Tax exemption added", exemption),
        Err(err) => service_error(err, "add tax exemption"),
    }
}
