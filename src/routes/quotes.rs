use actix_web::{Responder, post, web};

use crate::forms::quotes::QuoteForm;
use crate::repository::DieselRepository;
use crate::routes::{ok, service_error};
use crate::services::quotes;

/// Public price quote; no session required.
#[post("/accommodations/{id}/quote")]
pub async fn quote_price(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    form: web::Json<QuoteForm>,
) -> impl Responder {
    match quotes::quote_price(repo.get_ref(), path.into_inner(), form.into_inner()) {
        Ok(breakdown) => ok("Price quote", breakdown),
        Err(err) => service_error(err, "quote price"),
    }
}
