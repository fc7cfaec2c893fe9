use crate::domain::accommodation::Accommodation;
use crate::domain::owner::PriceableOwner;
use crate::domain::quote::PriceBreakdown;
use crate::forms::quotes::QuoteForm;
use crate::pricing::{PricingInputs, QuoteRequest, build_breakdown};
use crate::repository::{AccommodationReader, FeeReader, PricingReader, TaxReader};
use crate::services::{ServiceError, ServiceResult};

/// Load an accommodation guests may see and book.
pub(crate) fn load_bookable_accommodation<R>(
    repo: &R,
    accommodation_id: i32,
) -> ServiceResult<Accommodation>
where
    R: AccommodationReader + ?Sized,
{
    repo.get_accommodation_by_id(accommodation_id)?
        .filter(|accommodation| accommodation.is_active)
        .ok_or_else(ServiceError::not_found)
}

/// Price `request` against the stored configuration of `accommodation`.
pub(crate) fn price_stay<R>(
    repo: &R,
    accommodation: &Accommodation,
    request: &QuoteRequest,
) -> ServiceResult<PriceBreakdown>
where
    R: PricingReader + FeeReader + TaxReader + ?Sized,
{
    if request.guests > accommodation.max_guests {
        return Err(ServiceError::form(format!(
            "this accommodation hosts at most {} guests",
            accommodation.max_guests
        )));
    }

    let owner = accommodation.owner_ref();
    let item = repo.get_active_priceable_item(owner)?;
    let periods = match &item {
        Some(item) => repo.list_pricing_periods(item.id)?,
        None => Vec::new(),
    };
    let fees = repo.list_fees(owner)?;
    let taxes = repo.list_taxes(owner)?;
    let exemptions = repo.list_tax_exemptions(owner)?;

    let inputs = PricingInputs {
        item: item.as_ref(),
        periods: &periods,
        fees: &fees,
        taxes: &taxes,
        exemptions: &exemptions,
    };

    Ok(build_breakdown(&inputs, request)?)
}

/// Price quote for a stay. Public: no sign-in required.
pub fn quote_price<R>(
    repo: &R,
    accommodation_id: i32,
    form: QuoteForm,
) -> ServiceResult<PriceBreakdown>
where
    R: AccommodationReader + PricingReader + FeeReader + TaxReader + ?Sized,
{
    let request = form.into_quote_request()?;
    let accommodation = load_bookable_accommodation(repo, accommodation_id)?;

    price_stay(repo, &accommodation, &request)
}
