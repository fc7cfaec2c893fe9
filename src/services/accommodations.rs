//! Host-side listing setup: accommodations and their pricing configuration.

use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::accommodation::Accommodation;
use crate::domain::fee::Fee;
use crate::domain::owner::PriceableOwner;
use crate::domain::pricing::{PriceableItem, PricingPeriod};
use crate::domain::tax::{Tax, TaxExemption};
use crate::forms::accommodations::CreateAccommodationForm;
use crate::forms::pricing::{
    AddFeeForm, AddPricingPeriodForm, AddTaxExemptionForm, AddTaxForm, SetBasePriceForm,
};
use crate::repository::{
    AccommodationReader, AccommodationWriter, FeeWriter, PricingReader, PricingWriter, TaxReader,
    TaxWriter, UserReader, UserWriter,
};
use crate::services::{Caller, ServiceError, ServiceResult, load_hosted_accommodation};

/// Creates a listing hosted by the signed-in user.
pub fn create_accommodation<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CreateAccommodationForm,
) -> ServiceResult<Accommodation>
where
    R: AccommodationWriter + UserWriter + ?Sized,
{
    let host = Caller::mirror(repo, user)?;
    let host_id = host.id.ok_or_else(ServiceError::unauthorized)?;
    let new_accommodation = form.into_new_accommodation(user.hub_id, host_id)?;

    let accommodation = repo.create_accommodation(&new_accommodation)?;
    log::info!("Host {host_id} created accommodation {}", accommodation.id);
    Ok(accommodation)
}

/// Replaces the active base price of a listing.
pub fn set_base_price<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
    form: SetBasePriceForm,
) -> ServiceResult<PriceableItem>
where
    R: AccommodationReader + UserReader + PricingWriter + ?Sized,
{
    let accommodation = load_hosted_accommodation(repo, user, accommodation_id)?;
    let new_item = form.into_new_priceable_item(accommodation.owner_ref())?;

    Ok(repo.set_base_price(&new_item)?)
}

pub fn add_pricing_period<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
    form: AddPricingPeriodForm,
) -> ServiceResult<PricingPeriod>
where
    R: AccommodationReader + UserReader + PricingReader + PricingWriter + ?Sized,
{
    let accommodation = load_hosted_accommodation(repo, user, accommodation_id)?;
    let item = repo
        .get_active_priceable_item(accommodation.owner_ref())?
        .ok_or_else(|| {
            ServiceError::Conflict("Set a base price before adding pricing periods".to_string())
        })?;

    let new_period = form.into_new_pricing_period(item.id)?;
    Ok(repo.create_pricing_period(&new_period)?)
}

pub fn add_fee<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
    form: AddFeeForm,
) -> ServiceResult<Fee>
where
    R: AccommodationReader + UserReader + PricingReader + FeeWriter + ?Sized,
{
    let accommodation = load_hosted_accommodation(repo, user, accommodation_id)?;
    let new_fee = form.into_new_fee(accommodation.owner_ref())?;

    if let Some(item) = repo.get_active_priceable_item(accommodation.owner_ref())?
        && item.currency != new_fee.currency
    {
        return Err(ServiceError::form(format!(
            "fee currency {} does not match the listing currency {}",
            new_fee.currency, item.currency
        )));
    }

    Ok(repo.create_fee(&new_fee)?)
}

pub fn add_tax<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
    form: AddTaxForm,
) -> ServiceResult<Tax>
where
    R: AccommodationReader + UserReader + TaxWriter + ?Sized,
{
    let accommodation = load_hosted_accommodation(repo, user, accommodation_id)?;
    let new_tax = form.into_new_tax(accommodation.owner_ref())?;

    Ok(repo.create_tax(&new_tax)?)
}

/// Exempts the listing from one of its own taxes.
pub fn add_tax_exemption<R>(
    repo: &R,
    user: &AuthenticatedUser,
    accommodation_id: i32,
    form: AddTaxExemptionForm,
) -> ServiceResult<TaxExemption>
where
    R: AccommodationReader + UserReader + TaxReader + TaxWriter + ?Sized,
{
    let accommodation = load_hosted_accommodation(repo, user, accommodation_id)?;
    let owner = accommodation.owner_ref();
    let new_exemption = form.into_new_tax_exemption(owner)?;

    let taxes = repo.list_taxes(owner)?;
    if !taxes.iter().any(|tax| tax.id == new_exemption.tax_id) {
        return Err(ServiceError::not_found());
    }

    Ok(repo.create_tax_exemption(&new_exemption)?)
}
