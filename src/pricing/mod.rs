//! Pure price computation: unit prices, fees, taxes and the final breakdown.

use thiserror::Error;

pub mod breakdown;
pub mod fees;
pub mod rules;
pub mod taxes;

pub use breakdown::{PricingInputs, QuoteRequest, build_breakdown};

/// Configuration or request problems detected while pricing a stay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("No active pricing configured")]
    NoActivePricing,
    #[error("pricing period {0} sets neither a price override nor a multiplier")]
    InvalidPeriod(i32),
    #[error("a stay of {units} units is shorter than the minimum of {min}")]
    BelowMinimumQuantity { units: i64, min: i32 },
    #[error("a stay of {units} units is longer than the maximum of {max}")]
    AboveMaximumQuantity { units: i64, max: i32 },
    #[error("at least one guest is required")]
    InvalidGuestCount,
    #[error("fee {fee_id} is charged in {fee_currency} but the listing is priced in {currency}")]
    CurrencyMismatch {
        fee_id: i32,
        fee_currency: String,
        currency: String,
    },
    #[error("fee {0} has no amount configured")]
    MissingFeeAmount(i32),
    #[error("fee {0} has no rate configured")]
    MissingFeeRate(i32),
    #[error("tax {0} has no rate configured")]
    MissingTaxRate(i32),
    #[error("tax {0} has no amount configured")]
    MissingTaxAmount(i32),
    #[error("fee {0} is not an optional fee of this listing")]
    UnknownOptionalFee(i32),
    #[error("price amounts are too large to compute")]
    AmountOverflow,
}
