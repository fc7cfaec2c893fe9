use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::UnknownVariant;
use super::owner::OwnerRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    Cleaning,
    Service,
    Linen,
    Pet,
    Resort,
    Other,
}

impl FeeType {
    pub fn as_str(self) -> &'static str {
        match self {
            FeeType::Cleaning => "cleaning",
            FeeType::Service => "service",
            FeeType::Linen => "linen",
            FeeType::Pet => "pet",
            FeeType::Resort => "resort",
            FeeType::Other => "other",
        }
    }
}

impl FromStr for FeeType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cleaning" => Ok(FeeType::Cleaning),
            "service" => Ok(FeeType::Service),
            "linen" => Ok(FeeType::Linen),
            "pet" => Ok(FeeType::Pet),
            "resort" => Ok(FeeType::Resort),
            "other" => Ok(FeeType::Other),
            other => Err(UnknownVariant::new("fee type", other)),
        }
    }
}

/// Unit basis a fee is charged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeType {
    PerBooking,
    PerUnit,
    PerPerson,
    PerPersonPerUnit,
    Percentage,
}

impl ChargeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChargeType::PerBooking => "per_booking",
            ChargeType::PerUnit => "per_unit",
            ChargeType::PerPerson => "per_person",
            ChargeType::PerPersonPerUnit => "per_person_per_unit",
            ChargeType::Percentage => "percentage",
        }
    }
}

impl FromStr for ChargeType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "per_booking" => Ok(ChargeType::PerBooking),
            "per_unit" => Ok(ChargeType::PerUnit),
            "per_person" => Ok(ChargeType::PerPerson),
            "per_person_per_unit" => Ok(ChargeType::PerPersonPerUnit),
            "percentage" => Ok(ChargeType::Percentage),
            other => Err(UnknownVariant::new("charge type", other)),
        }
    }
}

/// Amount a percentage fee is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageBasis {
    /// Sum of unit prices.
    Subtotal,
    /// Subtotal plus all fixed (non-percentage) fees.
    SubtotalWithFees,
    /// Subtotal plus every fee that is not itself based on the total.
    Total,
}

impl PercentageBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            PercentageBasis::Subtotal => "subtotal",
            PercentageBasis::SubtotalWithFees => "subtotal_with_fees",
            PercentageBasis::Total => "total",
        }
    }
}

impl FromStr for PercentageBasis {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "subtotal" => Ok(PercentageBasis::Subtotal),
            "subtotal_with_fees" => Ok(PercentageBasis::SubtotalWithFees),
            "total" => Ok(PercentageBasis::Total),
            other => Err(UnknownVariant::new("percentage basis", other)),
        }
    }
}

/// How an `applies_after_*` threshold affects the charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Only the part above the threshold is charged.
    #[default]
    Excess,
    /// The whole fee is charged once the threshold is exceeded, nothing before.
    AllOrNothing,
}

impl ThresholdMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThresholdMode::Excess => "excess",
            ThresholdMode::AllOrNothing => "all_or_nothing",
        }
    }
}

impl FromStr for ThresholdMode {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "excess" => Ok(ThresholdMode::Excess),
            "all_or_nothing" => Ok(ThresholdMode::AllOrNothing),
            other => Err(UnknownVariant::new("threshold mode", other)),
        }
    }
}

/// A chargeable add-on attached to an owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fee {
    pub id: i32,
    pub owner: OwnerRef,
    pub name: String,
    pub fee_type: FeeType,
    pub charge_type: ChargeType,
    /// Fixed amount for every charge type except `percentage`.
    pub amount_cents: Option<i64>,
    /// Rate for `percentage` fees, in basis points.
    pub rate_bp: Option<i32>,
    pub percentage_basis: Option<PercentageBasis>,
    pub currency: String,
    pub is_mandatory: bool,
    pub is_taxable: bool,
    pub is_refundable: bool,
    pub applies_after_quantity: Option<i32>,
    pub applies_after_persons: Option<i32>,
    pub applies_after_amount_cents: Option<i64>,
    pub threshold_mode: ThresholdMode,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a fee.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFee {
    pub owner: OwnerRef,
    pub name: String,
    pub fee_type: FeeType,
    pub charge_type: ChargeType,
    pub amount_cents: Option<i64>,
    pub rate_bp: Option<i32>,
    pub percentage_basis: Option<PercentageBasis>,
    pub currency: String,
    pub is_mandatory: bool,
    pub is_taxable: bool,
    pub is_refundable: bool,
    pub applies_after_quantity: Option<i32>,
    pub applies_after_persons: Option<i32>,
    pub applies_after_amount_cents: Option<i64>,
    pub threshold_mode: ThresholdMode,
}

impl NewFee {
    /// A mandatory, taxable, refundable fixed-amount fee.
    pub fn fixed(
        owner: OwnerRef,
        name: impl Into<String>,
        fee_type: FeeType,
        charge_type: ChargeType,
        amount_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            fee_type,
            charge_type,
            amount_cents: Some(amount_cents),
            rate_bp: None,
            percentage_basis: None,
            currency: currency.into(),
            is_mandatory: true,
            is_taxable: true,
            is_refundable: true,
            applies_after_quantity: None,
            applies_after_persons: None,
            applies_after_amount_cents: None,
            threshold_mode: ThresholdMode::default(),
        }
    }

    /// A mandatory, taxable, refundable percentage fee.
    pub fn percentage(
        owner: OwnerRef,
        name: impl Into<String>,
        fee_type: FeeType,
        rate_bp: i32,
        basis: PercentageBasis,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            fee_type,
            charge_type: ChargeType::Percentage,
            amount_cents: None,
            rate_bp: Some(rate_bp),
            percentage_basis: Some(basis),
            currency: currency.into(),
            is_mandatory: true,
            is_taxable: true,
            is_refundable: true,
            applies_after_quantity: None,
            applies_after_persons: None,
            applies_after_amount_cents: None,
            threshold_mode: ThresholdMode::default(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_mandatory = false;
        self
    }

    pub fn non_taxable(mut self) -> Self {
        self.is_taxable = false;
        self
    }

    pub fn non_refundable(mut self) -> Self {
        self.is_refundable = false;
        self
    }

    pub fn with_thresholds(
        mut self,
        quantity: Option<i32>,
        persons: Option<i32>,
        amount_cents: Option<i64>,
        mode: ThresholdMode,
    ) -> Self {
        self.applies_after_quantity = quantity;
        self.applies_after_persons = persons;
        self.applies_after_amount_cents = amount_cents;
        self.threshold_mode = mode;
        self
    }
}
