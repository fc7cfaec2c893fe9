use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::UnknownVariant;
use super::owner::OwnerRef;

/// Amount a tax is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationBasis {
    /// Rate applied to the subtotal.
    SubtotalOnly,
    /// Rate applied to the subtotal plus taxable fees.
    SubtotalAndFees,
    /// Fixed amount per unit (night or day).
    PerUnit,
    /// Fixed amount per guest per unit, e.g. a tourist tax.
    PerPersonPerUnit,
}

impl CalculationBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            CalculationBasis::SubtotalOnly => "subtotal_only",
            CalculationBasis::SubtotalAndFees => "subtotal_and_fees",
            CalculationBasis::PerUnit => "per_unit",
            CalculationBasis::PerPersonPerUnit => "per_person_per_unit",
        }
    }

    /// Whether the tax is a rate (as opposed to a fixed amount).
    pub fn is_rate_based(self) -> bool {
        matches!(
            self,
            CalculationBasis::SubtotalOnly | CalculationBasis::SubtotalAndFees
        )
    }
}

impl FromStr for CalculationBasis {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "subtotal_only" => Ok(CalculationBasis::SubtotalOnly),
            "subtotal_and_fees" => Ok(CalculationBasis::SubtotalAndFees),
            "per_unit" => Ok(CalculationBasis::PerUnit),
            "per_person_per_unit" => Ok(CalculationBasis::PerPersonPerUnit),
            other => Err(UnknownVariant::new("calculation basis", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Jurisdiction {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    pub region: Option<String>,
    pub city: Option<String>,
}

impl Jurisdiction {
    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            region: None,
            city: None,
        }
    }
}

/// A tax rule bound to an owner within a jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tax {
    pub id: i32,
    pub owner: OwnerRef,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    pub calculation_basis: CalculationBasis,
    /// Rate in basis points for rate based taxes.
    pub rate_bp: Option<i32>,
    /// Fixed amount for per-unit taxes.
    pub amount_cents: Option<i64>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTax {
    pub owner: OwnerRef,
    pub name: String,
    pub jurisdiction: Jurisdiction,
    pub calculation_basis: CalculationBasis,
    pub rate_bp: Option<i32>,
    pub amount_cents: Option<i64>,
}

impl NewTax {
    pub fn rate(
        owner: OwnerRef,
        name: impl Into<String>,
        jurisdiction: Jurisdiction,
        basis: CalculationBasis,
        rate_bp: i32,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            jurisdiction,
            calculation_basis: basis,
            rate_bp: Some(rate_bp),
            amount_cents: None,
        }
    }

    pub fn fixed(
        owner: OwnerRef,
        name: impl Into<String>,
        jurisdiction: Jurisdiction,
        basis: CalculationBasis,
        amount_cents: i64,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            jurisdiction,
            calculation_basis: basis,
            rate_bp: None,
            amount_cents: Some(amount_cents),
        }
    }
}

/// Suspends a tax for an owner, optionally within a validity window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaxExemption {
    pub id: i32,
    pub tax_id: i32,
    pub owner: OwnerRef,
    pub reason: String,
    pub certificate: Option<String>,
    pub valid_from: Option<NaiveDate>,
    /// Last day the exemption applies, inclusive.
    pub expires_on: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl TaxExemption {
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        let started = self.valid_from.is_none_or(|from| from <= date);
        let not_expired = self.expires_on.is_none_or(|until| date <= until);
        started && not_expired
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTaxExemption {
    pub tax_id: i32,
    pub owner: OwnerRef,
    pub reason: String,
    pub certificate: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}
