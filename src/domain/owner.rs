use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UnknownVariant;

/// Registry of entity kinds that can own pricing, fee and tax configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Accommodation,
}

impl OwnerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OwnerKind::Accommodation => "accommodation",
        }
    }
}

impl FromStr for OwnerKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "accommodation" => Ok(OwnerKind::Accommodation),
            other => Err(UnknownVariant::new("owner kind", other)),
        }
    }
}

/// Typed reference to the entity a pricing rule is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerRef {
    pub kind: OwnerKind,
    pub id: i32,
}

impl OwnerRef {
    pub fn new(kind: OwnerKind, id: i32) -> Self {
        Self { kind, id }
    }

    pub fn accommodation(id: i32) -> Self {
        Self::new(OwnerKind::Accommodation, id)
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind.as_str(), self.id)
    }
}

/// Capability shared by every entity that can carry pricing configuration.
pub trait PriceableOwner {
    fn owner_ref(&self) -> OwnerRef;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_kind_round_trips_through_storage_name() {
        let kind: OwnerKind = OwnerKind::Accommodation.as_str().parse().expect("known kind");
        assert_eq!(kind, OwnerKind::Accommodation);
        assert!("App\\Models\\Accommodation".parse::<OwnerKind>().is_err());
    }

    #[test]
    fn owner_ref_displays_kind_and_id() {
        assert_eq!(OwnerRef::accommodation(7).to_string(), "accommodation#7");
    }
}
