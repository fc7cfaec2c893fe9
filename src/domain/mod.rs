use thiserror::Error;

pub mod accommodation;
pub mod availability;
pub mod booking;
pub mod fee;
pub mod money;
pub mod owner;
pub mod pricing;
pub mod quote;
pub mod tax;
pub mod user;

/// Raised when a stored or submitted string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
