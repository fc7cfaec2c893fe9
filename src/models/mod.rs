pub mod accommodation;
pub mod availability;
pub mod booking;
pub mod fee;
pub mod pricing;
pub mod tax;
pub mod user;
