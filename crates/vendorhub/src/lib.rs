//! VendorHub: a role-based equipment procurement marketplace.
//!
//! Clients issue requests for quotation against the equipment catalog,
//! invited vendors bid, a client accepts a bid to spawn a purchase order,
//! and an admin role vets bids. The procurement workflow and its view
//! assembly live under [`workflows::procurement`]; storage sits behind the
//! [`workflows::procurement::repository::ProcurementStore`] trait.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
