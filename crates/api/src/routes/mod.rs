//! HTTP route handlers.

pub mod ai;
pub mod campaigns;
pub mod customers;
pub mod health;
pub mod orders;
pub mod receipts;
pub mod segments;
pub mod vendor;
