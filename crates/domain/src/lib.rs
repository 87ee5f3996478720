//! Domain layer for the Minicrm backend.
//!
//! This crate contains:
//! - Domain models (Customer, Campaign, DeliveryRecord, Order, segment rules)
//! - Business logic services (rule compilation, message personalization)
//! - Domain error types

pub mod models;
pub mod services;
