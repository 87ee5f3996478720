//! Shared utilities and common types for the Minicrm backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Input validation helpers (email normalization and format checks)

pub mod validation;
