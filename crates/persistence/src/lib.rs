//! Persistence layer for the Minicrm backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Compiled segment filter to SQL translation

pub mod db;
pub mod entities;
pub mod repositories;
pub mod segment_sql;
