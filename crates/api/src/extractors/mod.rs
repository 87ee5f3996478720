//! Axum request extractors.

pub mod operator;

pub use operator::Operator;
