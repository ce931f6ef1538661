//! Core domain types
//!
//! Fundamental error types shared across the domain.

pub mod error;

pub use error::DispatchError;
