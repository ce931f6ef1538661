//! Staffing business rules
//!
//! - [`field_rules`] — the allow-list and alias table governing which
//!   staff fields a proposed update may touch, plus pay-rate parsing
//! - [`booking`] — `datesNeeded` row patching and booking derivations
//! - [`recommend`] — pure scoring for the staff recommendation engine

pub mod booking;
pub mod field_rules;
pub mod recommend;

pub use field_rules::{canonical_staff_field, normalize_staff_updates, parse_pay_rate};
pub use recommend::{Candidate, rank_candidates};
