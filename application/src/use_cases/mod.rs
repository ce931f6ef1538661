//! Use case implementations

pub mod analytics;
pub mod confirm_action;
pub mod dispatch;
pub mod query_engine;
pub mod recommend_staff;

pub(crate) mod resolve;

#[cfg(test)]
pub(crate) mod test_support;
