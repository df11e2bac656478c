//! Route modules.

pub mod check;
pub mod metrics;
