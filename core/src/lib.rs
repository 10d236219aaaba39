//! ChurnGuard dashboard core.
//!
//! Turns raw customer and alert collections into the view-models the
//! dashboard renders: portfolio metrics, filtered customer lists,
//! per-customer risk reasons and recommended actions.

pub mod actions;
pub mod alert;
pub mod cache;
pub mod config;
pub mod customer;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod session;
pub mod source;
pub mod store;
pub mod types;
