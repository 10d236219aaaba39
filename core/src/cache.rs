//! "Loaded once" guard for the customers page.
//!
//! This is a UI-level decision: the pure aggregation functions never
//! consult it. Navigator::login() invalidates it so a new session never
//! sees the previous session's list.

use crate::{
    customer::{normalize_customers, Customer},
    source::{fetch_or_empty, DataSource},
};

#[derive(Debug, Clone, Default)]
pub struct CustomerCache {
    customers: Option<Vec<Customer>>,
    loads:     u64,
}

impl CustomerCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached list, fetching and normalizing it on first use.
    ///
    /// A failed fetch is cached as an empty list like any other result;
    /// call invalidate() to retry.
    pub fn get_or_load<S: DataSource + ?Sized>(&mut self, source: &S) -> &[Customer] {
        if self.customers.is_none() {
            let raw = fetch_or_empty(source.name(), "customers", || source.customers());
            let customers = normalize_customers(&raw);
            self.loads += 1;
            log::info!("cache: loaded {} customers from {}", customers.len(), source.name());
            self.customers = Some(customers);
        }
        self.customers.as_deref().unwrap_or(&[])
    }

    pub fn is_loaded(&self) -> bool {
        self.customers.is_some()
    }

    pub fn invalidate(&mut self) {
        if self.customers.take().is_some() {
            log::debug!("cache: invalidated");
        }
    }

    /// How many times the source has actually been hit.
    pub fn load_count(&self) -> u64 {
        self.loads
    }
}
