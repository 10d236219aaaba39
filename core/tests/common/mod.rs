#![allow(dead_code)]

use churnguard_core::{
    alert::{Alert, AlertPriority},
    customer::{normalize_customer, Customer, RawCustomer},
};
use serde_json::{json, Value};

pub fn raw(value: Value) -> RawCustomer {
    RawCustomer::from_value(value)
}

pub fn customer(value: Value) -> Customer {
    normalize_customer(&raw(value))
}

/// A customer that trips none of the recommended-action rules.
pub fn healthy(id: &str, name: &str) -> Customer {
    customer(json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "mrr": 1000,
        "healthScore": 90,
        "riskLevel": "low",
        "supportTicketsCount": 0,
        "featuresUsedCount": 12,
        "paymentStatus": "current",
    }))
}

pub fn alert(customer_id: &str, priority: AlertPriority, title: &str) -> Alert {
    Alert {
        customer_id: customer_id.into(),
        title:       title.into(),
        description: format!("{title} details"),
        priority,
    }
}
