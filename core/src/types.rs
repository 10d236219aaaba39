//! Shared primitive types used across the dashboard core.

/// A stable customer identifier. Always a string, whatever the upstream
/// payload used.
pub type CustomerId = String;

/// A raw JSON object as delivered by the backend, before normalization.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
