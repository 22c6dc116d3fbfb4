//! Core business logic: parsing, formatting, conversion, caching.

pub mod amount;
pub mod cache;
pub mod config;
pub mod convert;
pub mod currency;
pub mod debounce;
pub mod log;
pub mod money;
pub mod online;
pub mod prefs;
pub mod rates;

// Re-export main types for cleaner imports
pub use cache::{CacheEntry, RatesCache};
pub use convert::UnknownCurrencyError;
pub use currency::CurrencyMeta;
pub use online::{OnlineMonitor, OnlineState};
pub use rates::RateTable;
