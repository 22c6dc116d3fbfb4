//! Command implementations for the terminal frontend.

pub mod convert;
pub mod currencies;
pub mod interactive;
pub mod rates;
pub mod ui;
