//! Name Trends - historical name popularity explorer
//!
//! Loads name-frequency-by-year records, aggregates them into a year x name
//! table, and derives chart and CSV views for a selection of names.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
