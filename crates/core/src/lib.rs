//! Core accounting logic for Ledgerbook.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations
//! live here.
//!
//! # Modules
//!
//! - `chart` - Hierarchical chart of accounts (typed forest)
//! - `journal` - Double-entry journal validation and flow aggregation
//! - `fx` - Currency conversion and the external rate source client
//! - `reporting` - Balance sheet / income statement roll-up

pub mod chart;
pub mod fx;
pub mod journal;
pub mod reporting;
