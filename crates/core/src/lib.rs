//! Core business logic for Ledgerly.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, financial invariants, and calculations
//! live here.
//!
//! # Modules
//!
//! - `invoice` - Invoice totals, numbering, and status lifecycle rules
//! - `metrics` - Time-bucket and category aggregation
//! - `statement` - Statement assembly and PDF/XLSX rendering
//! - `access` - Role and permission checks

pub mod access;
pub mod invoice;
pub mod metrics;
pub mod statement;
