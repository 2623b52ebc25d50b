//! Multi-statement use-cases composed from per-entity repositories.
//!
//! # Responsibility
//! - Run flows that touch several tables inside one SQLite transaction.
//! - Keep facades free of transaction bookkeeping.

pub mod library_service;
pub mod purchase_service;
