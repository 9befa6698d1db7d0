//! Payroll calculation and paycheck lifecycle engine.
//!
//! This crate computes paychecks from employee salaries under a runtime
//! swappable tax strategy, distributes bonuses across a business, enforces
//! the paycheck lifecycle (DRAFT, PENDING, PAID, VOIDED) and aggregates
//! payroll summaries over date ranges.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
