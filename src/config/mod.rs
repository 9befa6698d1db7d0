//! Configuration loading for the payroll engine.
//!
//! The configuration selects the tax strategy in force at startup and the
//! insurance rate applied to every paycheck.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Insurance rate: {}", loader.config().insurance_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_FLAT_TAX_RATE, PayrollConfig, TaxStrategyConfig};
