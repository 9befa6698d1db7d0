//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{
    DEFAULT_INSURANCE_RATE, FlatTaxStrategy, InsuranceRule, ProgressiveTaxStrategy, TaxBracket,
    TaxStrategy,
};
use crate::error::EngineResult;

/// The default flat tax rate (15%).
pub const DEFAULT_FLAT_TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Description of a tax strategy.
///
/// ```yaml
/// kind: progressive
/// brackets:
///   - { threshold: "10000", rate: "0.10" }
///   - { threshold: "50000", rate: "0.20" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaxStrategyConfig {
    /// One rate on the whole amount.
    Flat {
        /// Rate in `[0, 1]`.
        rate: Decimal,
    },
    /// Ascending brackets.
    Progressive {
        /// `(threshold, rate)` pairs in any order.
        brackets: Vec<TaxBracket>,
    },
}

impl TaxStrategyConfig {
    /// Builds the described strategy, validating its rates and brackets.
    pub fn build(&self) -> EngineResult<Arc<dyn TaxStrategy>> {
        Ok(match self {
            TaxStrategyConfig::Flat { rate } => Arc::new(FlatTaxStrategy::new(*rate)?),
            TaxStrategyConfig::Progressive { brackets } => {
                Arc::new(ProgressiveTaxStrategy::new(brackets.iter().copied())?)
            }
        })
    }
}

impl Default for TaxStrategyConfig {
    fn default() -> Self {
        TaxStrategyConfig::Flat {
            rate: DEFAULT_FLAT_TAX_RATE,
        }
    }
}

fn default_insurance_rate() -> Decimal {
    DEFAULT_INSURANCE_RATE
}

/// The complete payroll configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollConfig {
    /// Share of total compensation withheld for insurance.
    #[serde(default = "default_insurance_rate")]
    pub insurance_rate: Decimal,
    /// The tax strategy in force at startup.
    #[serde(default)]
    pub tax_strategy: TaxStrategyConfig,
}

impl PayrollConfig {
    /// Builds the insurance rule, validating the rate.
    pub fn insurance_rule(&self) -> EngineResult<InsuranceRule> {
        InsuranceRule::new(self.insurance_rate)
    }
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            insurance_rate: DEFAULT_INSURANCE_RATE,
            tax_strategy: TaxStrategyConfig::default(),
        }
    }
}
