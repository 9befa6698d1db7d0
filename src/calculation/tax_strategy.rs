//! Tax calculation strategies.
//!
//! A [`TaxStrategy`] maps a compensation amount to the tax owed on it. Two
//! strategies are provided:
//! - [`FlatTaxStrategy`]: a single rate applied to the whole amount.
//! - [`ProgressiveTaxStrategy`]: ascending brackets, each rate applying to the
//!   slice of income between the previous threshold and its own.
//!
//! [`SharedTaxStrategy`] holds the strategy currently in force and lets it
//! be replaced while calculations are running.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};

/// A pluggable policy computing tax owed from a compensation amount.
pub trait TaxStrategy: Send + Sync + fmt::Debug {
    /// Human-readable name of the strategy.
    fn name(&self) -> &str;

    /// Returns the tax owed on `gross_pay`.
    ///
    /// Fails with [`EngineError::Validation`] when `gross_pay` is negative.
    fn calculate_tax(&self, gross_pay: Decimal) -> EngineResult<Decimal>;
}

fn ensure_rate(rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(EngineError::validation(format!(
            "tax rate must be between 0 and 1, got {}",
            rate
        )));
    }
    Ok(())
}

fn ensure_taxable(gross_pay: Decimal) -> EngineResult<()> {
    if gross_pay < Decimal::ZERO {
        return Err(EngineError::validation(format!(
            "taxable amount cannot be negative: {}",
            gross_pay
        )));
    }
    Ok(())
}

fn percent(rate: Decimal) -> Decimal {
    (rate * Decimal::ONE_HUNDRED).normalize()
}

/// Taxes the whole amount at one rate.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{FlatTaxStrategy, TaxStrategy};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let strategy = FlatTaxStrategy::new(Decimal::from_str("0.15").unwrap()).unwrap();
/// assert_eq!(strategy.name(), "Flat Tax (15%)");
/// assert_eq!(
///     strategy.calculate_tax(Decimal::from(50000)).unwrap(),
///     Decimal::from(7500)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatTaxStrategy {
    rate: Decimal,
    name: String,
}

impl FlatTaxStrategy {
    /// Creates a flat strategy. The rate must lie in `[0, 1]`.
    pub fn new(rate: Decimal) -> EngineResult<Self> {
        ensure_rate(rate)?;
        Ok(Self {
            rate,
            name: format!("Flat Tax ({}%)", percent(rate)),
        })
    }

    /// The configured rate.
    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

impl TaxStrategy for FlatTaxStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate_tax(&self, gross_pay: Decimal) -> EngineResult<Decimal> {
        ensure_taxable(gross_pay)?;
        Ok(gross_pay * self.rate)
    }
}

/// A `(threshold, rate)` pair of a progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Upper bound of the slice this rate applies to.
    pub threshold: Decimal,
    /// Rate applied to income between the previous threshold and this one.
    pub rate: Decimal,
}

/// Taxes income slice by slice across ascending brackets.
///
/// Income above the highest threshold keeps being taxed at the rate of the
/// highest bracket; there is no implicit unbounded bracket beyond it.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{ProgressiveTaxStrategy, TaxBracket, TaxStrategy};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let strategy = ProgressiveTaxStrategy::new(vec![
///     TaxBracket { threshold: Decimal::from(10000), rate: Decimal::from_str("0.10").unwrap() },
///     TaxBracket { threshold: Decimal::from(50000), rate: Decimal::from_str("0.20").unwrap() },
/// ])
/// .unwrap();
///
/// // 10000 @ 10% + 40000 @ 20% + 10000 @ 20%
/// assert_eq!(
///     strategy.calculate_tax(Decimal::from(60000)).unwrap(),
///     Decimal::from(11000)
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveTaxStrategy {
    brackets: Vec<TaxBracket>,
    name: String,
}

impl ProgressiveTaxStrategy {
    /// Creates a progressive strategy from brackets in any order.
    ///
    /// Fails when no bracket is given, a threshold is negative or repeated,
    /// or a rate lies outside `[0, 1]`.
    pub fn new(brackets: impl IntoIterator<Item = TaxBracket>) -> EngineResult<Self> {
        let mut sorted = BTreeMap::new();
        for bracket in brackets {
            if bracket.threshold < Decimal::ZERO {
                return Err(EngineError::validation(format!(
                    "bracket threshold cannot be negative: {}",
                    bracket.threshold
                )));
            }
            ensure_rate(bracket.rate)?;
            if sorted.insert(bracket.threshold, bracket.rate).is_some() {
                return Err(EngineError::validation(format!(
                    "duplicate bracket threshold: {}",
                    bracket.threshold
                )));
            }
        }

        if sorted.is_empty() {
            return Err(EngineError::validation(
                "progressive tax requires at least one bracket",
            ));
        }

        let brackets: Vec<TaxBracket> = sorted
            .into_iter()
            .map(|(threshold, rate)| TaxBracket { threshold, rate })
            .collect();
        let name = format!("Progressive Tax ({} brackets)", brackets.len());

        Ok(Self { brackets, name })
    }

    /// The brackets in ascending threshold order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    fn top_rate(&self) -> Decimal {
        self.brackets
            .last()
            .map(|b| b.rate)
            .unwrap_or(Decimal::ZERO)
    }
}

impl TaxStrategy for ProgressiveTaxStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn calculate_tax(&self, gross_pay: Decimal) -> EngineResult<Decimal> {
        ensure_taxable(gross_pay)?;

        let mut remaining = gross_pay;
        let mut previous_threshold = Decimal::ZERO;
        let mut tax = Decimal::ZERO;

        for bracket in &self.brackets {
            if remaining <= Decimal::ZERO {
                break;
            }
            let slice = remaining.min(bracket.threshold - previous_threshold);
            tax += slice * bracket.rate;
            remaining -= slice;
            previous_threshold = bracket.threshold;
        }

        if remaining > Decimal::ZERO {
            tax += remaining * self.top_rate();
        }

        debug!(gross_pay = %gross_pay, tax = %tax, "Progressive tax calculated");
        Ok(tax)
    }
}

/// The tax strategy currently in force, replaceable at runtime.
///
/// Clones share the same slot. [`SharedTaxStrategy::current`] hands out a
/// snapshot, so a calculation that started before a replace finishes with
/// the strategy it began with.
#[derive(Debug, Clone)]
pub struct SharedTaxStrategy {
    slot: Arc<RwLock<Arc<dyn TaxStrategy>>>,
}

impl SharedTaxStrategy {
    /// Creates a slot holding `strategy`.
    pub fn new(strategy: Arc<dyn TaxStrategy>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(strategy)),
        }
    }

    /// Returns the strategy currently in force.
    pub fn current(&self) -> Arc<dyn TaxStrategy> {
        let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Swaps in `strategy` and returns the one it replaced.
    pub fn replace(&self, strategy: Arc<dyn TaxStrategy>) -> Arc<dyn TaxStrategy> {
        let mut guard = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        info!(from = guard.name(), to = strategy.name(), "Tax strategy replaced");
        std::mem::replace(&mut *guard, strategy)
    }

    /// Name of the strategy currently in force.
    pub fn current_name(&self) -> String {
        self.current().name().to_string()
    }
}
