//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::calculation::PayrollCalculator;
use crate::error::{EngineError, EngineResult};

use super::types::PayrollConfig;

/// Loads and validates payroll configuration.
///
/// # File format
///
/// ```text
/// insurance_rate: "0.05"
/// tax_strategy:
///   kind: flat
///   rate: "0.15"
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll.yaml").unwrap();
/// let calculator = loader.calculator().unwrap();
/// println!("Tax strategy: {}", calculator.tax_strategy().current_name());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - A rate or bracket is out of range (`Configuration`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from YAML text; `origin` names the source in errors.
    pub fn parse(content: &str, origin: &str) -> EngineResult<Self> {
        let config: PayrollConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let loader = Self { config };
        loader.calculator()?;
        Ok(loader)
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Builds a calculator from the configured strategy and insurance rate.
    pub fn calculator(&self) -> EngineResult<PayrollCalculator> {
        let strategy = self
            .config
            .tax_strategy
            .build()
            .map_err(|e| EngineError::Configuration {
                message: format!("tax strategy: {}", e),
            })?;
        let insurance = self
            .config
            .insurance_rule()
            .map_err(|e| EngineError::Configuration {
                message: format!("insurance: {}", e),
            })?;
        Ok(PayrollCalculator::new(strategy, insurance))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::from_config(PayrollConfig::default())
    }
}
