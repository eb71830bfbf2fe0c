//! Loading [`RegimeRules`] from TOML.
//!
//! A rules file describes one financial year's tables. Amounts may be written
//! as TOML integers, floats or quoted strings (`"0.05"`), the last being exact.
//!
//! ```toml
//! cess_rate = "0.04"
//!
//! [old_regime]
//! standard_deduction = 50000
//! deduction_cap = 150000
//! senior_exemption_limit = 300000
//! super_senior_exemption_limit = 500000
//!
//! [[old_regime.slabs]]
//! min_income = 0
//! max_income = 250000
//! rate = "0"
//! base_tax = 0
//! # ...
//!
//! [[rebates]]
//! financial_year = "2025-26"
//! max_taxable_income = 700000
//! amount = 60000
//! ```

use std::path::Path;

use itr_core::{RegimeRules, RegimeRulesError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RulesConfigError {
    #[error("could not read rules file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("rules file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("rules file is inconsistent: {0}")]
    Invalid(#[from] RegimeRulesError),
}

/// Parses and validates a rule set from TOML text.
pub fn rules_from_toml_str(input: &str) -> Result<RegimeRules, RulesConfigError> {
    let rules: RegimeRules = toml::from_str(input)?;
    rules.validate()?;
    Ok(rules)
}

/// Reads a rules file, or returns the statutory defaults when `path` is `None`.
pub fn load_rules(path: Option<&Path>) -> Result<RegimeRules, RulesConfigError> {
    let Some(path) = path else {
        return Ok(RegimeRules::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| RulesConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let rules = rules_from_toml_str(&contents)?;

    info!(
        path = %path.display(),
        rebates = rules.rebates.len(),
        "loaded regime rules"
    );
    Ok(rules)
}
