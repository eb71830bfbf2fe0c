//! Statutory parameters for both tax regimes.
//!
//! Every constant the engine applies (standard deductions, the old-regime
//! deduction cap, age-based exemption ceilings, slab tables, cess and
//! year-specific rebates) lives here as data, so a new financial year can be
//! described in a TOML file rather than in code.
//!
//! [`RegimeRules::default`] reproduces the Budget 2025 tables:
//!
//! | Old regime slab | Tax |
//! |---|---|
//! | up to 2,50,000 | nil |
//! | 2,50,000 – 5,00,000 | 5% |
//! | 5,00,000 – 10,00,000 | 12,500 + 20% |
//! | above 10,00,000 | 1,12,500 + 30% |
//!
//! | New regime slab | Tax |
//! |---|---|
//! | up to 4,00,000 | nil |
//! | 4,00,000 – 8,00,000 | 5% |
//! | 8,00,000 – 12,00,000 | 20,000 + 10% |
//! | 12,00,000 – 16,00,000 | 60,000 + 15% |
//! | 16,00,000 – 20,00,000 | 1,20,000 + 20% |
//! | 20,00,000 – 24,00,000 | 2,00,000 + 25% |
//! | above 24,00,000 | 3,00,000 + 30% |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AgeGroup, TaxSlab};

/// Errors found while validating [`RegimeRules`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegimeRulesError {
    /// A regime has no slabs at all.
    #[error("{regime} regime has no tax slabs")]
    NoSlabs { regime: &'static str },

    /// The first slab must start at zero income.
    #[error("{regime} regime slabs must start at 0, first slab starts at {min_income}")]
    FirstSlabNotAtZero {
        regime: &'static str,
        min_income: Decimal,
    },

    /// A slab does not begin where the previous one ended.
    #[error("{regime} regime slab {index} starts at {min_income}, expected {expected}")]
    SlabGap {
        regime: &'static str,
        index: usize,
        min_income: Decimal,
        expected: Decimal,
    },

    /// A slab's ceiling is not above its floor.
    #[error("{regime} regime slab {index} has max income {max_income} not above {min_income}")]
    EmptySlab {
        regime: &'static str,
        index: usize,
        min_income: Decimal,
        max_income: Decimal,
    },

    /// Only the last slab may be open-ended, and the last slab must be.
    #[error("{regime} regime must end with exactly one open-ended slab")]
    OpenEndedSlabNotLast { regime: &'static str },

    /// A slab rate is outside [0, 1].
    #[error("{regime} regime slab {index} rate must be between 0 and 1, got {rate}")]
    InvalidSlabRate {
        regime: &'static str,
        index: usize,
        rate: Decimal,
    },

    /// A slab's base tax differs from the tax owed at the previous slab's
    /// ceiling (zero for the first slab), so tax would jump at the boundary.
    #[error("{regime} regime slab {index} base tax is {base_tax}, expected {expected}")]
    DiscontinuousSlab {
        regime: &'static str,
        index: usize,
        expected: Decimal,
        base_tax: Decimal,
    },

    /// A slab's base tax is negative.
    #[error("{regime} regime slab {index} base tax must be non-negative, got {base_tax}")]
    NegativeBaseTax {
        regime: &'static str,
        index: usize,
        base_tax: Decimal,
    },

    /// The cess rate is outside [0, 1].
    #[error("cess rate must be between 0 and 1, got {0}")]
    InvalidCessRate(Decimal),

    /// A deduction, cap, exemption ceiling or rebate amount is negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
}

/// Parameters of the old (deduction-based) regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OldRegimeRules {
    /// Flat deduction from gross income.
    pub standard_deduction: Decimal,

    /// Ceiling on the sum of itemised deductions.
    pub deduction_cap: Decimal,

    /// Senior citizens (60–79) owe nothing at or below this income.
    pub senior_exemption_limit: Decimal,

    /// Super senior citizens (80+) owe nothing at or below this income.
    pub super_senior_exemption_limit: Decimal,

    pub slabs: Vec<TaxSlab>,
}

impl OldRegimeRules {
    /// Exemption ceiling for the age group, if it has one.
    ///
    /// Above the ceiling the standard slab table applies unchanged.
    pub fn exemption_limit(
        &self,
        age_group: AgeGroup,
    ) -> Option<Decimal> {
        match age_group {
            AgeGroup::Below60 => None,
            AgeGroup::Senior => Some(self.senior_exemption_limit),
            AgeGroup::SuperSenior => Some(self.super_senior_exemption_limit),
        }
    }
}

impl Default for OldRegimeRules {
    fn default() -> Self {
        Self {
            standard_deduction: dec!(50000),
            deduction_cap: dec!(150000),
            senior_exemption_limit: dec!(300000),
            super_senior_exemption_limit: dec!(500000),
            slabs: vec![
                TaxSlab::new(dec!(0), Some(dec!(250000)), dec!(0), dec!(0)),
                TaxSlab::new(dec!(250000), Some(dec!(500000)), dec!(0.05), dec!(0)),
                TaxSlab::new(dec!(500000), Some(dec!(1000000)), dec!(0.2), dec!(12500)),
                TaxSlab::new(dec!(1000000), None, dec!(0.3), dec!(112500)),
            ],
        }
    }
}

/// Parameters of the new (concessional) regime. Itemised deductions are not
/// allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRegimeRules {
    pub standard_deduction: Decimal,
    pub slabs: Vec<TaxSlab>,
}

impl Default for NewRegimeRules {
    fn default() -> Self {
        Self {
            standard_deduction: dec!(75000),
            slabs: vec![
                TaxSlab::new(dec!(0), Some(dec!(400000)), dec!(0), dec!(0)),
                TaxSlab::new(dec!(400000), Some(dec!(800000)), dec!(0.05), dec!(0)),
                TaxSlab::new(dec!(800000), Some(dec!(1200000)), dec!(0.1), dec!(20000)),
                TaxSlab::new(dec!(1200000), Some(dec!(1600000)), dec!(0.15), dec!(60000)),
                TaxSlab::new(dec!(1600000), Some(dec!(2000000)), dec!(0.2), dec!(120000)),
                TaxSlab::new(dec!(2000000), Some(dec!(2400000)), dec!(0.25), dec!(200000)),
                TaxSlab::new(dec!(2400000), None, dec!(0.3), dec!(300000)),
            ],
        }
    }
}

/// A flat new-regime rebate for one financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebateRule {
    /// Financial year tag the rebate applies to, e.g. `"2025-26"`.
    pub financial_year: String,

    /// Rebate applies when new-regime taxable income is at or below this.
    pub max_taxable_income: Decimal,

    /// Amount subtracted from the new-regime slab tax (floored at zero).
    pub amount: Decimal,
}

/// Complete rule set used by [`crate::TaxEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    pub old_regime: OldRegimeRules,
    pub new_regime: NewRegimeRules,

    /// Health and education cess, applied to both regimes after rebates.
    pub cess_rate: Decimal,

    #[serde(default)]
    pub rebates: Vec<RebateRule>,
}

impl Default for RegimeRules {
    fn default() -> Self {
        Self {
            old_regime: OldRegimeRules::default(),
            new_regime: NewRegimeRules::default(),
            cess_rate: dec!(0.04),
            rebates: vec![RebateRule {
                financial_year: "2025-26".to_string(),
                max_taxable_income: dec!(700000),
                amount: dec!(60000),
            }],
        }
    }
}

impl RegimeRules {
    /// The rebate configured for `financial_year`, if any.
    pub fn rebate_for(
        &self,
        financial_year: &str,
    ) -> Option<&RebateRule> {
        self.rebates
            .iter()
            .find(|r| r.financial_year == financial_year)
    }

    /// Validates every table and amount.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegimeRulesError`] found, checking the old regime,
    /// then the new regime, then cess and rebates.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use itr_core::{RegimeRules, RegimeRulesError};
    ///
    /// let rules = RegimeRules {
    ///     cess_rate: dec!(1.5),
    ///     ..RegimeRules::default()
    /// };
    ///
    /// assert_eq!(rules.validate(), Err(RegimeRulesError::InvalidCessRate(dec!(1.5))));
    /// ```
    pub fn validate(&self) -> Result<(), RegimeRulesError> {
        non_negative("old_regime.standard_deduction", self.old_regime.standard_deduction)?;
        non_negative("old_regime.deduction_cap", self.old_regime.deduction_cap)?;
        non_negative(
            "old_regime.senior_exemption_limit",
            self.old_regime.senior_exemption_limit,
        )?;
        non_negative(
            "old_regime.super_senior_exemption_limit",
            self.old_regime.super_senior_exemption_limit,
        )?;
        validate_slabs("old", &self.old_regime.slabs)?;

        non_negative("new_regime.standard_deduction", self.new_regime.standard_deduction)?;
        validate_slabs("new", &self.new_regime.slabs)?;

        if self.cess_rate < Decimal::ZERO || self.cess_rate > Decimal::ONE {
            return Err(RegimeRulesError::InvalidCessRate(self.cess_rate));
        }

        for rebate in &self.rebates {
            non_negative("rebates.max_taxable_income", rebate.max_taxable_income)?;
            non_negative("rebates.amount", rebate.amount)?;
        }

        Ok(())
    }
}

fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<(), RegimeRulesError> {
    if value < Decimal::ZERO {
        return Err(RegimeRulesError::NegativeAmount { field, value });
    }
    Ok(())
}

fn validate_slabs(
    regime: &'static str,
    slabs: &[TaxSlab],
) -> Result<(), RegimeRulesError> {
    let Some(first) = slabs.first() else {
        return Err(RegimeRulesError::NoSlabs { regime });
    };
    if !first.min_income.is_zero() {
        return Err(RegimeRulesError::FirstSlabNotAtZero {
            regime,
            min_income: first.min_income,
        });
    }

    let last_index = slabs.len() - 1;
    let mut expected_min = Decimal::ZERO;
    let mut expected_base = Decimal::ZERO;

    for (index, slab) in slabs.iter().enumerate() {
        if slab.min_income != expected_min {
            return Err(RegimeRulesError::SlabGap {
                regime,
                index,
                min_income: slab.min_income,
                expected: expected_min,
            });
        }
        if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
            return Err(RegimeRulesError::InvalidSlabRate {
                regime,
                index,
                rate: slab.rate,
            });
        }
        if slab.base_tax < Decimal::ZERO {
            return Err(RegimeRulesError::NegativeBaseTax {
                regime,
                index,
                base_tax: slab.base_tax,
            });
        }
        if slab.base_tax != expected_base {
            return Err(RegimeRulesError::DiscontinuousSlab {
                regime,
                index,
                expected: expected_base,
                base_tax: slab.base_tax,
            });
        }

        match (slab.max_income, index == last_index) {
            (Some(max), false) => {
                if max <= slab.min_income {
                    return Err(RegimeRulesError::EmptySlab {
                        regime,
                        index,
                        min_income: slab.min_income,
                        max_income: max,
                    });
                }
                expected_min = max;
                expected_base = slab.tax_at_ceiling().unwrap_or_default();
            }
            (None, true) => {}
            _ => return Err(RegimeRulesError::OpenEndedSlabNotLast { regime }),
        }
    }

    Ok(())
}
