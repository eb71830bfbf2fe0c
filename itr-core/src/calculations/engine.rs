//! Old-versus-new regime comparison.
//!
//! # Computation
//!
//! | Step | Old regime | New regime |
//! |------|------------|------------|
//! | 1 | Gross income = salary components + other income | same |
//! | 2 | − standard deduction (50,000) | − standard deduction (75,000) |
//! | 3 | − min(itemised deductions, 1,50,000) | itemised deductions ignored |
//! | 4 | Taxable income floored at 0 | same |
//! | 5 | Slab tax, with age-based exemption ceiling | Slab tax |
//! | 6 | — | Year-specific rebate, floored at 0 |
//! | 7 | × (1 + 4% cess) | same |
//! | 8 | Effective rate = tax / gross × 100 | same |
//!
//! The new regime is recommended only when its tax is strictly lower.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use rust_decimal_macros::dec;
//! use itr_core::{AgeGroup, IncomeInputs, Regime, TaxEngine, TaxpayerProfile};
//!
//! let inputs = IncomeInputs::new(
//!     BTreeMap::from([
//!         ("basic".to_string(), dec!(800000)),
//!         ("hra".to_string(), dec!(400000)),
//!     ]),
//!     BTreeMap::new(),
//!     BTreeMap::from([("80c".to_string(), dec!(150000))]),
//! );
//! let profile = TaxpayerProfile::new(AgeGroup::Below60, "2024-25");
//!
//! let comparison = TaxEngine::default().compute(&inputs, &profile).unwrap();
//!
//! assert_eq!(comparison.old_regime.tax, dec!(117000));
//! assert_eq!(comparison.new_regime.tax, dec!(54600));
//! assert_eq!(comparison.recommended_regime, Regime::New);
//! assert_eq!(comparison.savings, dec!(62400));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::{floor_at_zero, percentage_of};
use crate::calculations::slabs::{new_regime_tax, old_regime_tax};
use crate::error::TaxEngineError;
use crate::models::{
    AgeGroup, IncomeInputs, Regime, RegimeResult, RegimeRules, TaxComparison, TaxpayerProfile,
};

/// Stateless calculator holding a validated rule set.
///
/// `compute` takes `&self` and touches no shared state, so one engine can
/// serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct TaxEngine {
    rules: RegimeRules,
}

impl TaxEngine {
    /// Creates an engine after validating `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidRules`] if any table or amount is invalid.
    pub fn new(rules: RegimeRules) -> Result<Self, TaxEngineError> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &RegimeRules {
        &self.rules
    }

    /// Computes tax under both regimes and recommends the cheaper one.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidAmount`] if any input amount is
    /// negative (no arithmetic is attempted in that case), or
    /// [`TaxEngineError::AmountOverflow`] if the amounts are too large to sum
    /// or to carry cess.
    pub fn compute(
        &self,
        inputs: &IncomeInputs,
        profile: &TaxpayerProfile,
    ) -> Result<TaxComparison, TaxEngineError> {
        inputs.validate()?;

        let gross_income = inputs.gross_income()?;
        debug!(
            gross_income = %gross_income,
            age_group = %profile.age_group,
            financial_year = %profile.financial_year,
            "computing regime comparison"
        );

        let old_regime =
            self.old_regime(gross_income, inputs.total_deductions()?, profile.age_group)?;
        let new_regime = self.new_regime(gross_income, &profile.financial_year)?;

        let recommended_regime = if new_regime.tax < old_regime.tax {
            Regime::New
        } else {
            Regime::Old
        };
        let savings = (new_regime.tax - old_regime.tax).abs();

        Ok(TaxComparison {
            gross_income,
            old_regime,
            new_regime,
            recommended_regime,
            savings,
        })
    }

    /// Old regime: standard deduction plus capped itemised deductions,
    /// age-dependent slabs, no rebate.
    fn old_regime(
        &self,
        gross_income: Decimal,
        claimed_deductions: Decimal,
        age_group: AgeGroup,
    ) -> Result<RegimeResult, TaxEngineError> {
        let rules = &self.rules.old_regime;

        let itemised = claimed_deductions.min(rules.deduction_cap);
        if claimed_deductions > rules.deduction_cap {
            debug!(
                claimed = %claimed_deductions,
                cap = %rules.deduction_cap,
                "itemised deductions capped"
            );
        }
        let deductions_applied = rules
            .standard_deduction
            .checked_add(itemised)
            .ok_or(TaxEngineError::AmountOverflow {
                category: "old_regime.deductions_applied",
            })?;

        let taxable_income = self.taxable_income(Regime::Old, gross_income, deductions_applied);
        let slab_tax = old_regime_tax(taxable_income, age_group, rules);

        self.finish(
            Regime::Old,
            gross_income,
            taxable_income,
            deductions_applied,
            slab_tax,
            Decimal::ZERO,
        )
    }

    /// New regime: standard deduction only, flat slabs, then any rebate for
    /// the financial year.
    fn new_regime(
        &self,
        gross_income: Decimal,
        financial_year: &str,
    ) -> Result<RegimeResult, TaxEngineError> {
        let rules = &self.rules.new_regime;

        let deductions_applied = rules.standard_deduction;
        let taxable_income = self.taxable_income(Regime::New, gross_income, deductions_applied);
        let slab_tax = new_regime_tax(taxable_income, rules);
        let rebate = self.rebate(financial_year, taxable_income, slab_tax);

        self.finish(
            Regime::New,
            gross_income,
            taxable_income,
            deductions_applied,
            slab_tax,
            rebate,
        )
    }

    /// Gross income minus deductions, floored at zero.
    fn taxable_income(
        &self,
        regime: Regime,
        gross_income: Decimal,
        deductions: Decimal,
    ) -> Decimal {
        let taxable = gross_income - deductions;
        if taxable < Decimal::ZERO {
            warn!(
                regime = %regime,
                gross_income = %gross_income,
                deductions = %deductions,
                "deductions exceed gross income; taxable income floored at zero"
            );
        }
        floor_at_zero(taxable)
    }

    /// Rebate actually usable against `slab_tax`: never more than the tax itself.
    fn rebate(
        &self,
        financial_year: &str,
        taxable_income: Decimal,
        slab_tax: Decimal,
    ) -> Decimal {
        let Some(rule) = self.rules.rebate_for(financial_year) else {
            return Decimal::ZERO;
        };
        if taxable_income > rule.max_taxable_income {
            debug!(
                financial_year,
                taxable_income = %taxable_income,
                threshold = %rule.max_taxable_income,
                "taxable income above rebate threshold"
            );
            return Decimal::ZERO;
        }

        let rebate = rule.amount.min(slab_tax);
        debug!(
            financial_year,
            slab_tax = %slab_tax,
            rebate = %rebate,
            "new regime rebate applied"
        );
        rebate
    }

    /// Applies cess and the effective rate to a rebated slab tax.
    fn finish(
        &self,
        regime: Regime,
        gross_income: Decimal,
        taxable_income: Decimal,
        deductions_applied: Decimal,
        slab_tax: Decimal,
        rebate: Decimal,
    ) -> Result<RegimeResult, TaxEngineError> {
        let after_rebate = floor_at_zero(slab_tax - rebate);
        let tax = after_rebate
            .checked_mul(Decimal::ONE + self.rules.cess_rate)
            .ok_or(TaxEngineError::AmountOverflow {
                category: match regime {
                    Regime::Old => "old_regime.tax",
                    Regime::New => "new_regime.tax",
                },
            })?;
        let cess = tax - after_rebate;

        Ok(RegimeResult {
            taxable_income,
            deductions_applied,
            slab_tax,
            rebate,
            cess,
            tax,
            effective_rate: percentage_of(tax, gross_income),
        })
    }
}

/// Computes the comparison under the statutory default rules.
///
/// # Errors
///
/// See [`TaxEngine::compute`].
pub fn compute_tax(
    inputs: &IncomeInputs,
    profile: &TaxpayerProfile,
) -> Result<TaxComparison, TaxEngineError> {
    TaxEngine::default().compute(inputs, profile)
}
