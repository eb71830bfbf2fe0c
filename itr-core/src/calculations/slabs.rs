//! Progressive slab calculators for the old and new regimes.
//!
//! Each slab contributes `base_tax + (income - min_income) * rate` for the
//! income that falls inside it. Tables are continuous: the tax at the top of
//! one slab equals the base of the next, so the result is monotonic and
//! piecewise linear in income.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use itr_core::AgeGroup;
//! use itr_core::calculations::{calculate_tax_new_regime, calculate_tax_old_regime};
//!
//! assert_eq!(calculate_tax_new_regime(dec!(800000)), dec!(20000));
//! assert_eq!(calculate_tax_new_regime(dec!(1200000)), dec!(60000));
//! assert_eq!(calculate_tax_old_regime(dec!(500000), AgeGroup::Below60), dec!(12500));
//! assert_eq!(calculate_tax_old_regime(dec!(300001), AgeGroup::Senior), dec!(2500.05));
//! ```

use std::sync::LazyLock;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AgeGroup, NewRegimeRules, OldRegimeRules, RegimeRules, TaxSlab};

static STATUTORY_RULES: LazyLock<RegimeRules> = LazyLock::new(RegimeRules::default);

/// A slab table borrowed from a rule set.
///
/// Slabs are expected to be validated (see [`RegimeRules::validate`]):
/// sorted, contiguous from zero, continuous in tax at every boundary and
/// ending in an open-ended slab.
#[derive(Debug, Clone, Copy)]
pub struct SlabSchedule<'a> {
    slabs: &'a [TaxSlab],
}

impl<'a> SlabSchedule<'a> {
    pub fn new(slabs: &'a [TaxSlab]) -> Self {
        Self { slabs }
    }

    /// Tax owed on `income`. Zero and negative incomes owe nothing.
    pub fn tax_for(
        &self,
        income: Decimal,
    ) -> Decimal {
        if income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        match self.slabs.iter().find(|slab| slab.contains(income)) {
            Some(slab) => slab.base_tax + (income - slab.min_income) * slab.rate,
            None => Decimal::ZERO,
        }
    }
}

/// Old-regime slab tax for an already-reduced taxable income.
///
/// Senior and super senior taxpayers owe nothing at or below their exemption
/// ceiling. Above it they fall through to the same table as everyone else.
pub fn old_regime_tax(
    income: Decimal,
    age_group: AgeGroup,
    rules: &OldRegimeRules,
) -> Decimal {
    if let Some(limit) = rules.exemption_limit(age_group) {
        if income <= limit {
            debug!(
                income = %income,
                age_group = %age_group,
                limit = %limit,
                "income within age-based exemption; no old regime tax"
            );
            return Decimal::ZERO;
        }
    }

    SlabSchedule::new(&rules.slabs).tax_for(income)
}

/// New-regime slab tax for an already-reduced taxable income. Age plays no part.
pub fn new_regime_tax(
    income: Decimal,
    rules: &NewRegimeRules,
) -> Decimal {
    SlabSchedule::new(&rules.slabs).tax_for(income)
}

/// Old-regime slab tax under the statutory default rules.
pub fn calculate_tax_old_regime(
    income: Decimal,
    age_group: AgeGroup,
) -> Decimal {
    old_regime_tax(income, age_group, &STATUTORY_RULES.old_regime)
}

/// New-regime slab tax under the statutory default rules.
pub fn calculate_tax_new_regime(income: Decimal) -> Decimal {
    new_regime_tax(income, &STATUTORY_RULES.new_regime)
}
