use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One progressive bracket: income above `min_income` (up to `max_income`)
/// is taxed at `rate` on top of `base_tax`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub min_income: Decimal,
    #[serde(default)]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxSlab {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        rate: Decimal,
        base_tax: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            rate,
            base_tax,
        }
    }

    /// Whether `income` falls in `(min_income, max_income]`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income > self.min_income && self.max_income.is_none_or(|max| income <= max)
    }

    /// Tax owed at the top of this slab, or `None` for an open-ended slab.
    pub fn tax_at_ceiling(&self) -> Option<Decimal> {
        self.max_income
            .map(|max| self.base_tax + (max - self.min_income) * self.rate)
    }
}
