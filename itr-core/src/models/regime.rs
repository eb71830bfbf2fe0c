use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The two mutually exclusive personal income-tax regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Old,
    New,
}

impl Regime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of computing tax under a single regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeResult {
    /// Gross income minus the deductions the regime allows, never negative.
    pub taxable_income: Decimal,

    /// Standard deduction plus any (capped) itemised deductions subtracted.
    pub deductions_applied: Decimal,

    /// Tax from the slab table, before rebate and cess.
    pub slab_tax: Decimal,

    /// Rebate actually subtracted from the slab tax.
    pub rebate: Decimal,

    /// Cess added on top of the rebated tax.
    pub cess: Decimal,

    /// Final liability including cess.
    pub tax: Decimal,

    /// `tax / gross_income * 100`, or zero when gross income is zero.
    pub effective_rate: Decimal,
}

/// Side-by-side result for both regimes with a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComparison {
    pub gross_income: Decimal,
    pub old_regime: RegimeResult,
    pub new_regime: RegimeResult,

    /// `New` only when its tax is strictly lower; ties go to `Old`.
    pub recommended_regime: Regime,

    /// Absolute difference between the two final tax amounts.
    pub savings: Decimal,
}

impl TaxComparison {
    pub fn result_for(
        &self,
        regime: Regime,
    ) -> &RegimeResult {
        match regime {
            Regime::Old => &self.old_regime,
            Regime::New => &self.new_regime,
        }
    }

    pub fn recommended(&self) -> &RegimeResult {
        self.result_for(self.recommended_regime)
    }
}
