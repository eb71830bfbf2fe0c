//! Plain-text rendering of a [`TaxComparison`].

use std::fmt;

use itr_core::calculations::common::round_half_up;
use itr_core::{Regime, RegimeResult, TaxComparison};
use rust_decimal::Decimal;

const LABEL_WIDTH: usize = 20;
const COLUMN_WIDTH: usize = 14;

/// Renders both regimes side by side, amounts rounded half-up to paise.
///
/// ```text
/// Gross income                1200000.00
///
///                            Old regime     New regime
/// Deductions applied          200000.00       75000.00
/// ...
/// Recommended: new regime (saves 62400.00)
/// ```
pub fn render(comparison: &TaxComparison) -> String {
    Report(comparison).to_string()
}

/// [`fmt::Display`] adapter over [`write_report`].
pub struct Report<'a>(pub &'a TaxComparison);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_report(f, self.0)
    }
}

/// Writes the report into `out`, stopping at the first write error.
pub fn write_report(
    out: &mut impl fmt::Write,
    comparison: &TaxComparison,
) -> fmt::Result {
    let old = &comparison.old_regime;
    let new = &comparison.new_regime;

    writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$}",
        "Gross income",
        money(comparison.gross_income)
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$} {:>COLUMN_WIDTH$}",
        "", "Old regime", "New regime"
    )?;

    let rows: [(&str, fn(&RegimeResult) -> Decimal); 6] = [
        ("Deductions applied", |r| r.deductions_applied),
        ("Taxable income", |r| r.taxable_income),
        ("Slab tax", |r| r.slab_tax),
        ("Rebate", |r| r.rebate),
        ("Cess", |r| r.cess),
        ("Total tax", |r| r.tax),
    ];
    for (label, field) in rows {
        writeln!(
            out,
            "{label:<LABEL_WIDTH$}{:>COLUMN_WIDTH$} {:>COLUMN_WIDTH$}",
            money(field(old)),
            money(field(new))
        )?;
    }
    writeln!(
        out,
        "{:<LABEL_WIDTH$}{:>COLUMN_WIDTH$} {:>COLUMN_WIDTH$}",
        "Effective rate",
        format!("{}%", money(old.effective_rate)),
        format!("{}%", money(new.effective_rate))
    )?;
    writeln!(out)?;

    match comparison.recommended_regime {
        Regime::New => writeln!(
            out,
            "Recommended: new regime (saves {})",
            money(comparison.savings)
        ),
        Regime::Old if comparison.savings.is_zero() => {
            writeln!(out, "Recommended: old regime (both regimes cost the same)")
        }
        Regime::Old => writeln!(
            out,
            "Recommended: old regime (saves {})",
            money(comparison.savings)
        ),
    }
}

/// Two decimal places, half-up.
fn money(value: Decimal) -> String {
    format!("{:.2}", round_half_up(value))
}
