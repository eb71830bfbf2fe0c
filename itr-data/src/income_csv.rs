//! CSV loader for income and deduction line items.
//!
//! ## CSV Format
//!
//! Headers are matched by name; column order does not matter and whitespace
//! around values is ignored.
//!
//! | Column | Type | Notes |
//! |------------|---------|------------------------------------------------|
//! | `category` | string | One of `salary`, `other_income`, `deduction` |
//! | `name` | string | Free-form label, e.g. `basic`, `80c` |
//! | `amount` | decimal | Annual amount in rupees, non-negative |
//!
//! Rows that repeat a `(category, name)` pair are added together, so monthly
//! payslip lines can be listed individually.
//!
//! ### Example
//!
//! ```csv
//! category,name,amount
//! salary,basic,800000
//! salary,hra,400000
//! other_income,savings interest,12000.50
//! deduction,80c,150000
//! ```

use std::path::Path;

use itr_core::{AmountMap, IncomeInputs};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct CsvRow {
    category: String,
    name: String,
    amount: Decimal,
}

/// Which of the three input maps a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCategory {
    Salary,
    OtherIncome,
    Deduction,
}

impl LineCategory {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "salary" => Some(Self::Salary),
            "other_income" => Some(Self::OtherIncome),
            "deduction" => Some(Self::Deduction),
            _ => None,
        }
    }
}

/// Errors that can occur while loading income CSV data.
#[derive(Debug, Error)]
pub enum IncomeCsvError {
    /// Bad structure, missing column or a value of the wrong type.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `category` was not one of the recognised values. `row` is 1-based.
    #[error("unrecognised category '{category}' on row {row}")]
    UnknownCategory { category: String, row: usize },

    #[error("amount for '{name}' on row {row} must be non-negative, got {amount}")]
    NegativeAmount {
        name: String,
        amount: Decimal,
        row: usize,
    },

    #[error("empty name on row {row}")]
    EmptyName { row: usize },

    /// Repeated rows for `name` add up to more than `Decimal` can hold.
    #[error("running total for '{name}' overflows on row {row}")]
    AmountOverflow { name: String, row: usize },
}

/// Parses CSV text into [`IncomeInputs`].
///
/// # Errors
///
/// * [`IncomeCsvError::Parse`] if the CSV is structurally invalid.
/// * [`IncomeCsvError::UnknownCategory`], [`IncomeCsvError::EmptyName`],
///   [`IncomeCsvError::NegativeAmount`] or [`IncomeCsvError::AmountOverflow`]
///   for the first offending row.
pub fn load_from_str(input: &str) -> Result<IncomeInputs, IncomeCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let mut inputs = IncomeInputs::default();

    for (idx, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result?;
        let row_number = idx + 1;

        let category = LineCategory::parse(&row.category).ok_or_else(|| {
            IncomeCsvError::UnknownCategory {
                category: row.category.clone(),
                row: row_number,
            }
        })?;
        if row.name.is_empty() {
            return Err(IncomeCsvError::EmptyName { row: row_number });
        }
        if row.amount < Decimal::ZERO {
            return Err(IncomeCsvError::NegativeAmount {
                name: row.name,
                amount: row.amount,
                row: row_number,
            });
        }

        let target: &mut AmountMap = match category {
            LineCategory::Salary => &mut inputs.salary_components,
            LineCategory::OtherIncome => &mut inputs.other_income,
            LineCategory::Deduction => &mut inputs.deductions,
        };
        let running = target.get(&row.name).copied().unwrap_or_default();
        let total = running.checked_add(row.amount).ok_or_else(|| {
            IncomeCsvError::AmountOverflow {
                name: row.name.clone(),
                row: row_number,
            }
        })?;
        target.insert(row.name, total);
    }

    Ok(inputs)
}

/// Reads a file from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<IncomeInputs, IncomeCsvError> {
    let contents = std::fs::read_to_string(path).map_err(|source| IncomeCsvError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
