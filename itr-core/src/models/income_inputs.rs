use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;

/// Amounts keyed by a free-form label ("basic", "hra", "80c", ...).
///
/// Labels carry no meaning to the engine; only the values are summed.
pub type AmountMap = BTreeMap<String, Decimal>;

pub const SALARY_COMPONENTS: &str = "salary_components";
pub const OTHER_INCOME: &str = "other_income";
pub const DEDUCTIONS: &str = "deductions";
pub const GROSS_INCOME: &str = "gross_income";

/// Aggregated annual income and deduction figures for one taxpayer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeInputs {
    /// Salary components such as basic pay, HRA or bonus.
    #[serde(default)]
    pub salary_components: AmountMap,

    /// Non-salary income: interest, capital gains, rent.
    #[serde(default)]
    pub other_income: AmountMap,

    /// Claimed deductions such as 80C or 80D. Only the old regime uses them.
    #[serde(default)]
    pub deductions: AmountMap,
}

impl IncomeInputs {
    pub fn new(
        salary_components: AmountMap,
        other_income: AmountMap,
        deductions: AmountMap,
    ) -> Self {
        Self {
            salary_components,
            other_income,
            deductions,
        }
    }

    /// Builds inputs from floating-point maps, as produced by JSON-speaking
    /// extractors.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::NonFiniteAmount`] for NaN or infinite values
    /// and [`TaxEngineError::InvalidAmount`] for negative ones.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use rust_decimal_macros::dec;
    /// use itr_core::IncomeInputs;
    ///
    /// let salary = BTreeMap::from([("basic".to_string(), 800000.0)]);
    /// let inputs = IncomeInputs::from_f64_maps(&salary, &BTreeMap::new(), &BTreeMap::new()).unwrap();
    ///
    /// assert_eq!(inputs.total_salary().unwrap(), dec!(800000));
    /// ```
    pub fn from_f64_maps(
        salary_components: &BTreeMap<String, f64>,
        other_income: &BTreeMap<String, f64>,
        deductions: &BTreeMap<String, f64>,
    ) -> Result<Self, TaxEngineError> {
        let inputs = Self {
            salary_components: convert_f64_map(SALARY_COMPONENTS, salary_components)?,
            other_income: convert_f64_map(OTHER_INCOME, other_income)?,
            deductions: convert_f64_map(DEDUCTIONS, deductions)?,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Sum of the salary components.
    ///
    /// # Errors
    ///
    /// [`TaxEngineError::AmountOverflow`] when the sum leaves the decimal range.
    pub fn total_salary(&self) -> Result<Decimal, TaxEngineError> {
        checked_total(SALARY_COMPONENTS, &self.salary_components)
    }

    pub fn total_other_income(&self) -> Result<Decimal, TaxEngineError> {
        checked_total(OTHER_INCOME, &self.other_income)
    }

    pub fn total_deductions(&self) -> Result<Decimal, TaxEngineError> {
        checked_total(DEDUCTIONS, &self.deductions)
    }

    /// Salary plus other income.
    pub fn gross_income(&self) -> Result<Decimal, TaxEngineError> {
        self.total_salary()?
            .checked_add(self.total_other_income()?)
            .ok_or(TaxEngineError::AmountOverflow {
                category: GROSS_INCOME,
            })
    }

    /// Checks that every amount is non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidAmount`] naming the first offending
    /// entry (maps are checked in salary, other income, deductions order).
    pub fn validate(&self) -> Result<(), TaxEngineError> {
        check_non_negative(SALARY_COMPONENTS, &self.salary_components)?;
        check_non_negative(OTHER_INCOME, &self.other_income)?;
        check_non_negative(DEDUCTIONS, &self.deductions)?;
        Ok(())
    }
}

fn checked_total(
    category: &'static str,
    amounts: &AmountMap,
) -> Result<Decimal, TaxEngineError> {
    amounts
        .values()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))
        .ok_or(TaxEngineError::AmountOverflow { category })
}

fn check_non_negative(
    category: &'static str,
    amounts: &AmountMap,
) -> Result<(), TaxEngineError> {
    match amounts.iter().find(|(_, amount)| **amount < Decimal::ZERO) {
        Some((key, amount)) => Err(TaxEngineError::InvalidAmount {
            category,
            key: key.clone(),
            amount: *amount,
        }),
        None => Ok(()),
    }
}

fn convert_f64_map(
    category: &'static str,
    amounts: &BTreeMap<String, f64>,
) -> Result<AmountMap, TaxEngineError> {
    amounts
        .iter()
        .map(|(key, value)| {
            if !value.is_finite() {
                return Err(TaxEngineError::NonFiniteAmount {
                    category,
                    key: key.clone(),
                });
            }
            let amount = Decimal::try_from(*value)
                .map(|d| d.normalize())
                .map_err(|_| TaxEngineError::NonFiniteAmount {
                    category,
                    key: key.clone(),
                })?;
            Ok((key.clone(), amount))
        })
        .collect()
}
