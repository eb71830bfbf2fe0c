mod age_group;
mod income_inputs;
mod regime;
mod regime_rules;
mod tax_slab;
mod taxpayer_profile;

pub use age_group::AgeGroup;
pub use income_inputs::{
    AmountMap, DEDUCTIONS, GROSS_INCOME, IncomeInputs, OTHER_INCOME, SALARY_COMPONENTS,
};
pub use regime::{Regime, RegimeResult, TaxComparison};
pub use regime_rules::{NewRegimeRules, OldRegimeRules, RebateRule, RegimeRules, RegimeRulesError};
pub use tax_slab::TaxSlab;
pub use taxpayer_profile::TaxpayerProfile;
