//! Tax calculations for the old and new personal income-tax regimes.
//!
//! [`slabs`] holds the progressive slab calculators, [`engine`] layers the
//! standard deductions, deduction cap, rebate and cess on top of them and
//! produces the regime comparison.

pub mod common;
pub mod engine;
pub mod slabs;

pub use engine::{TaxEngine, compute_tax};
pub use slabs::{
    SlabSchedule, calculate_tax_new_regime, calculate_tax_old_regime, new_regime_tax,
    old_regime_tax,
};
