pub mod advice;
pub mod calculations;
pub mod error;
pub mod models;

pub use advice::{AdviceError, AdviceGenerator, AdviceRequest, AdvisorQuestion};
pub use calculations::{TaxEngine, compute_tax};
pub use error::TaxEngineError;
pub use models::*;
