//! Seam for the free-text tax advice collaborator.
//!
//! Advice comes from an external generative model and is inherently
//! non-deterministic, so the crate only defines the request types and the
//! [`AdviceGenerator`] trait. Callers pass a concrete generator explicitly
//! instead of reaching for a process-wide client.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TaxEngineError;
use crate::models::{AgeGroup, AmountMap, IncomeInputs, TaxpayerProfile};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdviceError {
    #[error("question must not be empty")]
    EmptyQuestion,

    /// The backing model or service failed.
    #[error("advice service error: {0}")]
    Service(String),
}

/// Inputs for personalised tax-saving tips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub deductions: AmountMap,
    pub income: Decimal,
    pub age_group: AgeGroup,
}

impl AdviceRequest {
    /// Uses gross income and the claimed deductions from `inputs`.
    ///
    /// # Errors
    ///
    /// [`TaxEngineError::AmountOverflow`] when gross income cannot be summed.
    pub fn from_inputs(
        inputs: &IncomeInputs,
        profile: &TaxpayerProfile,
    ) -> Result<Self, TaxEngineError> {
        Ok(Self {
            deductions: inputs.deductions.clone(),
            income: inputs.gross_income()?,
            age_group: profile.age_group,
        })
    }
}

/// A free-form question for the advisor, with optional surrounding context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorQuestion {
    question: String,
    context: String,
}

impl AdvisorQuestion {
    /// Trims both fields and rejects a blank question.
    ///
    /// # Errors
    ///
    /// Returns [`AdviceError::EmptyQuestion`] when `question` is blank.
    pub fn new(
        question: &str,
        context: &str,
    ) -> Result<Self, AdviceError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AdviceError::EmptyQuestion);
        }
        Ok(Self {
            question: question.to_string(),
            context: context.trim().to_string(),
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

/// External advisor backed by a language model or similar service.
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    /// Personalised suggestions for reducing tax, as display-ready text.
    async fn tax_saving_tips(
        &self,
        request: &AdviceRequest,
    ) -> Result<String, AdviceError>;

    /// Answers a free-form tax question.
    async fn answer_question(
        &self,
        question: &AdvisorQuestion,
    ) -> Result<String, AdviceError>;
}
