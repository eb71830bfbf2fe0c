use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;
use crate::models::AgeGroup;

/// Who is filing and for which financial year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub age_group: AgeGroup,

    /// Financial year tag such as `"2025-26"`. Selects year-specific rebates.
    pub financial_year: String,
}

impl TaxpayerProfile {
    pub fn new(
        age_group: AgeGroup,
        financial_year: impl Into<String>,
    ) -> Self {
        Self {
            age_group,
            financial_year: financial_year.into(),
        }
    }

    /// Builds a profile from the raw age group tag submitted by a form or CLI.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::UnknownAgeGroup`] when the tag is not recognised.
    pub fn parse(
        age_group: &str,
        financial_year: impl Into<String>,
    ) -> Result<Self, TaxEngineError> {
        Ok(Self::new(age_group.parse()?, financial_year))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_builds_profile_from_tags() {
        let profile = TaxpayerProfile::parse("super_senior", "2024-25").expect("known tag");

        assert_eq!(profile, TaxpayerProfile::new(AgeGroup::SuperSenior, "2024-25"));
    }

    #[test]
    fn parse_fails_fast_on_unknown_age_group() {
        let result = TaxpayerProfile::parse("", "2025-26");

        assert_eq!(result, Err(TaxEngineError::UnknownAgeGroup(String::new())));
    }
}
