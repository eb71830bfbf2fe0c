use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaxEngineError;

/// Age bracket of the taxpayer. Only the old regime looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Under 60 years.
    #[serde(rename = "below_60")]
    Below60,
    /// 60 to 79 years.
    Senior,
    /// 80 years and above.
    SuperSenior,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Below60 => "below_60",
            Self::Senior => "senior",
            Self::SuperSenior => "super_senior",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "below_60" => Some(Self::Below60),
            "senior" => Some(Self::Senior),
            "super_senior" => Some(Self::SuperSenior),
            _ => None,
        }
    }
}

impl FromStr for AgeGroup {
    type Err = TaxEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| TaxEngineError::UnknownAgeGroup(s.to_string()))
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
