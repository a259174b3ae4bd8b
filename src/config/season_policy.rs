use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// What the encoder does with a season label outside `spring`/`fall`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeasonPolicy {
    /// Report the mismatch and embed the raw label in the document.
    #[default]
    #[serde(rename(deserialize = "lenient"))]
    Lenient,
    /// Report the mismatch and skip the row.
    #[serde(rename(deserialize = "strict"))]
    Strict,
}

#[derive(Debug)]
pub struct SeasonPolicyParseError(String);

impl fmt::Display for SeasonPolicyParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid season policy '{}', expected strict or lenient", self.0)
    }
}

impl std::error::Error for SeasonPolicyParseError {}

impl FromStr for SeasonPolicy {
    type Err = SeasonPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(SeasonPolicy::Lenient),
            "strict" => Ok(SeasonPolicy::Strict),
            _ => Err(SeasonPolicyParseError(s.to_string())),
        }
    }
}
