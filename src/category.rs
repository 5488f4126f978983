//! Outcome Categories
//!
//! Build results collapse into three categories. The `type` attribute on
//! descriptor elements is parsed into [`ParsedCategory`], which keeps the
//! unrecognized case explicit: images drop it, quotes treat it as default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeCategory {
    Success,
    Failure,
    /// Anything that is neither an exact success nor an exact failure
    Other,
}

impl OutcomeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeCategory::Success => "success",
            OutcomeCategory::Failure => "failure",
            OutcomeCategory::Other => "other",
        }
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of reading a `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedCategory {
    Success,
    Failure,
    Other,
    Unrecognized,
}

impl ParsedCategory {
    pub fn category(self) -> Option<OutcomeCategory> {
        match self {
            ParsedCategory::Success => Some(OutcomeCategory::Success),
            ParsedCategory::Failure => Some(OutcomeCategory::Failure),
            ParsedCategory::Other => Some(OutcomeCategory::Other),
            ParsedCategory::Unrecognized => None,
        }
    }
}

/// Case-insensitive match against `success`, `failure` and `other`.
pub fn parse_category(value: &str) -> ParsedCategory {
    if value.eq_ignore_ascii_case("success") {
        ParsedCategory::Success
    } else if value.eq_ignore_ascii_case("failure") {
        ParsedCategory::Failure
    } else if value.eq_ignore_ascii_case("other") {
        ParsedCategory::Other
    } else {
        ParsedCategory::Unrecognized
    }
}

/// Build result as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildResult {
    Success,
    Unstable,
    Failure,
    NotBuilt,
    Aborted,
}

impl BuildResult {
    pub fn category(self) -> OutcomeCategory {
        match self {
            BuildResult::Success => OutcomeCategory::Success,
            BuildResult::Failure => OutcomeCategory::Failure,
            BuildResult::Unstable | BuildResult::NotBuilt | BuildResult::Aborted => {
                OutcomeCategory::Other
            }
        }
    }
}

impl From<BuildResult> for OutcomeCategory {
    fn from(result: BuildResult) -> Self {
        result.category()
    }
}

impl FromStr for BuildResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "success" => Ok(BuildResult::Success),
            "unstable" => Ok(BuildResult::Unstable),
            "failure" => Ok(BuildResult::Failure),
            "notbuilt" => Ok(BuildResult::NotBuilt),
            "aborted" => Ok(BuildResult::Aborted),
            _ => Err(format!(
                "Unknown build result '{}': expected success, unstable, failure, not_built or aborted",
                s
            )),
        }
    }
}
