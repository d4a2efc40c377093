use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_WEEK: i64 = 604_800;

/// Reporting window over a trade-event sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    /// Everything, unfiltered. The report screen calls this tab "monthly".
    #[default]
    #[serde(alias = "monthly")]
    All,
}

impl Period {
    /// Length of the look-back window in seconds; `None` for `All`.
    pub fn span_seconds(&self) -> Option<i64> {
        match self {
            Period::Daily => Some(SECONDS_PER_DAY),
            Period::Weekly => Some(SECONDS_PER_WEEK),
            Period::All => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::All => "all",
        }
    }

    /// Name the report endpoint expects; the unfiltered window is "monthly" there.
    pub fn report_key(&self) -> &'static str {
        match self {
            Period::All => "monthly",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "all" | "monthly" => Ok(Period::All),
            other => Err(CoreError::Config(format!(
                "Unknown period '{other}' (expected daily, weekly or all)"
            ))),
        }
    }
}
