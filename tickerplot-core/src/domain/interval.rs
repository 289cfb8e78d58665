//! Reporting interval selector.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of the requested series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalSelector {
    Intraday,
    Daily,
    Weekly,
    Monthly,
}

impl IntervalSelector {
    pub const ALL: [IntervalSelector; 4] = [
        IntervalSelector::Intraday,
        IntervalSelector::Daily,
        IntervalSelector::Weekly,
        IntervalSelector::Monthly,
    ];

    /// Numeric form code (`1`..`4`), used in artifact names and user messages.
    pub fn code(self) -> &'static str {
        match self {
            Self::Intraday => "1",
            Self::Daily => "2",
            Self::Weekly => "3",
            Self::Monthly => "4",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Intraday => "intraday",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for IntervalSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized interval string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interval '{0}' (valid: intraday, daily, weekly, monthly or 1-4)")]
pub struct UnknownInterval(pub String);

impl FromStr for IntervalSelector {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "intraday" => Ok(Self::Intraday),
            "2" | "daily" => Ok(Self::Daily),
            "3" | "weekly" => Ok(Self::Weekly),
            "4" | "monthly" => Ok(Self::Monthly),
            _ => Err(UnknownInterval(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_codes() {
        assert_eq!("daily".parse::<IntervalSelector>().unwrap(), IntervalSelector::Daily);
        assert_eq!("Weekly".parse::<IntervalSelector>().unwrap(), IntervalSelector::Weekly);
        assert_eq!("1".parse::<IntervalSelector>().unwrap(), IntervalSelector::Intraday);
        assert_eq!("4".parse::<IntervalSelector>().unwrap(), IntervalSelector::Monthly);
    }

    #[test]
    fn rejects_unknown() {
        let err = "5".parse::<IntervalSelector>().unwrap_err();
        assert_eq!(err, UnknownInterval("5".into()));
    }

    #[test]
    fn code_roundtrips_through_parse() {
        for interval in IntervalSelector::ALL {
            assert_eq!(interval.code().parse::<IntervalSelector>().unwrap(), interval);
        }
    }
}
