//! Rate-limit rules and decisions.
//!
//! Rules are written as `"<count> per [<n>] <unit>"` or `"<count>/[<n>] <unit>"`,
//! e.g. `"10 per minute"`, `"200/day"`, `"5 per 30 seconds"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Time unit of a rate-limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl RateUnit {
    fn seconds(self) -> u64 {
        match self {
            RateUnit::Second => 1,
            RateUnit::Minute => 60,
            RateUnit::Hour => 3_600,
            RateUnit::Day => 86_400,
        }
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateUnit::Second => write!(f, "second"),
            RateUnit::Minute => write!(f, "minute"),
            RateUnit::Hour => write!(f, "hour"),
            RateUnit::Day => write!(f, "day"),
        }
    }
}

impl FromStr for RateUnit {
    type Err = RateLimitRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_end_matches('s') {
            "second" | "sec" => Ok(RateUnit::Second),
            "minute" | "min" => Ok(RateUnit::Minute),
            "hour" => Ok(RateUnit::Hour),
            "day" => Ok(RateUnit::Day),
            _ => Err(RateLimitRuleError::UnknownUnit(s.to_string())),
        }
    }
}

/// Errors from parsing a rate-limit rule string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitRuleError {
    #[error("invalid rate limit '{0}': expected '<count> per <unit>'")]
    Malformed(String),

    #[error("unknown rate limit unit '{0}'")]
    UnknownUnit(String),

    #[error("rate limit count and window must be greater than zero")]
    Zero,
}

/// At most `limit` hits per `multiplier` x `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RateLimitRule {
    pub limit: u32,
    pub multiplier: u32,
    pub unit: RateUnit,
}

impl RateLimitRule {
    pub fn new(limit: u32, multiplier: u32, unit: RateUnit) -> Self {
        Self {
            limit,
            multiplier,
            unit,
        }
    }

    /// Length of one window.
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.unit.seconds() * u64::from(self.multiplier))
    }
}

impl fmt::Display for RateLimitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} per {} {}", self.limit, self.multiplier, self.unit)
    }
}

impl FromStr for RateLimitRule {
    type Err = RateLimitRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RateLimitRuleError::Malformed(s.to_string());
        let normalized = s.trim().to_lowercase();
        let (count, window) = normalized
            .split_once(" per ")
            .or_else(|| normalized.split_once('/'))
            .ok_or_else(malformed)?;

        let limit: u32 = count.trim().parse().map_err(|_| malformed())?;

        let mut parts = window.split_whitespace();
        let first = parts.next().ok_or_else(malformed)?;
        let (multiplier, unit) = match first.parse::<u32>() {
            Ok(n) => (n, parts.next().ok_or_else(malformed)?),
            Err(_) => (1, first),
        };
        if parts.next().is_some() {
            return Err(malformed());
        }
        if limit == 0 || multiplier == 0 {
            return Err(RateLimitRuleError::Zero);
        }

        Ok(Self::new(limit, multiplier, unit.parse()?))
    }
}

impl TryFrom<String> for RateLimitRule {
    type Error = RateLimitRuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RateLimitRule> for String {
    fn from(rule: RateLimitRule) -> Self {
        rule.to_string()
    }
}

/// Outcome of recording one hit against a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The hit was counted; `remaining` hits are left in this window.
    Allowed { remaining: u32 },
    /// The window is exhausted; it resets after `retry_after`.
    Limited { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_per_syntax() {
        let rule: RateLimitRule = "10 per minute".parse().unwrap();
        assert_eq!(rule, RateLimitRule::new(10, 1, RateUnit::Minute));
        assert_eq!(rule.period(), Duration::from_secs(60));
    }

    #[test]
    fn test_parse_slash_syntax_and_plural() {
        let rule: RateLimitRule = "200/day".parse().unwrap();
        assert_eq!(rule, RateLimitRule::new(200, 1, RateUnit::Day));

        let rule: RateLimitRule = "5 per 30 seconds".parse().unwrap();
        assert_eq!(rule.period(), Duration::from_secs(30));

        let rule: RateLimitRule = "50 PER HOUR".parse().unwrap();
        assert_eq!(rule.unit, RateUnit::Hour);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            "ten per minute".parse::<RateLimitRule>(),
            Err(RateLimitRuleError::Malformed(_))
        ));
        assert!(matches!(
            "10 per fortnight".parse::<RateLimitRule>(),
            Err(RateLimitRuleError::UnknownUnit(_))
        ));
        assert_eq!(
            "0 per minute".parse::<RateLimitRule>(),
            Err(RateLimitRuleError::Zero)
        );
        assert!("10 minute".parse::<RateLimitRule>().is_err());
    }

    #[test]
    fn test_display_is_reparseable() {
        let rule: RateLimitRule = "10 per minute".parse().unwrap();
        assert_eq!(rule.to_string(), "10 per 1 minute");
        assert_eq!(rule.to_string().parse::<RateLimitRule>().unwrap(), rule);
    }

    #[test]
    fn test_serde_as_string() {
        let rules: Vec<RateLimitRule> =
            serde_json::from_str(r#"["200 per day", "50 per hour"]"#).unwrap();
        assert_eq!(rules[1], RateLimitRule::new(50, 1, RateUnit::Hour));
        assert!(serde_json::from_str::<RateLimitRule>(r#""lots""#).is_err());
    }
}
