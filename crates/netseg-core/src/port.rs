//! Port expression grammar.
//!
//! A port expression is a comma-separated list of tokens. Each token is a
//! single port (`443`) or an inclusive range (`8000-9000`). Whitespace
//! around tokens and around the dash is ignored.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use thiserror::Error;

/// A malformed token within a port expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid port token '{token}': {reason}")]
pub struct PortRangeError {
    pub token: String,
    pub reason: String,
}

impl PortRangeError {
    fn new(token: &str, reason: impl Into<String>) -> Self {
        Self {
            token: token.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Parsed port expression: the union of its inclusive spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRange {
    spans: Vec<RangeInclusive<u16>>,
}

impl PortRange {
    pub fn parse(expr: &str) -> Result<Self, PortRangeError> {
        let spans = expr
            .split(',')
            .map(parse_token)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { spans })
    }

    pub fn contains(&self, port: u16) -> bool {
        self.spans.iter().any(|span| span.contains(&port))
    }
}

impl FromStr for PortRange {
    type Err = PortRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if span.start() == span.end() {
                write!(f, "{}", span.start())?;
            } else {
                write!(f, "{}-{}", span.start(), span.end())?;
            }
        }
        Ok(())
    }
}

fn parse_token(raw: &str) -> Result<RangeInclusive<u16>, PortRangeError> {
    let token = raw.trim();
    if token.is_empty() {
        return Err(PortRangeError::new(token, "empty token"));
    }

    match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_port(token, start)?;
            let end = parse_port(token, end)?;
            if start > end {
                return Err(PortRangeError::new(
                    token,
                    format!("range start {start} is greater than end {end}"),
                ));
            }
            Ok(start..=end)
        }
        None => {
            let port = parse_port(token, token)?;
            Ok(port..=port)
        }
    }
}

fn parse_port(token: &str, part: &str) -> Result<u16, PortRangeError> {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PortRangeError::new(
            token,
            format!("'{part}' is not a decimal port number"),
        ));
    }
    // Digits only, so the only possible failure is overflow.
    part.parse::<u16>()
        .map_err(|_| PortRangeError::new(token, format!("{part} is outside 0-65535")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn range_includes_both_bounds() {
        let range = PortRange::parse("8000-9000").unwrap();
        for port in [8000, 8500, 9000] {
            assert!(range.contains(port), "{port} should match");
        }
        assert!(!range.contains(7999));
        assert!(!range.contains(9001));
    }

    #[test]
    fn list_matches_exact_members_only() {
        let range = PortRange::parse("80,443").unwrap();
        assert!(range.contains(80));
        assert!(range.contains(443));
        assert!(!range.contains(81));
        assert!(!range.contains(442));
        assert!(!range.contains(8080));
    }

    #[test]
    fn mixed_tokens_with_whitespace() {
        let range = PortRange::parse(" 22 , 8000 - 8010,0").unwrap();
        assert!(range.contains(22));
        assert!(range.contains(8005));
        assert!(range.contains(0));
        assert_eq!(range.to_string(), "22,8000-8010,0");
    }

    #[test]
    fn extreme_bounds_are_valid() {
        let range = PortRange::parse("0-65535").unwrap();
        assert!(range.contains(0));
        assert!(range.contains(u16::MAX));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = PortRange::parse("443,9000-8000").unwrap_err();
        assert_eq!(err.token, "9000-8000");
        assert!(err.reason.contains("greater"));
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let err = PortRange::parse("65536").unwrap_err();
        assert_eq!(err.token, "65536");
        assert!(err.reason.contains("outside"));
    }

    #[test]
    fn non_numeric_tokens_are_rejected() {
        for expr in ["http", "80,abc", "+80", "-5", "1-2-3", "80,,443", ""] {
            assert!(PortRange::parse(expr).is_err(), "'{expr}' should fail");
        }
    }
}
