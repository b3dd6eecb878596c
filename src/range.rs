//! HTTP status code ranges.
//!
//! Ranges are written the way operators write them in config files:
//! `"502"` for a single code, `"500-599"` for an inclusive span.
//!
//! ```rust
//! use tsu_redirect::RangeSet;
//!
//! let ranges = RangeSet::parse(["404", "500-599"]).unwrap();
//! assert!(ranges.contains(503));
//! assert!(!ranges.contains(200));
//! ```

use std::str::FromStr;

use thiserror::Error;

/// A range string that is not `"n"` or `"low-high"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status code range `{input}`")]
pub struct ParseError {
    input: String,
}

impl ParseError {
    /// The offending input, verbatim.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// An inclusive `[low, high]` interval of status codes.
///
/// Bounds are any integer, so `"400-70000"` is a valid (if generous) range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    pub low: i64,
    pub high: i64,
}

impl CodeRange {
    pub fn contains(&self, code: u16) -> bool {
        let code = i64::from(code);
        self.low <= code && code <= self.high
    }
}

/// Splits on `-`. A lone code is duplicated into both bounds; anything past
/// the second token is ignored.
impl FromStr for CodeRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split('-');
        let low = tokens.next().unwrap_or(s);
        let high = tokens.next().unwrap_or(low);

        let parse = |token: &str| {
            token.parse::<i64>().map_err(|_| ParseError { input: s.to_owned() })
        };

        Ok(Self { low: parse(low)?, high: parse(high)? })
    }
}

/// Ordered, immutable set of [`CodeRange`]s.
///
/// Ranges may overlap and need not be sorted; lookup is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<CodeRange>,
}

impl RangeSet {
    /// Parses every range string, failing on the first bad one. No partial
    /// set is ever returned.
    pub fn parse<I, S>(inputs: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ranges = inputs
            .into_iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<CodeRange>, _>>()?;
        Ok(Self { ranges })
    }

    pub fn contains(&self, code: u16) -> bool {
        self.ranges.iter().any(|range| range.contains(code))
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CodeRange> {
        self.ranges.iter()
    }
}
