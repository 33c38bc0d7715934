use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{NextVersionError, Result};

/// Pattern for the numeric triple embedded in a version string.
///
/// The first match wins; everything around it (a `v` or branch-label prefix,
/// a `-beta` style suffix) is discarded.
const VERSION_PATTERN: &str = r"\d+\.\d+\.\d+";

fn version_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("version pattern is valid"))
}

/// The version field an increment or decrement operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpUnit {
    Major,
    Minor,
    Patch,
}

impl BumpUnit {
    pub const ALL: [BumpUnit; 3] = [BumpUnit::Major, BumpUnit::Minor, BumpUnit::Patch];

    pub fn label(&self) -> &'static str {
        match self {
            BumpUnit::Major => "Major",
            BumpUnit::Minor => "Minor",
            BumpUnit::Patch => "Patch",
        }
    }
}

impl FromStr for BumpUnit {
    type Err = NextVersionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(BumpUnit::Major),
            "minor" => Ok(BumpUnit::Minor),
            "patch" => Ok(BumpUnit::Patch),
            _ => Err(NextVersionError::InvalidUnit(s.to_string())),
        }
    }
}

impl fmt::Display for BumpUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated three-part numeric version.
///
/// Holds the current `major.minor.patch` triple and derives the next or
/// previous version string for a requested unit. Surrounding decoration is
/// stripped on input and never reattached here; callers compose prefixes and
/// suffixes themselves (see [crate::branch::suggested_branch_name]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionState {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl VersionState {
    /// Parse a version from a raw string.
    ///
    /// An empty input yields `0.0.0`. Anything else must contain a
    /// `major.minor.patch` numeric triple somewhere in the text.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(VersionState::default());
        }

        let mut state = VersionState::default();
        state.set(raw)?;
        Ok(state)
    }

    /// Replace the stored triple with the one embedded in `raw`.
    ///
    /// Extracts the first substring matching `\d+.\d+.\d+` and discards all
    /// surrounding characters, so `"4.6.8"`, `"v4.6.8"`, `"Release-v4.6.8"`
    /// and `"4.6.8-beta"` all yield the same triple. Returns `&mut Self` for
    /// chaining.
    ///
    /// On failure the previous triple is left untouched.
    pub fn set(&mut self, raw: &str) -> Result<&mut Self> {
        let matched = version_regex().find(raw).ok_or_else(|| {
            NextVersionError::InvalidVersionFormat {
                input: raw.to_string(),
            }
        })?;

        // The pattern guarantees exactly three segments; parsing can still
        // fail on a segment too large for u64.
        let parts: Vec<&str> = matched.as_str().split('.').collect();
        let parse_segment = |segment: &str| {
            segment
                .parse::<u64>()
                .map_err(|_| NextVersionError::InvalidVersionFormat {
                    input: raw.to_string(),
                })
        };

        // Parse all three before assigning so a failed parse leaves the
        // previous triple untouched.
        let major = parse_segment(parts[0])?;
        let minor = parse_segment(parts[1])?;
        let patch = parse_segment(parts[2])?;

        self.major = major;
        self.minor = minor;
        self.patch = patch;

        Ok(self)
    }

    /// Derive the next version string for `unit`.
    ///
    /// Adds 1 to the selected field and zeroes every subordinate field:
    /// Major resets minor and patch, Minor resets patch, Patch resets
    /// nothing. The stored triple is not modified.
    pub fn increment(&self, unit: BumpUnit) -> String {
        match unit {
            BumpUnit::Major => format!("{}.0.0", self.major + 1),
            BumpUnit::Minor => format!("{}.{}.0", self.major, self.minor + 1),
            BumpUnit::Patch => format!("{}.{}.{}", self.major, self.minor, self.patch + 1),
        }
    }

    /// Derive the previous version string for `unit`.
    ///
    /// Mirror of [VersionState::increment] with subtraction and the same
    /// zeroing rule. Decrementing a field already at 0 produces `-1` in the
    /// output; callers needing a floor must check before calling.
    pub fn decrement(&self, unit: BumpUnit) -> String {
        let (major, minor, patch) = (self.major as i64, self.minor as i64, self.patch as i64);
        match unit {
            BumpUnit::Major => format!("{}.0.0", major - 1),
            BumpUnit::Minor => format!("{}.{}.0", major, minor - 1),
            BumpUnit::Patch => format!("{}.{}.{}", major, minor, patch - 1),
        }
    }
}

impl fmt::Display for VersionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(raw: &str) -> VersionState {
        VersionState::parse(raw).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let v = state("1.2.3");
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn test_parse_empty_defaults_to_zero() {
        let v = state("");
        assert_eq!(v, VersionState::default());
        assert_eq!(v.to_string(), "0.0.0");
    }

    #[test]
    fn test_parse_strips_decoration() {
        for raw in ["4.6.8", "v4.6.8", "Release-v4.6.8", "4.6.8-beta"] {
            let v = state(raw);
            assert_eq!((v.major, v.minor, v.patch), (4, 6, 8), "input: {}", raw);
        }
    }

    #[test]
    fn test_parse_takes_first_match() {
        let v = state("from 1.2.3 to 4.5.6");
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(VersionState::parse("not-a-version").is_err());
        assert!(VersionState::parse("1.2").is_err());
        assert!(VersionState::parse("v1.x.3").is_err());
    }

    #[test]
    fn test_failed_set_preserves_state() {
        let mut v = state("1.2.3");
        let err = v.set("not-a-version").unwrap_err();
        assert!(matches!(err, NextVersionError::InvalidVersionFormat { .. }));
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn test_oversized_segment_preserves_state() {
        let mut v = state("1.2.3");
        // 30 digits do not fit in u64
        assert!(v.set("999999999999999999999999999999.0.0").is_err());
        assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    }

    #[test]
    fn test_error_names_rejected_input() {
        let err = VersionState::parse("garbage").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("garbage"));
        assert!(msg.contains("major.minor.patch"));
    }

    #[test]
    fn test_set_is_chainable() {
        let mut v = VersionState::default();
        let result = v.set("2.0.1").unwrap().increment(BumpUnit::Patch);
        assert_eq!(result, "2.0.2");
    }

    #[test]
    fn test_increment_major_zeroes_subordinates() {
        assert_eq!(state("1.2.3").increment(BumpUnit::Major), "2.0.0");
    }

    #[test]
    fn test_increment_minor_zeroes_patch() {
        assert_eq!(state("1.2.3").increment(BumpUnit::Minor), "1.3.0");
    }

    #[test]
    fn test_increment_patch() {
        assert_eq!(state("1.2.3").increment(BumpUnit::Patch), "1.2.4");
    }

    #[test]
    fn test_increment_does_not_mutate() {
        let v = state("1.2.3");
        let _ = v.increment(BumpUnit::Major);
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_increment_from_decorated_input() {
        assert_eq!(state("Release-v2.10.4").increment(BumpUnit::Major), "3.0.0");
    }

    #[test]
    fn test_increment_from_default() {
        assert_eq!(VersionState::default().increment(BumpUnit::Patch), "0.0.1");
    }

    #[test]
    fn test_increment_past_suffix() {
        assert_eq!(state("2.9.9-beta").increment(BumpUnit::Patch), "2.9.10");
    }

    #[test]
    fn test_decrement_major_zeroes_subordinates() {
        assert_eq!(state("4.6.8").decrement(BumpUnit::Major), "3.0.0");
    }

    #[test]
    fn test_decrement_minor_zeroes_patch() {
        assert_eq!(state("4.6.8").decrement(BumpUnit::Minor), "4.5.0");
    }

    #[test]
    fn test_decrement_patch() {
        assert_eq!(state("0.0.1").decrement(BumpUnit::Patch), "0.0.0");
    }

    #[test]
    fn test_decrement_below_zero_is_not_clamped() {
        assert_eq!(state("0.1.0").decrement(BumpUnit::Major), "-1.0.0");
        assert_eq!(state("1.0.5").decrement(BumpUnit::Minor), "1.-1.0");
        assert_eq!(state("0.0.0").decrement(BumpUnit::Patch), "0.0.-1");
    }

    #[test]
    fn test_bump_unit_from_str() {
        assert_eq!("major".parse::<BumpUnit>().unwrap(), BumpUnit::Major);
        assert_eq!("Minor".parse::<BumpUnit>().unwrap(), BumpUnit::Minor);
        assert_eq!("PATCH".parse::<BumpUnit>().unwrap(), BumpUnit::Patch);
    }

    #[test]
    fn test_bump_unit_labels_round_trip() {
        for unit in BumpUnit::ALL {
            assert_eq!(unit.label().parse::<BumpUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn test_bump_unit_rejects_unknown() {
        let err = "premajor".parse::<BumpUnit>().unwrap_err();
        assert!(matches!(err, NextVersionError::InvalidUnit(_)));
        assert!(err.to_string().contains("premajor"));
    }

    #[test]
    fn test_large_fields() {
        let v = state("10000.20000.30000");
        assert_eq!(v.increment(BumpUnit::Minor), "10000.20001.0");
    }
}
