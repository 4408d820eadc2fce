//! Stem naming, matching and pairing
//!
//! Two archives name the same stem independently ("Drums/kick.wav" vs
//! "kick.mp3"). Everything here works on the canonical stem name: the entry
//! name with its trailing extension and directory path removed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Prefix of macOS resource-fork entries that Finder adds to ZIP archives
pub const MACOS_METADATA_PREFIX: &str = "__MACOSX";

/// Which of the two uploaded archives a stem comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Version {
    A,
    B,
}

impl Version {
    /// Both versions, in display order
    pub const ALL: [Version; 2] = [Version::A, Version::B];

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::A => "A",
            Version::B => "B",
        }
    }

    pub fn other(&self) -> Version {
        match self {
            Version::A => Version::B,
            Version::B => Version::A,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "A" | "a" => Ok(Version::A),
            "B" | "b" => Ok(Version::B),
            other => Err(Error::InvalidInput(format!(
                "Unknown version '{}' (expected A or B)",
                other
            ))),
        }
    }
}

/// Derive the canonical stem name from a raw archive entry name
///
/// Strips a trailing extension (a final `.` followed by at least one
/// character that is neither `.` nor `/`), then keeps the last `/` segment.
/// When that leaves nothing (e.g. ".wav"), the raw name is returned as is.
///
/// ```
/// use weaver_common::canonical_name;
///
/// assert_eq!(canonical_name("Drums/kick.wav"), "kick");
/// assert_eq!(canonical_name("kick.mp3"), "kick");
/// ```
pub fn canonical_name(raw: &str) -> String {
    let stripped = match raw.rfind('.') {
        Some(dot) => {
            let ext = &raw[dot + 1..];
            if !ext.is_empty() && !ext.contains('/') {
                &raw[..dot]
            } else {
                raw
            }
        }
        None => raw,
    };

    match stripped.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => raw.to_string(),
    }
}

/// Last path segment of an entry name, extension kept
///
/// Mixed archives store stems flat under this name.
pub fn base_filename(raw: &str) -> &str {
    match raw.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => raw,
    }
}

/// Whether an archive entry name denotes a stem file
///
/// Directory entries and macOS metadata are never stems.
pub fn is_stem_entry(raw: &str) -> bool {
    !raw.ends_with('/') && !raw.starts_with(MACOS_METADATA_PREFIX)
}

/// Canonical names present in both stem lists
///
/// De-duplicated and ordered by first occurrence in `stems_b`, so identical
/// inputs always give identical output.
pub fn match_stems<A, B>(stems_a: &[A], stems_b: &[B]) -> Vec<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let names_a: HashSet<String> = stems_a
        .iter()
        .map(|s| canonical_name(s.as_ref()))
        .collect();

    let mut seen = HashSet::new();
    stems_b
        .iter()
        .map(|s| canonical_name(s.as_ref()))
        .filter(|name| names_a.contains(name))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Quality score per version of one stem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemScores {
    #[serde(rename = "A")]
    pub a: u32,
    #[serde(rename = "B")]
    pub b: u32,
}

impl StemScores {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    pub fn get(&self, version: Version) -> u32 {
        match version {
            Version::A => self.a,
            Version::B => self.b,
        }
    }

    /// Higher score wins; ties favor A
    pub fn preferred(&self) -> Version {
        if self.a >= self.b {
            Version::A
        } else {
            Version::B
        }
    }
}

/// Two versions of the same canonical stem, one of them selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StemPair {
    pub name: String,
    pub scores: StemScores,
    pub selected: Version,
}

impl StemPair {
    /// New pair with the default selection (the preferred version)
    pub fn new(name: impl Into<String>, scores: StemScores) -> Self {
        Self {
            name: name.into(),
            scores,
            selected: scores.preferred(),
        }
    }

    /// Version the scorer recommends
    pub fn recommended(&self) -> Version {
        self.scores.preferred()
    }

    /// Stable per-version identifier, e.g. "kick-A"
    pub fn stem_id(&self, version: Version) -> String {
        format!("{}-{}", self.name, version)
    }
}
