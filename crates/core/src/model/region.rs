use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the nine anatomical body areas content is partitioned by.
///
/// The set is closed: every region always has progress, a summary and a
/// local question bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Back,
    Thorax,
    Abdomen,
    Pelvis,
    Perineum,
    #[serde(rename = "upperlimb")]
    UpperLimb,
    #[serde(rename = "lowerlimb")]
    LowerLimb,
    Neck,
    Head,
}

impl Region {
    /// Number of regions.
    pub const COUNT: usize = 9;

    /// All regions in display order.
    pub const ALL: [Region; Self::COUNT] = [
        Region::Back,
        Region::Thorax,
        Region::Abdomen,
        Region::Pelvis,
        Region::Perineum,
        Region::UpperLimb,
        Region::LowerLimb,
        Region::Neck,
        Region::Head,
    ];

    /// Stable lowercase identifier used on the wire and in storage keys.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Region::Back => "back",
            Region::Thorax => "thorax",
            Region::Abdomen => "abdomen",
            Region::Pelvis => "pelvis",
            Region::Perineum => "perineum",
            Region::UpperLimb => "upperlimb",
            Region::LowerLimb => "lowerlimb",
            Region::Neck => "neck",
            Region::Head => "head",
        }
    }

    /// Position in [`Region::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Region::Back => "Back",
            Region::Thorax => "Thorax",
            Region::Abdomen => "Abdomen",
            Region::Pelvis => "Pelvis",
            Region::Perineum => "Perineum",
            Region::UpperLimb => "Upper Limb",
            Region::LowerLimb => "Lower Limb",
            Region::Neck => "Neck",
            Region::Head => "Head",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error type for parsing a region identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionParseError {
    raw: String,
}

impl fmt::Display for RegionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown region: {}", self.raw)
    }
}

impl std::error::Error for RegionParseError {}

impl FromStr for Region {
    type Err = RegionParseError;

    /// Accepts the storage key, case-insensitively, with or without a
    /// separator between "upper"/"lower" and "limb".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Region::ALL
            .into_iter()
            .find(|region| region.key() == normalized)
            .ok_or_else(|| RegionParseError { raw: s.to_string() })
    }
}
