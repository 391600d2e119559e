//! Operating mode and acting direction.
//!
//! Both are closed enums. Hosts may still hand over the loose encodings used
//! by front-ends and config files (integers or case-insensitive text); those
//! are resolved here, at the boundary, and anything else is rejected.
//!
//! | Value | Integer | Text |
//! |---|---|---|
//! | `Mode::Automatic` | 1 | `automatic`, `auto` |
//! | `Mode::Manual` | 0 | `manual` |
//! | `Direction::Direct` | 0 | `direct` |
//! | `Direction::Reverse` | 1 | `reverse` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ControllerError;

/// Loose encoding of a mode or direction as found in a config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Encoded {
    Number(i64),
    Text(String),
}

// ─── Mode ───────────────────────────────────────────────────────────

/// Whether `compute` is active.
///
/// `Manual` is the initial state. Only the `Manual → Automatic` transition
/// has a side effect (bumpless initialisation of the controller).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "Encoded")]
#[repr(u8)]
pub enum Mode {
    /// Output is set by the host; `compute` is a no-op.
    #[default]
    Manual = 0,
    /// Output is produced by the control law.
    Automatic = 1,
}

impl Mode {
    /// Convert from the integer encoding. Returns `None` for invalid values.
    #[inline]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Manual),
            1 => Some(Self::Automatic),
            _ => None,
        }
    }

    /// Short label used by status displays.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Automatic => "Auto",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mode {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("automatic") || s.eq_ignore_ascii_case("auto") {
            Ok(Self::Automatic)
        } else if s.eq_ignore_ascii_case("manual") {
            Ok(Self::Manual)
        } else {
            s.parse::<i64>()
                .ok()
                .and_then(Self::from_i64)
                .ok_or_else(|| ControllerError::InvalidMode(s.to_string()))
        }
    }
}

impl TryFrom<&str> for Mode {
    type Error = ControllerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<i64> for Mode {
    type Error = ControllerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_i64(value).ok_or_else(|| ControllerError::InvalidMode(value.to_string()))
    }
}

impl TryFrom<i32> for Mode {
    type Error = ControllerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<Encoded> for Mode {
    type Error = ControllerError;

    fn try_from(value: Encoded) -> Result<Self, Self::Error> {
        match value {
            Encoded::Number(n) => Self::try_from(n),
            Encoded::Text(s) => s.parse(),
        }
    }
}

// ─── Direction ──────────────────────────────────────────────────────

/// Sign relation between output and process measurement.
///
/// A `Direct` process rises when the output rises; a `Reverse` process
/// (e.g. cooling) falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "Encoded")]
#[repr(u8)]
pub enum Direction {
    #[default]
    Direct = 0,
    Reverse = 1,
}

impl Direction {
    /// Convert from the integer encoding. Returns `None` for invalid values.
    #[inline]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Direct),
            1 => Some(Self::Reverse),
            _ => None,
        }
    }

    /// Multiplier applied to the raw control-law output.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Direct => 1.0,
            Self::Reverse => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Reverse => "reverse",
        })
    }
}

impl FromStr for Direction {
    type Err = ControllerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("direct") {
            Ok(Self::Direct)
        } else if s.eq_ignore_ascii_case("reverse") {
            Ok(Self::Reverse)
        } else {
            s.parse::<i64>()
                .ok()
                .and_then(Self::from_i64)
                .ok_or_else(|| ControllerError::InvalidDirection(s.to_string()))
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = ControllerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<i64> for Direction {
    type Error = ControllerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_i64(value).ok_or_else(|| ControllerError::InvalidDirection(value.to_string()))
    }
}

impl TryFrom<i32> for Direction {
    type Error = ControllerError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<Encoded> for Direction {
    type Error = ControllerError;

    fn try_from(value: Encoded) -> Result<Self, Self::Error> {
        match value {
            Encoded::Number(n) => Self::try_from(n),
            Encoded::Text(s) => s.parse(),
        }
    }
}
