//! SMART-style normalization codes.
//!
//! A code is three characters: the wdf normalization, the idf normalization
//! and the overall weight normalization, e.g. `"ntn"` or `"Lpn"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SerializationError};

/// Within-document frequency normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WdfNorm {
    #[default]
    None = 0,
    Boolean = 1,
    Square = 2,
    Log = 3,
    Pivoted = 4,
    LogAverage = 5,
}

/// Inverse document frequency normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum IdfNorm {
    None = 0,
    #[default]
    Tfidf = 1,
    Square = 2,
    Freq = 3,
    Prob = 4,
    Pivoted = 5,
}

/// Overall weight normalization. Only the identity exists so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum WtNorm {
    #[default]
    None = 0,
}

impl WdfNorm {
    pub fn from_code(c: u8) -> Option<Self> {
        match c {
            b'n' => Some(Self::None),
            b'b' => Some(Self::Boolean),
            b's' => Some(Self::Square),
            b'l' => Some(Self::Log),
            b'P' => Some(Self::Pivoted),
            b'L' => Some(Self::LogAverage),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::None => 'n',
            Self::Boolean => 'b',
            Self::Square => 's',
            Self::Log => 'l',
            Self::Pivoted => 'P',
            Self::LogAverage => 'L',
        }
    }
}

impl IdfNorm {
    pub fn from_code(c: u8) -> Option<Self> {
        match c {
            b'n' => Some(Self::None),
            b't' => Some(Self::Tfidf),
            b's' => Some(Self::Square),
            b'f' => Some(Self::Freq),
            b'p' => Some(Self::Prob),
            b'P' => Some(Self::Pivoted),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::None => 'n',
            Self::Tfidf => 't',
            Self::Square => 's',
            Self::Freq => 'f',
            Self::Prob => 'p',
            Self::Pivoted => 'P',
        }
    }
}

impl WtNorm {
    pub fn from_code(c: u8) -> Option<Self> {
        match c {
            b'n' => Some(Self::None),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::None => 'n',
        }
    }
}

impl TryFrom<u8> for WdfNorm {
    type Error = SerializationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Boolean),
            2 => Ok(Self::Square),
            3 => Ok(Self::Log),
            4 => Ok(Self::Pivoted),
            5 => Ok(Self::LogAverage),
            _ => Err(SerializationError::UnknownVariant {
                field: "wdf_norm",
                value,
            }),
        }
    }
}

impl TryFrom<u8> for IdfNorm {
    type Error = SerializationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Tfidf),
            2 => Ok(Self::Square),
            3 => Ok(Self::Freq),
            4 => Ok(Self::Prob),
            5 => Ok(Self::Pivoted),
            _ => Err(SerializationError::UnknownVariant {
                field: "idf_norm",
                value,
            }),
        }
    }
}

impl TryFrom<u8> for WtNorm {
    type Error = SerializationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            _ => Err(SerializationError::UnknownVariant {
                field: "wt_norm",
                value,
            }),
        }
    }
}

/// The resolved `(wdf, idf, wt)` triple. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Normalization {
    #[serde(default)]
    pub wdf: WdfNorm,
    #[serde(default)]
    pub idf: IdfNorm,
    #[serde(default)]
    pub wt: WtNorm,
}

impl Normalization {
    pub const fn new(wdf: WdfNorm, idf: IdfNorm, wt: WtNorm) -> Self {
        Self { wdf, idf, wt }
    }
}

impl FromStr for Normalization {
    type Err = ConfigError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidNormalization(code.to_string());
        let &[wdf, idf, wt] = code.as_bytes() else {
            return Err(invalid());
        };
        Ok(Self {
            wdf: WdfNorm::from_code(wdf).ok_or_else(invalid)?,
            idf: IdfNorm::from_code(idf).ok_or_else(invalid)?,
            wt: WtNorm::from_code(wt).ok_or_else(invalid)?,
        })
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.wdf.code(), self.idf.code(), self.wt.code())
    }
}
