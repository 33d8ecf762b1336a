//! Capture device and flash mode value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{InvalidDeviceError, InvalidFlashModeError};

/// Camera facing used by the capture backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Front,
    Back,
}

impl Device {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
        }
    }

    /// The other camera
    pub const fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Device {
    type Err = InvalidDeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(Self::Front),
            "back" => Ok(Self::Back),
            _ => Err(InvalidDeviceError {
                input: s.to_string(),
            }),
        }
    }
}

/// Flash behaviour requested from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    #[default]
    Off,
    On,
    Auto,
    /// Torch mode, the light stays on while recording
    Light,
}

impl FlashMode {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
            Self::Auto => "auto",
            Self::Light => "light",
        }
    }

    /// Two-state toggle used by the flash button: off becomes light,
    /// anything else becomes off.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::Light,
            _ => Self::Off,
        }
    }
}

impl fmt::Display for FlashMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FlashMode {
    type Err = InvalidFlashModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "on" => Ok(Self::On),
            "auto" => Ok(Self::Auto),
            "light" | "torch" => Ok(Self::Light),
            _ => Err(InvalidFlashModeError {
                input: s.to_string(),
            }),
        }
    }
}
