// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home/Away preset mode.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ValueError;

use super::SetpointField;

/// Device-wide preset mode reported in the `MODE` settings field.
///
/// The preset decides which of the two setpoint fields is authoritative.
///
/// # Examples
///
/// ```
/// use airobot_lib::types::{PresetMode, SetpointField};
///
/// assert_eq!(PresetMode::from_raw(2), PresetMode::Away);
/// assert_eq!(PresetMode::from_raw(7), PresetMode::Home);
/// assert_eq!(PresetMode::Away.setpoint_field(), SetpointField::Away);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PresetMode {
    /// Regular comfort setpoint (`MODE = 1`).
    #[default]
    Home,
    /// Reduced setpoint while the home is empty (`MODE = 2`).
    Away,
}

impl PresetMode {
    /// All presets, in the order they are offered to users.
    pub const ALL: [Self; 2] = [Self::Home, Self::Away];

    /// Interprets a raw `MODE` value. Anything other than `2` is Home.
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        if raw == 2 { Self::Away } else { Self::Home }
    }

    /// Returns the raw `MODE` value.
    #[must_use]
    pub const fn as_raw(&self) -> i64 {
        match self {
            Self::Home => 1,
            Self::Away => 2,
        }
    }

    /// Returns the preset name as shown to users.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }

    /// Returns the settings field holding the setpoint for this preset.
    #[must_use]
    pub const fn setpoint_field(&self) -> SetpointField {
        match self {
            Self::Home => SetpointField::Home,
            Self::Away => SetpointField::Away,
        }
    }
}

impl fmt::Display for PresetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetMode {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "away" => Ok(Self::Away),
            _ => Err(ValueError::InvalidPresetMode(s.to_string())),
        }
    }
}
