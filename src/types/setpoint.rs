// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Setpoint fields and tenths-of-degree conversion.

use std::fmt;

use crate::error::ValueError;

/// Settings field that stores a setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetpointField {
    /// `SETPOINT_TEMP`, used while the preset is Home.
    Home,
    /// `SETPOINT_TEMP_AWAY`, used while the preset is Away.
    Away,
}

impl SetpointField {
    /// Returns the JSON key used by the device.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "SETPOINT_TEMP",
            Self::Away => "SETPOINT_TEMP_AWAY",
        }
    }
}

impl fmt::Display for SetpointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A temperature expressed in tenths of a degree Celsius.
///
/// # Examples
///
/// ```
/// use airobot_lib::types::Tenths;
///
/// let t = Tenths::from_celsius(22.5)?;
/// assert_eq!(t.value(), 225);
/// assert!((Tenths::new(180).to_celsius() - 18.0).abs() < f64::EPSILON);
/// # Ok::<(), airobot_lib::ValueError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tenths(i64);

impl Tenths {
    /// Lowest temperature accepted for a write, in degrees Celsius.
    pub const MIN_CELSIUS: f64 = 0.0;
    /// Highest temperature accepted for a write, in degrees Celsius.
    pub const MAX_CELSIUS: f64 = 100.0;

    /// Wraps a raw device value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Converts degrees Celsius to tenths, rounding to the nearest tenth.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if the value is not finite
    /// or lies outside `[MIN_CELSIUS, MAX_CELSIUS]`.
    pub fn from_celsius(celsius: f64) -> Result<Self, ValueError> {
        if !celsius.is_finite() || !(Self::MIN_CELSIUS..=Self::MAX_CELSIUS).contains(&celsius) {
            return Err(ValueError::InvalidTemperature {
                min: Self::MIN_CELSIUS,
                max: Self::MAX_CELSIUS,
                actual: celsius,
            });
        }
        // Bounded to [0, 1000] by the check above.
        #[allow(clippy::cast_possible_truncation)]
        let raw = (celsius * 10.0).round() as i64;
        Ok(Self(raw))
    }

    /// Returns the raw value in tenths.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_celsius(&self) -> f64 {
        self.0 as f64 / 10.0
    }
}
