// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness scaling between device percent and light level.
//!
//! The device reports brightness as a percentage (0-100), lights use a
//! level (0-255). Both directions round down, so a round trip loses at
//! most one percent.

/// Highest brightness percentage the device documents.
pub const MAX_PERCENT: u8 = 100;

/// Highest light level.
pub const MAX_LEVEL: u8 = 255;

/// Converts a device percentage to a light level, rounding down.
///
/// Percentages above 100 map to [`MAX_LEVEL`].
///
/// # Examples
///
/// ```
/// use ledmatrix_controller::types::percent_to_level;
///
/// assert_eq!(percent_to_level(0), 0);
/// assert_eq!(percent_to_level(50), 127);
/// assert_eq!(percent_to_level(100), 255);
/// ```
#[must_use]
pub fn percent_to_level(percent: u8) -> u8 {
    let level = u32::from(percent) * u32::from(MAX_LEVEL) / u32::from(MAX_PERCENT);
    u8::try_from(level).unwrap_or(MAX_LEVEL)
}

/// Converts a light level to a device percentage, rounding down.
///
/// # Examples
///
/// ```
/// use ledmatrix_controller::types::level_to_percent;
///
/// assert_eq!(level_to_percent(127), 49);
/// assert_eq!(level_to_percent(255), 100);
/// ```
#[must_use]
pub fn level_to_percent(level: u8) -> u8 {
    let percent = u32::from(level) * u32::from(MAX_PERCENT) / u32::from(MAX_LEVEL);
    u8::try_from(percent).unwrap_or(MAX_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_drifts_at_most_one() {
        for percent in 0..=MAX_PERCENT {
            let back = level_to_percent(percent_to_level(percent));
            assert!(
                percent.abs_diff(back) <= 1,
                "{percent} came back as {back}"
            );
        }
    }

    #[test]
    fn half_brightness() {
        assert_eq!(percent_to_level(50), 127);
        assert_eq!(level_to_percent(127), 49);
    }

    #[test]
    fn bounds_map_to_bounds() {
        assert_eq!(percent_to_level(0), 0);
        assert_eq!(percent_to_level(100), 255);
        assert_eq!(level_to_percent(0), 0);
        assert_eq!(level_to_percent(255), 100);
    }

    #[test]
    fn percent_above_range_caps_level() {
        assert_eq!(percent_to_level(101), 255);
        assert_eq!(percent_to_level(255), 255);
    }
}
