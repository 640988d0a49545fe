// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::capabilities::Platform;
use crate::config;

pub mod log;
pub mod mock;

/// Amplitudes below this fire light taps.
pub const MEDIUM_TAP_THRESHOLD: i32 = 86;
/// Amplitudes at or above this fire heavy taps.
pub const HEAVY_TAP_THRESHOLD: i32 = 171;

/// Failures reported by a platform vibration primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("{primitive} failed on {device}: {reason}")]
    Primitive {
        device: String,
        primitive: &'static str,
        reason: String,
    },

    #[error("Unknown haptic device: {0}")]
    UnknownDevice(String),
}

/// A discrete haptic event fired by a feedback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TapKind {
    Light,
    Medium,
    Heavy,
    Selection,
    Success,
    Warning,
    Failure,
}

impl TapKind {
    /// Buckets a 0-255 amplitude into a light, medium or heavy impact.
    pub fn for_amplitude(amplitude: i32) -> TapKind {
        if amplitude < MEDIUM_TAP_THRESHOLD {
            TapKind::Light
        } else if amplitude < HEAVY_TAP_THRESHOLD {
            TapKind::Medium
        } else {
            TapKind::Heavy
        }
    }
}

impl fmt::Display for TapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TapKind::Light => "light",
            TapKind::Medium => "medium",
            TapKind::Heavy => "heavy",
            TapKind::Selection => "selection",
            TapKind::Success => "success",
            TapKind::Warning => "warning",
            TapKind::Failure => "failure",
        };
        write!(f, "{}", name)
    }
}

/// The vibration primitives a platform exposes.
///
/// Android devices implement the vibrate/waveform family, iOS devices the tap
/// family. Waveform durations alternate off/on starting with off; a repeat
/// index of -1 plays once.
pub trait Device: fmt::Display + std::marker::Send + std::marker::Sync {
    /// Returns the name of the device.
    fn name(&self) -> String;

    /// The platform family of the device.
    fn platform(&self) -> Platform;

    /// API level on Android, major OS version on iOS.
    fn os_version(&self) -> u32;

    /// Whether the device has true haptic taps rather than a plain vibrator.
    fn is_haptics_supported(&self) -> bool;

    /// Vibrates for the given duration at the default amplitude.
    fn vibrate(&self, duration_ms: u64) -> Result<(), PlatformError>;

    /// The coarse system vibration, with no control over duration.
    fn vibrate_default(&self) -> Result<(), PlatformError>;

    /// Vibrates for the given duration at the given amplitude.
    fn vibrate_with_amplitude(&self, duration_ms: u64, amplitude: u8)
        -> Result<(), PlatformError>;

    /// Plays an on/off waveform.
    fn play_waveform(&self, durations: &[u64], repeat_index: i32) -> Result<(), PlatformError>;

    /// Plays a waveform with per-segment amplitudes.
    fn play_waveform_with_amplitudes(
        &self,
        durations: &[u64],
        amplitudes: &[u8],
        repeat_index: i32,
    ) -> Result<(), PlatformError>;

    /// Stops any active vibration.
    fn cancel(&self) -> Result<(), PlatformError>;

    /// Prepares the feedback generators ahead of the first tap.
    fn prepare_taps(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    /// Releases the feedback generators.
    fn release_taps(&self) -> Result<(), PlatformError> {
        Ok(())
    }

    /// Fires a single haptic tap.
    fn fire_tap(&self, tap: TapKind) -> Result<(), PlatformError>;
}

/// Gets a device for the given configuration.
pub fn get_device(config: &config::Device) -> Result<Arc<dyn Device>, PlatformError> {
    let name = config.name();
    if name.starts_with("mock") {
        return Ok(Arc::new(mock::Device::from_config(config)));
    }
    if name.starts_with("log") {
        return Ok(Arc::new(log::Device::from_config(config)));
    }

    Err(PlatformError::UnknownDevice(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tap_buckets_are_inclusive_on_lower_edge() {
        assert_eq!(TapKind::for_amplitude(0), TapKind::Light);
        assert_eq!(TapKind::for_amplitude(50), TapKind::Light);
        assert_eq!(TapKind::for_amplitude(85), TapKind::Light);
        assert_eq!(TapKind::for_amplitude(86), TapKind::Medium);
        assert_eq!(TapKind::for_amplitude(170), TapKind::Medium);
        assert_eq!(TapKind::for_amplitude(171), TapKind::Heavy);
        assert_eq!(TapKind::for_amplitude(255), TapKind::Heavy);
    }

    #[test]
    fn get_device_selects_by_prefix() {
        let mock = get_device(&config::Device::new("mock-android", Platform::Android, 30)).unwrap();
        assert_eq!(mock.platform(), Platform::Android);
        assert_eq!(mock.os_version(), 30);
        assert_eq!(mock.to_string(), "mock-android (Mock)");

        let log = get_device(&config::Device::new("log-ios", Platform::Ios, 17)).unwrap();
        assert_eq!(log.platform(), Platform::Ios);

        assert!(matches!(
            get_device(&config::Device::new("vibrator0", Platform::Android, 30)),
            Err(PlatformError::UnknownDevice(_))
        ));
    }
}
