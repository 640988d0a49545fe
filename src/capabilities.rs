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
use std::{fmt, sync::OnceLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::platform::Device;

/// Android API level that introduced amplitude control and waveform effects.
pub const AMPLITUDE_API_LEVEL: u32 = 26;

/// iOS device generations without a Taptic Engine.
const IOS_GENERATIONS_WITHOUT_HAPTICS: &[&str] = &[
    "iPhone3G",
    "iPhone3GS",
    "iPhone4",
    "iPhone4S",
    "iPhone5",
    "iPhone5C",
    "iPhone5S",
    "iPhone6",
    "iPhone6Plus",
    "iPhone6S",
    "iPhone6SPlus",
    "iPhoneSE1Gen",
    "iPad1Gen",
    "iPad2Gen",
    "iPad3Gen",
    "iPad4Gen",
    "iPad5Gen",
    "iPadAir1",
    "iPadAir2",
    "iPadMini1Gen",
    "iPadMini2Gen",
    "iPadMini3Gen",
    "iPadMini4Gen",
    "iPadPro10Inch1Gen",
    "iPadPro10Inch2Gen",
    "iPadPro11Inch",
    "iPadPro1Gen",
    "iPadPro2Gen",
    "iPadPro3Gen",
    "iPadUnknown",
    "iPodTouch1Gen",
    "iPodTouch2Gen",
    "iPodTouch3Gen",
    "iPodTouch4Gen",
    "iPodTouch5Gen",
    "iPodTouch6Gen",
];

/// The platform family a device belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Android => write!(f, "Android"),
            Platform::Ios => write!(f, "iOS"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// What the current device can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    pub platform: Platform,
    /// API level on Android, major version on iOS.
    pub os_version: u32,
    pub amplitude_supported: bool,
    pub haptics_supported: bool,
}

impl CapabilitySet {
    pub fn android(api_level: u32) -> CapabilitySet {
        CapabilitySet {
            platform: Platform::Android,
            os_version: api_level,
            amplitude_supported: api_level >= AMPLITUDE_API_LEVEL,
            haptics_supported: false,
        }
    }

    pub fn ios(os_version: u32, haptics_supported: bool) -> CapabilitySet {
        CapabilitySet {
            platform: Platform::Ios,
            os_version,
            amplitude_supported: false,
            haptics_supported,
        }
    }

    pub fn other() -> CapabilitySet {
        CapabilitySet {
            platform: Platform::Other,
            os_version: 0,
            amplitude_supported: false,
            haptics_supported: false,
        }
    }

    /// Derives the capability set from what a device reports about itself.
    pub fn from_device(device: &dyn Device) -> CapabilitySet {
        match device.platform() {
            Platform::Android => CapabilitySet::android(device.os_version()),
            Platform::Ios => CapabilitySet::ios(device.os_version(), device.is_haptics_supported()),
            Platform::Other => CapabilitySet::other(),
        }
    }
}

/// Detects capabilities once and serves the memoized result afterwards.
/// Platform facts can't change while the process runs.
#[derive(Default)]
pub struct CapabilityDetector {
    detected: OnceLock<CapabilitySet>,
}

impl CapabilityDetector {
    pub fn new() -> CapabilityDetector {
        CapabilityDetector::default()
    }

    pub fn detect(&self, device: &dyn Device) -> CapabilitySet {
        *self.detected.get_or_init(|| {
            let capabilities = CapabilitySet::from_device(device);
            info!(
                device = device.name(),
                platform = %capabilities.platform,
                os_version = capabilities.os_version,
                amplitude = capabilities.amplitude_supported,
                haptics = capabilities.haptics_supported,
                "Detected haptic capabilities."
            );
            capabilities
        })
    }
}

/// Parses the API level out of an Android OS description, e.g.
/// `Android OS 8.0.0 / API-26 (OPR6.170623.013/4283548)`. The digits
/// directly after the first `-` are taken as the level.
pub fn parse_android_api_level(os: &str) -> Option<u32> {
    let (_, rest) = os.split_once('-')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Returns true unless the iOS device generation is known to lack haptics.
pub fn ios_generation_supports_haptics(generation: &str) -> bool {
    !IOS_GENERATIONS_WITHOUT_HAPTICS.contains(&generation)
}
