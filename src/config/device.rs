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
use serde::Deserialize;

use crate::capabilities::{ios_generation_supports_haptics, parse_android_api_level, Platform};

/// A YAML representation of the haptic device.
#[derive(Deserialize, Clone, Debug)]
pub struct Device {
    /// The device name. `mock...` and `log...` select the simulated devices.
    name: String,

    /// The platform family the device reports.
    platform: Platform,

    /// The API level (Android) or major OS version (iOS).
    os_version: Option<u32>,

    /// The OS description string, used to derive the Android API level when
    /// `os_version` is not set.
    os_description: Option<String>,

    /// The iOS device generation, used to derive haptics support.
    generation: Option<String>,

    /// Explicit haptics support. Overrides `generation`.
    haptics_supported: Option<bool>,
}

impl Device {
    /// New will create a new device configuration.
    pub fn new(name: &str, platform: Platform, os_version: u32) -> Device {
        Device {
            name: name.to_string(),
            platform,
            os_version: Some(os_version),
            os_description: None,
            generation: None,
            haptics_supported: None,
        }
    }

    /// Returns the device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the platform family.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the OS version, falling back to parsing the OS description.
    pub fn os_version(&self) -> u32 {
        self.os_version
            .or_else(|| {
                self.os_description
                    .as_deref()
                    .and_then(parse_android_api_level)
            })
            .unwrap_or(0)
    }

    /// Returns whether haptic taps are available. iOS devices support them
    /// unless their generation is on the deny-list; other platforms don't.
    pub fn haptics_supported(&self) -> bool {
        if let Some(supported) = self.haptics_supported {
            return supported;
        }
        match self.platform {
            Platform::Ios => self
                .generation
                .as_deref()
                .map_or(true, ios_generation_supports_haptics),
            Platform::Android | Platform::Other => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    fn parse(yaml: &str) -> Device {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_android_version_from_description() {
        let device = parse(
            r#"
            name: mock-android
            platform: android
            os_description: "Android OS 7.1.1 / API-25 (NMF26X)"
        "#,
        );

        assert_eq!(device.platform(), Platform::Android);
        assert_eq!(device.os_version(), 25);
        assert!(!device.haptics_supported());
    }

    #[test]
    fn test_explicit_version_wins() {
        let device = parse(
            r#"
            name: mock-android
            platform: android
            os_version: 30
            os_description: "Android OS 7.1.1 / API-25 (NMF26X)"
        "#,
        );

        assert_eq!(device.os_version(), 30);
    }

    #[test]
    fn test_ios_generation() {
        let old = parse(
            r#"
            name: mock-ios
            platform: ios
            os_version: 12
            generation: iPhone6S
        "#,
        );
        assert!(!old.haptics_supported());

        let new = parse(
            r#"
            name: mock-ios
            platform: ios
            os_version: 17
            generation: iPhone14Pro
        "#,
        );
        assert!(new.haptics_supported());

        let forced = parse(
            r#"
            name: mock-ios
            platform: ios
            generation: iPhone6S
            haptics_supported: true
        "#,
        );
        assert!(forced.haptics_supported());
        assert_eq!(forced.os_version(), 0);
    }
}
