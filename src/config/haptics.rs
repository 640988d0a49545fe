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
use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

use super::device::Device;
use super::error::ConfigError;
use super::intensity::Intensity;
use crate::presets::IntensityLevels;

/// The configuration for the haptics runtime.
#[derive(Deserialize, Clone, Debug)]
pub struct Haptics {
    /// The haptic device to drive.
    device: Device,

    /// Overrides for the base intensity levels.
    intensity: Option<Intensity>,

    /// Use a plain vibration where haptic taps are unavailable.
    #[serde(default)]
    fallback_to_plain_vibrate: bool,
}

impl Haptics {
    /// Creates a new haptics configuration.
    pub fn new(device: Device) -> Haptics {
        Haptics {
            device,
            intensity: None,
            fallback_to_plain_vibrate: false,
        }
    }

    /// Parse a haptics configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Haptics, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Haptics>()?)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// The intensity levels, with any overrides applied.
    pub fn levels(&self) -> Result<IntensityLevels, ConfigError> {
        match &self.intensity {
            Some(intensity) => intensity.levels(),
            None => Ok(IntensityLevels::default()),
        }
    }

    pub fn fallback_to_plain_vibrate(&self) -> bool {
        self.fallback_to_plain_vibrate
    }
}
