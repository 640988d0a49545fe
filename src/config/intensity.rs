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
use std::time::Duration;

use duration_string::DurationString;
use serde::Deserialize;

use super::error::ConfigError;
use crate::presets::{self, IntensityLevels};

/// A YAML representation of the base intensity levels. Missing levels keep
/// their defaults.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Intensity {
    light: Option<Level>,
    medium: Option<Level>,
    heavy: Option<Level>,
}

/// A single intensity level.
#[derive(Deserialize, Clone, Debug)]
pub struct Level {
    /// How long the level vibrates, e.g. `20ms`.
    duration: String,
    /// The level amplitude, 0-255.
    amplitude: u8,
}

impl Level {
    fn to_intensity(&self) -> Result<presets::Intensity, ConfigError> {
        let duration: Duration = DurationString::from_string(self.duration.clone())
            .map_err(|e| {
                ConfigError::Invalid(format!("bad intensity duration {}: {}", self.duration, e))
            })?
            .into();
        let duration_ms = u64::try_from(duration.as_millis()).map_err(|_| {
            ConfigError::Invalid(format!("intensity duration {} is too long", self.duration))
        })?;

        Ok(presets::Intensity::new(duration_ms, self.amplitude))
    }
}

impl Intensity {
    /// Resolves the configured levels on top of the defaults.
    pub fn levels(&self) -> Result<IntensityLevels, ConfigError> {
        let defaults = IntensityLevels::default();
        let resolve = |level: &Option<Level>, default: presets::Intensity| match level {
            Some(level) => level.to_intensity(),
            None => Ok(default),
        };

        Ok(IntensityLevels {
            light: resolve(&self.light, defaults.light)?,
            medium: resolve(&self.medium, defaults.medium)?,
            heavy: resolve(&self.heavy, defaults.heavy)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::*;

    fn parse(yaml: &str) -> Intensity {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_partial_levels_keep_defaults() {
        let intensity = parse(
            r#"
            light:
              duration: 30ms
              amplitude: 50
        "#,
        );

        let levels = intensity.levels().unwrap();
        assert_eq!(levels.light, presets::Intensity::new(30, 50));
        assert_eq!(levels.medium, IntensityLevels::default().medium);
        assert_eq!(levels.heavy, IntensityLevels::default().heavy);
    }

    #[test]
    fn test_bad_duration() {
        let intensity = parse(
            r#"
            heavy:
              duration: loud
              amplitude: 255
        "#,
        );

        assert!(matches!(intensity.levels(), Err(ConfigError::Invalid(_))));
    }
}
