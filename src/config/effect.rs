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
use std::{io::Write, path::Path};

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ConfigError;
use crate::curve::{AmplitudeCurve, KeyframeCurve};
use crate::encoder::{self, EncodeError};
use crate::pattern::Pattern;
use crate::query::PatternRequest;

const DEFAULT_SAMPLE_INTERVAL: f64 = 0.1;

fn default_sample_interval() -> f64 {
    DEFAULT_SAMPLE_INTERVAL
}

/// A YAML representation of a custom vibration effect.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Effect {
    /// The name of the effect.
    name: String,

    /// Seconds between curve samples.
    #[serde(default = "default_sample_interval")]
    sample_interval: f64,

    /// Whether the effect re-triggers itself when it finishes.
    #[serde(default, rename = "loop")]
    looping: bool,

    /// Use a plain vibration where haptic taps are unavailable.
    #[serde(default)]
    fallback_to_plain_vibrate: bool,

    /// The amplitude curve.
    keys: KeyframeCurve,
}

impl Effect {
    /// Creates a new effect configuration.
    pub fn new(name: &str, sample_interval: f64, looping: bool, keys: KeyframeCurve) -> Effect {
        Effect {
            name: name.to_string(),
            sample_interval,
            looping,
            fallback_to_plain_vibrate: false,
            keys,
        }
    }

    /// Deserializes a file from the path into an effect configuration struct.
    pub fn deserialize(path: &Path) -> Result<Effect, ConfigError> {
        let effect = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Effect>()?;
        encoder::validate_interval(effect.sample_interval)
            .map_err(|e| ConfigError::Invalid(format!("effect {}: {}", effect.name, e)))?;
        Ok(effect)
    }

    /// Serialize and save an effect configuration struct to a file at given path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let serialized = serde_yml::to_string(self)?;
        info!(effect = self.name, path = %path.display(), "Saving effect.");

        let mut file = std::fs::File::create(path)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn fallback_to_plain_vibrate(&self) -> bool {
        self.fallback_to_plain_vibrate
    }

    pub fn curve(&self) -> &KeyframeCurve {
        &self.keys
    }

    /// How long one pass of the effect lasts, in seconds.
    pub fn period(&self) -> f64 {
        self.keys.last_sample_time()
    }

    /// Encodes the curve into a pattern.
    pub fn pattern(&self) -> Result<Pattern, EncodeError> {
        encoder::encode(&self.keys, self.sample_interval)
    }

    /// Builds the remote-trigger request for this effect.
    pub fn request(&self) -> Result<PatternRequest, EncodeError> {
        PatternRequest::from_curve(&self.keys, self.sample_interval)
    }
}
