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
use std::{fmt, time::Duration};

use tracing::{info, span, Level};

use super::{PlatformError, TapKind};
use crate::capabilities::Platform;
use crate::config;
use crate::util::duration_millis;

/// A stand-in device for hosts without a vibrator. Every primitive is
/// reported through tracing and succeeds.
pub struct Device {
    name: String,
    platform: Platform,
    os_version: u32,
    haptics_supported: bool,
}

impl Device {
    pub fn from_config(config: &config::Device) -> Device {
        Device {
            name: config.name().to_string(),
            platform: config.platform(),
            os_version: config.os_version(),
            haptics_supported: config.haptics_supported(),
        }
    }
}

impl super::Device for Device {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn os_version(&self) -> u32 {
        self.os_version
    }

    fn is_haptics_supported(&self) -> bool {
        self.haptics_supported
    }

    fn vibrate(&self, duration_ms: u64) -> Result<(), PlatformError> {
        info!(
            device = self.name,
            duration = duration_millis(Duration::from_millis(duration_ms)),
            "Vibrate."
        );
        Ok(())
    }

    fn vibrate_default(&self) -> Result<(), PlatformError> {
        info!(device = self.name, "Vibrate (system default).");
        Ok(())
    }

    fn vibrate_with_amplitude(
        &self,
        duration_ms: u64,
        amplitude: u8,
    ) -> Result<(), PlatformError> {
        info!(
            device = self.name,
            duration = duration_millis(Duration::from_millis(duration_ms)),
            amplitude,
            "Vibrate with amplitude."
        );
        Ok(())
    }

    fn play_waveform(&self, durations: &[u64], repeat_index: i32) -> Result<(), PlatformError> {
        let span = span!(Level::INFO, "waveform (log)");
        let _enter = span.enter();

        info!(
            device = self.name,
            ?durations,
            repeat = repeat_index,
            "Playing waveform."
        );
        Ok(())
    }

    fn play_waveform_with_amplitudes(
        &self,
        durations: &[u64],
        amplitudes: &[u8],
        repeat_index: i32,
    ) -> Result<(), PlatformError> {
        let span = span!(Level::INFO, "waveform (log)");
        let _enter = span.enter();

        info!(
            device = self.name,
            ?durations,
            ?amplitudes,
            repeat = repeat_index,
            "Playing waveform with amplitudes."
        );
        Ok(())
    }

    fn cancel(&self) -> Result<(), PlatformError> {
        info!(device = self.name, "Cancelling vibration.");
        Ok(())
    }

    fn prepare_taps(&self) -> Result<(), PlatformError> {
        info!(device = self.name, "Preparing feedback generators.");
        Ok(())
    }

    fn release_taps(&self) -> Result<(), PlatformError> {
        info!(device = self.name, "Releasing feedback generators.");
        Ok(())
    }

    fn fire_tap(&self, tap: TapKind) -> Result<(), PlatformError> {
        info!(device = self.name, %tap, "Tap.");
        Ok(())
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Log)", self.name)
    }
}
