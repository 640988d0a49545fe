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

use parking_lot::Mutex;
use tracing::debug;

use super::{PlatformError, TapKind};
use crate::capabilities::Platform;
use crate::config;

/// A primitive call received by the mock device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Vibrate(u64),
    VibrateDefault,
    VibrateWithAmplitude(u64, u8),
    PlayWaveform(Vec<u64>, i32),
    PlayWaveformWithAmplitudes(Vec<u64>, Vec<u8>, i32),
    Cancel,
    PrepareTaps,
    ReleaseTaps,
    Tap(TapKind),
}

/// A mock device. Doesn't vibrate anything, only records what it was asked to do.
#[derive(Clone)]
pub struct Device {
    name: String,
    platform: Platform,
    os_version: u32,
    haptics_supported: bool,
    calls: Arc<Mutex<Vec<Call>>>,
    /// Calls after this many successful ones fail.
    fail_after: Arc<Mutex<Option<usize>>>,
}

impl Device {
    /// Gets a mock device for the given platform.
    pub fn new(name: &str, platform: Platform, os_version: u32, haptics_supported: bool) -> Device {
        Device {
            name: name.to_string(),
            platform,
            os_version,
            haptics_supported,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_after: Arc::new(Mutex::new(None)),
        }
    }

    pub fn android(name: &str, api_level: u32) -> Device {
        Device::new(name, Platform::Android, api_level, false)
    }

    pub fn ios(name: &str, os_version: u32, haptics_supported: bool) -> Device {
        Device::new(name, Platform::Ios, os_version, haptics_supported)
    }

    pub fn from_config(config: &config::Device) -> Device {
        Device::new(
            config.name(),
            config.platform(),
            config.os_version(),
            config.haptics_supported(),
        )
    }

    /// Returns every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Clears the recorded calls.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    /// Makes every call after the first `successes` fail.
    pub fn fail_after(&self, successes: usize) {
        *self.fail_after.lock() = Some(successes);
    }

    fn record(&self, primitive: &'static str, call: Call) -> Result<(), PlatformError> {
        let mut calls = self.calls.lock();
        if let Some(successes) = *self.fail_after.lock() {
            if calls.len() >= successes {
                return Err(PlatformError::Primitive {
                    device: self.name.clone(),
                    primitive,
                    reason: "injected failure".to_string(),
                });
            }
        }
        debug!(device = self.name, ?call, "Mock primitive called.");
        calls.push(call);
        Ok(())
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
        self.record("vibrate", Call::Vibrate(duration_ms))
    }

    fn vibrate_default(&self) -> Result<(), PlatformError> {
        self.record("vibrate_default", Call::VibrateDefault)
    }

    fn vibrate_with_amplitude(
        &self,
        duration_ms: u64,
        amplitude: u8,
    ) -> Result<(), PlatformError> {
        self.record(
            "vibrate_with_amplitude",
            Call::VibrateWithAmplitude(duration_ms, amplitude),
        )
    }

    fn play_waveform(&self, durations: &[u64], repeat_index: i32) -> Result<(), PlatformError> {
        self.record(
            "play_waveform",
            Call::PlayWaveform(durations.to_vec(), repeat_index),
        )
    }

    fn play_waveform_with_amplitudes(
        &self,
        durations: &[u64],
        amplitudes: &[u8],
        repeat_index: i32,
    ) -> Result<(), PlatformError> {
        self.record(
            "play_waveform_with_amplitudes",
            Call::PlayWaveformWithAmplitudes(durations.to_vec(), amplitudes.to_vec(), repeat_index),
        )
    }

    fn cancel(&self) -> Result<(), PlatformError> {
        self.record("cancel", Call::Cancel)
    }

    fn prepare_taps(&self) -> Result<(), PlatformError> {
        self.record("prepare_taps", Call::PrepareTaps)
    }

    fn release_taps(&self) -> Result<(), PlatformError> {
        self.record("release_taps", Call::ReleaseTaps)
    }

    fn fire_tap(&self, tap: TapKind) -> Result<(), PlatformError> {
        self.record("fire_tap", Call::Tap(tap))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Mock)", self.name,)
    }
}
