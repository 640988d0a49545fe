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
//! Routes haptic requests to the platform primitives the device supports.
//!
//! Android gets waveforms: a single non-blocking call, with amplitudes from
//! API 26 onwards and plain on/off timings before that. iOS only has discrete
//! taps, so custom patterns are replayed by sleeping through each wait and
//! firing a burst of taps for each vibration. That replay blocks the calling
//! thread until the whole pattern has been walked and can't be cancelled; use
//! [`Dispatcher::spawn_replay`] to keep it off threads that must stay responsive.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::{debug, info, span, warn, Level};

use crate::capabilities::{CapabilitySet, Platform};
use crate::pattern::Pattern;
use crate::platform::{Device, PlatformError, TapKind};
use crate::presets::{FeedbackKind, IntensityLevels, PresetLibrary};

/// Silent override used to stop whatever the vibrator is doing.
const SILENCE_DURATIONS: [u64; 2] = [0, 20];
const SILENCE_AMPLITUDES: [i32; 2] = [0, 0];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("haptic dispatch failed: {0}")]
    Platform(#[from] PlatformError),

    #[error("replay thread panicked")]
    ReplayPanicked,
}

/// What to play: a canned feedback kind or a custom pattern.
#[derive(Debug, Clone, Copy)]
pub enum Request<'a> {
    Feedback(FeedbackKind),
    Custom(&'a Pattern),
}

impl From<FeedbackKind> for Request<'_> {
    fn from(kind: FeedbackKind) -> Self {
        Request::Feedback(kind)
    }
}

impl<'a> From<&'a Pattern> for Request<'a> {
    fn from(pattern: &'a Pattern) -> Self {
        Request::Custom(pattern)
    }
}

type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Dispatches haptic requests to a device.
#[derive(Clone)]
pub struct Dispatcher {
    device: Arc<dyn Device>,
    capabilities: CapabilitySet,
    presets: Arc<PresetLibrary>,
    /// Whether the iOS feedback generators have been prepared.
    taps_prepared: Arc<AtomicBool>,
    sleeper: Sleeper,
}

impl Dispatcher {
    /// Creates a dispatcher for the device, with presets built from `levels`.
    pub fn new(
        device: Arc<dyn Device>,
        capabilities: CapabilitySet,
        levels: IntensityLevels,
    ) -> Dispatcher {
        Dispatcher {
            device,
            capabilities,
            presets: Arc::new(PresetLibrary::new(levels)),
            taps_prepared: Arc::new(AtomicBool::new(false)),
            sleeper: Arc::new(spin_sleep::sleep),
        }
    }

    /// Replaces the blocking sleep used between replayed taps.
    pub fn with_sleeper<F>(mut self, sleeper: F) -> Dispatcher
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn device(&self) -> &Arc<dyn Device> {
        &self.device
    }

    /// Triggers a feedback kind or a custom pattern.
    ///
    /// Never blocks on Android. Custom patterns on iOS are replayed with
    /// [`Dispatcher::replay_synchronously`] and block until done. Unknown
    /// platforms ignore every request.
    pub fn trigger<'a, R>(&self, request: R, fallback_to_plain_vibrate: bool) -> Result<(), DispatchError>
    where
        R: Into<Request<'a>>,
    {
        let request = request.into();
        if let Request::Feedback(FeedbackKind::None) = request {
            return Ok(());
        }

        let span = span!(Level::DEBUG, "trigger");
        let _enter = span.enter();

        match (self.capabilities.platform, request) {
            (Platform::Android, Request::Feedback(kind)) => match self.presets.get(kind) {
                Some(pattern) => self.play_android(pattern),
                None => Ok(()),
            },
            (Platform::Android, Request::Custom(pattern)) => self.play_android(pattern),
            (Platform::Ios, Request::Feedback(kind)) => {
                self.trigger_ios(kind, fallback_to_plain_vibrate)
            }
            (Platform::Ios, Request::Custom(pattern)) => {
                self.replay_synchronously(pattern, fallback_to_plain_vibrate)
            }
            (Platform::Other, _) => {
                debug!(device = %self.device, "Ignoring haptics on unknown platform.");
                Ok(())
            }
        }
    }

    /// Walks the pattern on the calling thread: sleep through each wait, then
    /// fire taps for the vibration that follows it. The first failing
    /// primitive abandons the rest of the pattern.
    ///
    /// Only iOS replays pattern-by-tap; on other platforms this is the same as
    /// triggering the pattern.
    pub fn replay_synchronously(
        &self,
        pattern: &Pattern,
        fallback_to_plain_vibrate: bool,
    ) -> Result<(), DispatchError> {
        if self.capabilities.platform != Platform::Ios {
            return self.trigger(pattern, fallback_to_plain_vibrate);
        }
        if !self.capabilities.haptics_supported {
            return self.fallback(fallback_to_plain_vibrate);
        }

        self.prepare_taps()?;
        let medium_ms = self.presets.levels().medium.duration_ms.max(1);
        info!(
            device = %self.device,
            pattern = %pattern,
            "Replaying pattern as taps."
        );

        for (wait, vibrate) in pattern.pulses() {
            if wait.duration_ms > 0 {
                (self.sleeper)(Duration::from_millis(wait.duration_ms));
            }

            let taps = (vibrate.duration_ms as f64 / medium_ms as f64).round() as u64;
            let tap = TapKind::for_amplitude(vibrate.amplitude);
            for _ in 0..taps {
                self.device.fire_tap(tap)?;
            }
        }

        Ok(())
    }

    /// Replays the pattern on a background thread.
    pub fn spawn_replay(
        &self,
        pattern: Pattern,
        fallback_to_plain_vibrate: bool,
    ) -> JoinHandle<Result<(), DispatchError>> {
        let dispatcher = self.clone();
        thread::spawn(move || dispatcher.trigger(&pattern, fallback_to_plain_vibrate))
    }

    /// A plain default vibration.
    pub fn vibrate(&self, fallback_to_plain_vibrate: bool) -> Result<(), DispatchError> {
        let medium = self.presets.levels().medium;
        match self.capabilities.platform {
            Platform::Android => Ok(self.device.vibrate(medium.duration_ms)?),
            Platform::Ios => self.trigger_ios(FeedbackKind::MediumImpact, fallback_to_plain_vibrate),
            Platform::Other => Ok(()),
        }
    }

    /// Vibrates once at the given amplitude, or at the default amplitude on
    /// devices without amplitude control.
    pub fn vibrate_for(&self, duration_ms: u64, amplitude: u8) -> Result<(), DispatchError> {
        if self.capabilities.platform != Platform::Android {
            return Ok(());
        }
        if self.capabilities.amplitude_supported {
            self.device.vibrate_with_amplitude(duration_ms, amplitude)?;
        } else {
            self.device.vibrate(duration_ms)?;
        }
        Ok(())
    }

    /// Cancels the active vibration. Only the Android path can be cancelled.
    pub fn cancel(&self) -> Result<(), DispatchError> {
        if self.capabilities.platform == Platform::Android {
            self.device.cancel()?;
        }
        Ok(())
    }

    /// Overrides the vibrator with a short silent pattern.
    pub fn silence(&self) -> Result<(), DispatchError> {
        let silence = Pattern::from_parts(SILENCE_DURATIONS.to_vec(), SILENCE_AMPLITUDES.to_vec());
        self.trigger(&silence, false)
    }

    /// Releases the iOS feedback generators. They are prepared again on the
    /// next tap.
    pub fn release(&self) -> Result<(), DispatchError> {
        if self.capabilities.platform == Platform::Ios
            && self.taps_prepared.swap(false, Ordering::AcqRel)
        {
            self.device.release_taps()?;
        }
        Ok(())
    }

    fn play_android(&self, pattern: &Pattern) -> Result<(), DispatchError> {
        debug!(device = %self.device, pattern = %pattern, "Playing waveform.");
        if self.capabilities.amplitude_supported {
            self.device.play_waveform_with_amplitudes(
                pattern.durations(),
                &pattern.clamped_amplitudes(),
                pattern.repeat_index(),
            )?;
            return Ok(());
        }

        match (pattern.on_off(), pattern.repeat()) {
            ([0, duration_ms], None) => self.device.vibrate(*duration_ms)?,
            (durations, _) => self.device.play_waveform(durations, pattern.repeat_index())?,
        }
        Ok(())
    }

    fn trigger_ios(
        &self,
        kind: FeedbackKind,
        fallback_to_plain_vibrate: bool,
    ) -> Result<(), DispatchError> {
        if !self.capabilities.haptics_supported {
            return self.fallback(fallback_to_plain_vibrate);
        }

        let tap = match kind {
            FeedbackKind::None => return Ok(()),
            FeedbackKind::Selection => TapKind::Selection,
            FeedbackKind::Success => TapKind::Success,
            FeedbackKind::Warning => TapKind::Warning,
            FeedbackKind::Failure => TapKind::Failure,
            FeedbackKind::LightImpact => TapKind::Light,
            FeedbackKind::MediumImpact => TapKind::Medium,
            FeedbackKind::HeavyImpact => TapKind::Heavy,
        };
        self.prepare_taps()?;
        self.device.fire_tap(tap)?;
        Ok(())
    }

    fn fallback(&self, fallback_to_plain_vibrate: bool) -> Result<(), DispatchError> {
        if fallback_to_plain_vibrate {
            warn!(
                device = %self.device,
                "Haptics unsupported, falling back to plain vibration."
            );
            self.device.vibrate_default()?;
        }
        Ok(())
    }

    fn prepare_taps(&self) -> Result<(), DispatchError> {
        if self.taps_prepared.load(Ordering::Acquire) {
            return Ok(());
        }
        self.device.prepare_taps()?;
        self.taps_prepared.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::encoder;
    use crate::platform::mock::{self, Call};
    use crate::presets::Intensity;
    use crate::testutil::eventually;

    fn dispatcher(device: &mock::Device, capabilities: CapabilitySet) -> Dispatcher {
        Dispatcher::new(
            Arc::new(device.clone()),
            capabilities,
            IntensityLevels::default(),
        )
        .with_sleeper(|_| {})
    }

    fn android(api_level: u32) -> (mock::Device, Dispatcher) {
        let device = mock::Device::android("mock-android", api_level);
        let dispatcher = dispatcher(&device, CapabilitySet::android(api_level));
        (device, dispatcher)
    }

    fn ios(haptics: bool) -> (mock::Device, Dispatcher) {
        let device = mock::Device::ios("mock-ios", 17, haptics);
        let dispatcher = dispatcher(&device, CapabilitySet::ios(17, haptics));
        (device, dispatcher)
    }

    fn pattern(durations: &[u64], amplitudes: &[i32]) -> Pattern {
        Pattern::new(durations.to_vec(), amplitudes.to_vec(), None).unwrap()
    }

    #[test]
    fn none_never_touches_the_device() {
        let capabilities = [
            CapabilitySet::android(21),
            CapabilitySet::android(30),
            CapabilitySet::ios(17, true),
            CapabilitySet::ios(12, false),
            CapabilitySet::other(),
        ];
        for capabilities in capabilities {
            let device = mock::Device::new(
                "mock",
                capabilities.platform,
                capabilities.os_version,
                capabilities.haptics_supported,
            );
            let dispatcher = dispatcher(&device, capabilities);
            dispatcher.trigger(FeedbackKind::None, true).unwrap();
            dispatcher.trigger(FeedbackKind::None, false).unwrap();
            assert!(device.calls().is_empty(), "{:?}", capabilities);
        }
    }

    #[test]
    fn android_with_amplitude_plays_full_waveform() {
        let (device, dispatcher) = android(26);
        dispatcher.trigger(FeedbackKind::Success, false).unwrap();
        assert_eq!(
            device.calls(),
            vec![Call::PlayWaveformWithAmplitudes(
                vec![0, 20, 20, 80],
                vec![0, 40, 0, 255],
                -1
            )]
        );
    }

    #[test]
    fn android_without_amplitude_drops_amplitudes() {
        let (device, dispatcher) = android(21);
        let custom = pattern(&[0, 100, 50, 100], &[0, 128, 0, 255]);
        dispatcher.trigger(&custom, false).unwrap();
        assert_eq!(
            device.calls(),
            vec![Call::PlayWaveform(vec![0, 100, 50, 100], -1)]
        );
        assert!(!device
            .calls()
            .iter()
            .any(|call| matches!(call, Call::PlayWaveformWithAmplitudes(..))));
    }

    #[test]
    fn android_without_amplitude_reduces_single_pulse() {
        let (device, dispatcher) = android(21);
        dispatcher.trigger(FeedbackKind::HeavyImpact, false).unwrap();
        assert_eq!(device.calls(), vec![Call::Vibrate(80)]);

        device.reset();
        let delayed = pattern(&[30, 80], &[0, 255]);
        dispatcher.trigger(&delayed, false).unwrap();
        assert_eq!(device.calls(), vec![Call::PlayWaveform(vec![30, 80], -1)]);

        device.reset();
        let looping = Pattern::new(vec![0, 80], vec![0, 255], Some(0)).unwrap();
        dispatcher.trigger(&looping, false).unwrap();
        assert_eq!(device.calls(), vec![Call::PlayWaveform(vec![0, 80], 0)]);
    }

    #[test]
    fn android_clamps_encoded_amplitudes() {
        let (device, dispatcher) = android(30);
        let custom = encoder::pattern_from_samples(&[-0.2, 1.4], 0.1).unwrap();
        dispatcher.trigger(&custom, false).unwrap();
        assert_eq!(
            device.calls(),
            vec![Call::PlayWaveformWithAmplitudes(
                vec![100, 0, 0, 100],
                vec![0, 0, 0, 255],
                -1
            )]
        );
    }

    #[test]
    fn ios_kinds_fire_named_taps() {
        let (device, dispatcher) = ios(true);
        dispatcher.trigger(FeedbackKind::Success, false).unwrap();
        dispatcher.trigger(FeedbackKind::HeavyImpact, false).unwrap();
        assert_eq!(
            device.calls(),
            vec![
                Call::PrepareTaps,
                Call::Tap(TapKind::Success),
                Call::Tap(TapKind::Heavy)
            ]
        );
    }

    #[test]
    fn ios_without_haptics_falls_back_only_when_asked() {
        let (device, dispatcher) = ios(false);
        dispatcher.trigger(FeedbackKind::Warning, false).unwrap();
        assert!(device.calls().is_empty());

        dispatcher.trigger(FeedbackKind::Warning, true).unwrap();
        let custom = pattern(&[0, 80, 40, 80], &[0, 255, 0, 50]);
        dispatcher.trigger(&custom, true).unwrap();
        assert_eq!(device.calls(), vec![Call::VibrateDefault, Call::VibrateDefault]);
    }

    #[test]
    fn ios_replay_buckets_amplitudes_and_counts_taps() {
        let (device, dispatcher) = ios(true);
        let custom = pattern(
            &[0, 40, 0, 40, 0, 40, 0, 40, 0, 80],
            &[0, 50, 0, 86, 0, 171, 0, 255, 0, 120],
        );
        dispatcher.replay_synchronously(&custom, false).unwrap();
        assert_eq!(
            device.calls(),
            vec![
                Call::PrepareTaps,
                Call::Tap(TapKind::Light),
                Call::Tap(TapKind::Medium),
                Call::Tap(TapKind::Heavy),
                Call::Tap(TapKind::Heavy),
                Call::Tap(TapKind::Medium),
                Call::Tap(TapKind::Medium),
            ]
        );
    }

    #[test]
    fn ios_replay_sleeps_through_waits() {
        let device = mock::Device::ios("mock-ios", 17, true);
        let sleeps = Arc::new(Mutex::new(Vec::new()));
        let recorded = sleeps.clone();
        let dispatcher = Dispatcher::new(
            Arc::new(device.clone()),
            CapabilitySet::ios(17, true),
            IntensityLevels::default(),
        )
        .with_sleeper(move |duration| recorded.lock().push(duration));

        let curve_pattern = encoder::pattern_from_samples(&[0.0, 0.5, 0.0], 0.1).unwrap();
        dispatcher.trigger(&curve_pattern, false).unwrap();

        // Waits of zero length are skipped.
        assert_eq!(
            *sleeps.lock(),
            vec![Duration::from_millis(100), Duration::from_millis(100)]
        );
        // 100ms at the 40ms medium interval rounds to 3 taps.
        assert_eq!(
            device.calls(),
            vec![
                Call::PrepareTaps,
                Call::Tap(TapKind::Medium),
                Call::Tap(TapKind::Medium),
                Call::Tap(TapKind::Medium),
            ]
        );
    }

    #[test]
    fn ios_replay_abandons_pattern_on_failure() {
        let (device, dispatcher) = ios(true);
        device.fail_after(2);
        let custom = pattern(&[0, 40, 0, 40, 0, 40], &[0, 255, 0, 255, 0, 255]);
        let err = dispatcher.replay_synchronously(&custom, false).unwrap_err();
        assert!(matches!(err, DispatchError::Platform(_)));
        assert_eq!(
            device.calls(),
            vec![Call::PrepareTaps, Call::Tap(TapKind::Heavy)]
        );
    }

    #[test]
    fn android_failures_propagate() {
        let (device, dispatcher) = android(30);
        device.fail_after(0);
        assert!(matches!(
            dispatcher.trigger(FeedbackKind::Failure, false),
            Err(DispatchError::Platform(PlatformError::Primitive { .. }))
        ));
    }

    #[test]
    fn other_platforms_are_inert() {
        let device = mock::Device::new("mock", Platform::Other, 0, false);
        let dispatcher = dispatcher(&device, CapabilitySet::other());
        dispatcher.trigger(FeedbackKind::Success, true).unwrap();
        dispatcher
            .trigger(&pattern(&[0, 100], &[0, 200]), true)
            .unwrap();
        dispatcher.vibrate(true).unwrap();
        dispatcher.cancel().unwrap();
        assert!(device.calls().is_empty());
    }

    #[test]
    fn vibrate_for_fails_over_without_amplitude() {
        let (old, old_dispatcher) = android(21);
        old_dispatcher.vibrate_for(60, 200).unwrap();
        assert_eq!(old.calls(), vec![Call::Vibrate(60)]);

        let (new, new_dispatcher) = android(26);
        new_dispatcher.vibrate_for(60, 200).unwrap();
        new_dispatcher.vibrate(false).unwrap();
        new_dispatcher.cancel().unwrap();
        assert_eq!(
            new.calls(),
            vec![
                Call::VibrateWithAmplitude(60, 200),
                Call::Vibrate(40),
                Call::Cancel
            ]
        );
    }

    #[test]
    fn release_only_after_prepare() {
        let (device, dispatcher) = ios(true);
        dispatcher.release().unwrap();
        assert!(device.calls().is_empty());

        dispatcher.vibrate(false).unwrap();
        dispatcher.release().unwrap();
        dispatcher.vibrate(false).unwrap();
        assert_eq!(
            device.calls(),
            vec![
                Call::PrepareTaps,
                Call::Tap(TapKind::Medium),
                Call::ReleaseTaps,
                Call::PrepareTaps,
                Call::Tap(TapKind::Medium),
            ]
        );
    }

    #[test]
    fn spawn_replay_runs_in_background() {
        let (device, dispatcher) = ios(true);
        let custom = pattern(&[0, 40, 0, 80], &[0, 50, 0, 200]);
        let handle = dispatcher.spawn_replay(custom, false);

        eventually(|| device.calls().len() == 4, "replay never finished");
        handle.join().unwrap().unwrap();
        assert_eq!(
            device.calls(),
            vec![
                Call::PrepareTaps,
                Call::Tap(TapKind::Light),
                Call::Tap(TapKind::Heavy),
                Call::Tap(TapKind::Heavy),
            ]
        );
    }

    #[test]
    fn silence_overrides_vibrator() {
        let (device, dispatcher) = android(30);
        dispatcher.silence().unwrap();
        assert_eq!(
            device.calls(),
            vec![Call::PlayWaveformWithAmplitudes(vec![0, 20], vec![0, 0], -1)]
        );
    }

    #[test]
    fn presets_follow_configured_levels() {
        let device = mock::Device::android("mock-android", 30);
        let levels = IntensityLevels {
            light: Intensity::new(10, 30),
            ..IntensityLevels::default()
        };
        let dispatcher = Dispatcher::new(
            Arc::new(device.clone()),
            CapabilitySet::android(30),
            levels,
        );

        let success = dispatcher.presets().get(FeedbackKind::Success).unwrap();
        assert_eq!(success.durations(), &[0, 10, 10, 80]);

        dispatcher.trigger(FeedbackKind::Success, false).unwrap();
        assert_eq!(
            device.calls(),
            vec![Call::PlayWaveformWithAmplitudes(
                vec![0, 10, 10, 80],
                vec![0, 30, 0, 255],
                -1
            )]
        );
    }
}
