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
//! Converts amplitude curves into wait/vibrate pulse trains.
//!
//! Every sample becomes exactly one wait segment followed by one vibrate
//! segment. Samples at or below zero become waits of one sample interval; the
//! rest become vibrations of one sample interval at `round(255 * a)`.

use tracing::debug;

use crate::curve::AmplitudeCurve;
use crate::pattern::Pattern;
use crate::util::{round_hundredths, to_amplitude};

/// Slack applied to the sample count so that float noise (3 * 0.1 > 0.3)
/// doesn't drop the final sample at `max_time`.
const SAMPLE_EPSILON: f64 = 1e-9;

/// Upper bound on the number of samples a single curve may produce.
pub const MAX_SAMPLES: u64 = u32::MAX as u64;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Checks that the sample interval is a positive, finite number of seconds
/// that lasts at least one millisecond once rounded.
pub fn validate_interval(sample_interval: f64) -> Result<(), EncodeError> {
    if !sample_interval.is_finite() || sample_interval <= 0.0 {
        return Err(EncodeError::InvalidArgument(format!(
            "sample interval must be positive, got {}",
            sample_interval
        )));
    }
    if interval_millis(sample_interval) == 0 {
        return Err(EncodeError::InvalidArgument(format!(
            "sample interval {} rounds to 0ms",
            sample_interval
        )));
    }
    Ok(())
}

fn interval_millis(sample_interval: f64) -> u64 {
    (sample_interval * 1000.0).round() as u64
}

/// Samples the curve every `sample_interval` seconds from zero up to and
/// including the last keyframe time. Each sample is rounded to two decimals.
pub fn sample<C: AmplitudeCurve + ?Sized>(
    curve: &C,
    sample_interval: f64,
) -> Result<Vec<f64>, EncodeError> {
    validate_interval(sample_interval)?;
    if curve.keyframe_count() < 2 {
        return Ok(Vec::new());
    }

    let max_time = curve.last_sample_time();
    if max_time < 0.0 {
        return Ok(Vec::new());
    }
    let steps = (max_time / sample_interval + SAMPLE_EPSILON).floor();
    let count = Some(steps)
        .filter(|steps| steps.is_finite() && *steps < MAX_SAMPLES as f64)
        .and_then(|steps| (steps as u64).checked_add(1))
        .ok_or_else(|| {
            EncodeError::InvalidArgument(format!(
                "sampling {}s every {}s needs more than {} samples",
                max_time, sample_interval, MAX_SAMPLES
            ))
        })?;

    Ok((0..count)
        .map(|i| round_hundredths(curve.evaluate(i as f64 * sample_interval)))
        .collect())
}

/// Builds the pulse train for already-sampled amplitudes.
pub fn pattern_from_samples(samples: &[f64], sample_interval: f64) -> Result<Pattern, EncodeError> {
    validate_interval(sample_interval)?;
    if samples.is_empty() {
        return Ok(Pattern::empty());
    }

    let interval_ms = interval_millis(sample_interval);
    let mut durations = Vec::with_capacity(samples.len() * 2);
    let mut amplitudes = Vec::with_capacity(samples.len() * 2);

    for a in samples {
        let amplitude = to_amplitude(*a);
        if *a <= 0.0 {
            durations.extend([interval_ms, 0]);
            amplitudes.extend([amplitude, 0]);
        } else {
            durations.extend([0, interval_ms]);
            amplitudes.extend([0, amplitude]);
        }
    }

    Ok(Pattern::from_parts(durations, amplitudes))
}

/// Encodes the curve into a play-once pattern.
pub fn encode<C: AmplitudeCurve + ?Sized>(
    curve: &C,
    sample_interval: f64,
) -> Result<Pattern, EncodeError> {
    let samples = sample(curve, sample_interval)?;
    debug!(
        samples = samples.len(),
        sample_interval, "Encoding amplitude curve."
    );
    pattern_from_samples(&samples, sample_interval)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::KeyframeCurve;

    fn curve(points: &[(f64, f64)]) -> KeyframeCurve {
        KeyframeCurve::from(points)
    }

    #[test]
    fn encodes_reference_scenario() {
        let pattern = encode(&curve(&[(0.0, 0.0), (0.1, 0.5), (0.2, 0.0)]), 0.1).unwrap();
        assert_eq!(pattern.durations(), &[100, 0, 0, 100, 100, 0]);
        assert_eq!(pattern.amplitudes(), &[0, 0, 0, 128, 0, 0]);
        assert_eq!(pattern.repeat_index(), -1);
    }

    #[test]
    fn samples_include_max_time() {
        let samples = sample(&curve(&[(0.0, 0.0), (0.3, 0.3)]), 0.1).unwrap();
        assert_eq!(samples, vec![0.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn samples_are_rounded_to_two_decimals() {
        let samples = sample(&curve(&[(0.0, 0.0), (0.3, 1.0)]), 0.1).unwrap();
        assert_eq!(samples, vec![0.0, 0.33, 0.67, 1.0]);
    }

    #[test]
    fn degenerate_curves_encode_to_empty_pattern() {
        assert_eq!(encode(&curve(&[]), 0.1).unwrap(), Pattern::empty());
        assert_eq!(encode(&curve(&[(0.5, 1.0)]), 0.1).unwrap(), Pattern::empty());
    }

    #[test]
    fn rejects_non_positive_interval() {
        let c = curve(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(encode(&c, 0.0), Err(EncodeError::InvalidArgument(_))));
        assert!(matches!(encode(&c, -0.1), Err(EncodeError::InvalidArgument(_))));
        assert!(matches!(
            encode(&c, f64::NAN),
            Err(EncodeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn every_pair_has_exactly_one_timed_segment() {
        let c = curve(&[(0.0, 0.0), (0.25, 1.0), (0.5, -0.5), (0.75, 0.2), (1.0, 0.0)]);
        for interval in [0.01, 0.05, 0.1, 0.3, 0.7] {
            let samples = sample(&c, interval).unwrap();
            let pattern = encode(&c, interval).unwrap();
            assert_eq!(pattern.len(), samples.len() * 2);
            assert_eq!(pattern.amplitudes().len(), pattern.durations().len());
            for pair in pattern.durations().chunks(2) {
                assert!(
                    (pair[0] == 0) != (pair[1] == 0),
                    "interval {} produced {:?}",
                    interval,
                    pair
                );
            }
        }
    }

    #[test]
    fn rejects_interval_below_one_millisecond() {
        assert!(matches!(
            pattern_from_samples(&[0.5, 0.0], 0.0004),
            Err(EncodeError::InvalidArgument(_))
        ));
        assert!(validate_interval(0.0004).is_err());

        let pattern = pattern_from_samples(&[0.5, 0.0], 0.0006).unwrap();
        assert_eq!(pattern.durations(), &[0, 1, 1, 0]);
    }

    #[test]
    fn rejects_oversized_sample_counts() {
        let c = curve(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(sample(&c, 1e-300), Err(EncodeError::InvalidArgument(_))));

        let long = curve(&[(0.0, 0.0), (1e300, 1.0)]);
        assert!(matches!(sample(&long, 0.1), Err(EncodeError::InvalidArgument(_))));
    }

    #[test]
    fn negative_values_land_in_wait_segments_unclamped() {
        let pattern = pattern_from_samples(&[-0.1, 1.5], 0.05).unwrap();
        assert_eq!(pattern.durations(), &[50, 0, 0, 50]);
        assert_eq!(pattern.amplitudes(), &[-26, 0, 0, 383]);
    }
}
