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
use serde::{Deserialize, Serialize};

/// Something that can be sampled for a normalized amplitude over time.
///
/// Values are nominally in [-1, 1]. Nothing clamps them; callers that feed
/// out-of-range curves get out-of-range amplitudes back from the encoder.
pub trait AmplitudeCurve {
    /// The number of defined keyframes.
    fn keyframe_count(&self) -> usize;

    /// The time, in seconds, of the last defined keyframe.
    fn last_sample_time(&self) -> f64;

    /// Evaluates the amplitude at the given time in seconds.
    fn evaluate(&self, t: f64) -> f64;
}

/// A single point on a keyframe curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time in seconds.
    pub time: f64,
    /// Normalized amplitude.
    pub value: f64,
}

impl Keyframe {
    pub fn new(time: f64, value: f64) -> Keyframe {
        Keyframe { time, value }
    }
}

/// A piecewise linear curve through a list of keyframes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct KeyframeCurve {
    keys: Vec<Keyframe>,
}

impl KeyframeCurve {
    /// Creates a curve; keyframes are sorted by time.
    pub fn new(mut keys: Vec<Keyframe>) -> KeyframeCurve {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        KeyframeCurve { keys }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }
}

impl From<Vec<Keyframe>> for KeyframeCurve {
    fn from(keys: Vec<Keyframe>) -> Self {
        KeyframeCurve::new(keys)
    }
}

impl From<KeyframeCurve> for Vec<Keyframe> {
    fn from(curve: KeyframeCurve) -> Self {
        curve.keys
    }
}

impl From<&[(f64, f64)]> for KeyframeCurve {
    fn from(points: &[(f64, f64)]) -> Self {
        KeyframeCurve::new(
            points
                .iter()
                .map(|(time, value)| Keyframe::new(*time, *value))
                .collect(),
        )
    }
}

impl AmplitudeCurve for KeyframeCurve {
    fn keyframe_count(&self) -> usize {
        self.keys.len()
    }

    fn last_sample_time(&self) -> f64 {
        self.keys.last().map(|key| key.time).unwrap_or(0.0)
    }

    fn evaluate(&self, t: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };

        // Hold the end values outside the defined span.
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // First keyframe strictly after t; the one before it starts the segment.
        let upper = self.keys.partition_point(|key| key.time <= t);
        let (a, b) = (&self.keys[upper - 1], &self.keys[upper]);
        let span = b.time - a.time;
        if span <= 0.0 {
            return b.value;
        }
        a.value + (b.value - a.value) * ((t - a.time) / span)
    }
}
