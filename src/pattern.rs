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
use std::fmt;

use serde::Serialize;

/// Errors raised when constructing a pattern from raw arrays.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("durations and amplitudes differ in length ({durations} vs {amplitudes})")]
    LengthMismatch { durations: usize, amplitudes: usize },

    #[error("a pattern needs at least one segment")]
    Empty,

    #[error("repeat index {index} is out of range for {len} segments")]
    RepeatOutOfRange { index: usize, len: usize },
}

/// Whether a segment keeps the vibrator off or turns it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Wait,
    Vibrate,
}

/// A single entry of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub duration_ms: u64,
    pub amplitude: i32,
}

/// A vibration pattern: alternating wait and vibrate segments.
///
/// Even indices are waits, odd indices are vibrations; index 0 is always the
/// leading wait before the first pulse (possibly zero length). Amplitudes are
/// nominally 0-255 but are kept signed, since curves are not clamped before
/// encoding. Use [`Pattern::clamped_amplitudes`] before handing them to hardware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    durations: Vec<u64>,
    amplitudes: Vec<i32>,
    /// Segment to loop back to after reaching the end, or none to play once.
    repeat: Option<usize>,
}

impl Pattern {
    /// Creates a new pattern, validating that the arrays line up.
    pub fn new(
        durations: Vec<u64>,
        amplitudes: Vec<i32>,
        repeat: Option<usize>,
    ) -> Result<Pattern, PatternError> {
        if durations.len() != amplitudes.len() {
            return Err(PatternError::LengthMismatch {
                durations: durations.len(),
                amplitudes: amplitudes.len(),
            });
        }
        if durations.is_empty() {
            return Err(PatternError::Empty);
        }
        if let Some(index) = repeat {
            if index >= durations.len() {
                return Err(PatternError::RepeatOutOfRange {
                    index,
                    len: durations.len(),
                });
            }
        }

        Ok(Pattern {
            durations,
            amplitudes,
            repeat,
        })
    }

    /// Builds a pattern from pieces that are valid by construction.
    pub(crate) fn from_parts(durations: Vec<u64>, amplitudes: Vec<i32>) -> Pattern {
        debug_assert_eq!(durations.len(), amplitudes.len());
        Pattern {
            durations,
            amplitudes,
            repeat: None,
        }
    }

    /// The degenerate pattern: one zero-length, zero-amplitude wait.
    pub fn empty() -> Pattern {
        Pattern::from_parts(vec![0], vec![0])
    }

    pub fn durations(&self) -> &[u64] {
        &self.durations
    }

    pub fn amplitudes(&self) -> &[i32] {
        &self.amplitudes
    }

    pub fn repeat(&self) -> Option<usize> {
        self.repeat
    }

    /// The repeat index in waveform form, where -1 means play once.
    pub fn repeat_index(&self) -> i32 {
        match self.repeat {
            Some(index) => i32::try_from(index).unwrap_or(i32::MAX),
            None => -1,
        }
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// True when no segment has any duration.
    pub fn is_silent(&self) -> bool {
        self.durations.iter().all(|duration| *duration == 0)
    }

    fn segment(&self, i: usize) -> Segment {
        Segment {
            kind: if i % 2 == 0 {
                SegmentKind::Wait
            } else {
                SegmentKind::Vibrate
            },
            duration_ms: self.durations[i],
            amplitude: self.amplitudes[i],
        }
    }

    /// Returns every segment with its wait/vibrate role.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.len()).map(|i| self.segment(i))
    }

    /// Returns each vibrate segment paired with the wait that precedes it.
    /// A trailing wait without a vibration is skipped.
    pub fn pulses(&self) -> impl Iterator<Item = (Segment, Segment)> + '_ {
        (1..self.len())
            .step_by(2)
            .map(|i| (self.segment(i - 1), self.segment(i)))
    }

    /// Total time of one pass through the pattern.
    pub fn total_duration_ms(&self) -> u64 {
        self.durations.iter().sum()
    }

    /// The binary on/off form of the pattern, for vibrators without amplitude control.
    pub fn on_off(&self) -> &[u64] {
        &self.durations
    }

    /// Amplitudes clamped into the 0-255 range accepted by vibration hardware.
    pub fn clamped_amplitudes(&self) -> Vec<u8> {
        self.amplitudes
            .iter()
            .map(|amplitude| (*amplitude).clamp(0, u8::MAX as i32) as u8)
            .collect()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} segments, {}ms, repeat {}",
            self.len(),
            self.total_duration_ms(),
            self.repeat_index()
        )
    }
}
