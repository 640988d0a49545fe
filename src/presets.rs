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
//! Canned feedback patterns, derived from three base intensity levels.
//!
//! The combinations mirror the iOS feedback generators:
//!  - selection: light
//!  - success: light / heavy
//!  - warning: heavy / medium
//!  - failure: medium / medium / heavy / light

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;

/// The canned feedback types. `None` does nothing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackKind {
    None,
    Selection,
    Success,
    Warning,
    Failure,
    LightImpact,
    MediumImpact,
    HeavyImpact,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 8] = [
        FeedbackKind::None,
        FeedbackKind::Selection,
        FeedbackKind::Success,
        FeedbackKind::Warning,
        FeedbackKind::Failure,
        FeedbackKind::LightImpact,
        FeedbackKind::MediumImpact,
        FeedbackKind::HeavyImpact,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeedbackKind::None => "none",
            FeedbackKind::Selection => "selection",
            FeedbackKind::Success => "success",
            FeedbackKind::Warning => "warning",
            FeedbackKind::Failure => "failure",
            FeedbackKind::LightImpact => "light-impact",
            FeedbackKind::MediumImpact => "medium-impact",
            FeedbackKind::HeavyImpact => "heavy-impact",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedbackKind::ALL
            .iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown feedback kind: {}", s))
    }
}

/// A base vibration: how long and how strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intensity {
    pub duration_ms: u64,
    pub amplitude: u8,
}

impl Intensity {
    pub const fn new(duration_ms: u64, amplitude: u8) -> Intensity {
        Intensity {
            duration_ms,
            amplitude,
        }
    }
}

/// The light/medium/heavy tunables every preset is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityLevels {
    pub light: Intensity,
    pub medium: Intensity,
    pub heavy: Intensity,
}

impl Default for IntensityLevels {
    fn default() -> Self {
        IntensityLevels {
            light: Intensity::new(20, 40),
            medium: Intensity::new(40, 120),
            heavy: Intensity::new(80, 255),
        }
    }
}

/// The table of preset patterns for one set of intensity levels.
#[derive(Debug, Clone)]
pub struct PresetLibrary {
    levels: IntensityLevels,
    light_impact: Pattern,
    medium_impact: Pattern,
    heavy_impact: Pattern,
    success: Pattern,
    warning: Pattern,
    failure: Pattern,
}

impl PresetLibrary {
    /// Builds every preset from the given levels.
    pub fn new(levels: IntensityLevels) -> PresetLibrary {
        let IntensityLevels {
            light: l,
            medium: m,
            heavy: h,
        } = levels;
        let amp = |intensity: Intensity| i32::from(intensity.amplitude);
        let impact = |intensity: Intensity| {
            Pattern::from_parts(vec![0, intensity.duration_ms], vec![0, amp(intensity)])
        };

        PresetLibrary {
            levels,
            light_impact: impact(l),
            medium_impact: impact(m),
            heavy_impact: impact(h),
            success: Pattern::from_parts(
                vec![0, l.duration_ms, l.duration_ms, h.duration_ms],
                vec![0, amp(l), 0, amp(h)],
            ),
            warning: Pattern::from_parts(
                vec![0, h.duration_ms, l.duration_ms, m.duration_ms],
                vec![0, amp(h), 0, amp(m)],
            ),
            failure: Pattern::from_parts(
                vec![
                    0,
                    m.duration_ms,
                    l.duration_ms,
                    m.duration_ms,
                    l.duration_ms,
                    h.duration_ms,
                    l.duration_ms,
                    l.duration_ms,
                ],
                vec![0, amp(m), 0, amp(m), 0, amp(h), 0, amp(l)],
            ),
        }
    }

    pub fn levels(&self) -> &IntensityLevels {
        &self.levels
    }

    /// Gets the pattern for a feedback kind. `None` has no pattern.
    pub fn get(&self, kind: FeedbackKind) -> Option<&Pattern> {
        match kind {
            FeedbackKind::None => None,
            FeedbackKind::Selection | FeedbackKind::LightImpact => Some(&self.light_impact),
            FeedbackKind::MediumImpact => Some(&self.medium_impact),
            FeedbackKind::HeavyImpact => Some(&self.heavy_impact),
            FeedbackKind::Success => Some(&self.success),
            FeedbackKind::Warning => Some(&self.warning),
            FeedbackKind::Failure => Some(&self.failure),
        }
    }

    /// Lists every kind that has a preset, with its pattern.
    pub fn iter(&self) -> impl Iterator<Item = (FeedbackKind, &Pattern)> {
        FeedbackKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|pattern| (kind, pattern)))
    }
}

impl Default for PresetLibrary {
    fn default() -> Self {
        PresetLibrary::new(IntensityLevels::default())
    }
}
