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
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Effect;
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::encoder::EncodeError;
use crate::pattern::Pattern;

/// A reusable effect that re-triggers itself while looping. It owns no
/// thread: the caller drives it with [`LoopingEffect::update`] on each tick.
#[derive(Debug, Clone)]
pub struct LoopingEffect {
    pattern: Pattern,
    period: Duration,
    looping: bool,
    fallback_to_plain_vibrate: bool,

    /// Set while a loop is running and hasn't been stopped.
    repeating: bool,
    vibrating_until: Option<Instant>,
}

impl LoopingEffect {
    /// Creates an effect. A zero period falls back to the pattern's own length.
    pub fn new(
        pattern: Pattern,
        period: Duration,
        looping: bool,
        fallback_to_plain_vibrate: bool,
    ) -> LoopingEffect {
        let period = if period.is_zero() {
            Duration::from_millis(pattern.total_duration_ms())
        } else {
            period
        };
        LoopingEffect {
            pattern,
            period,
            looping,
            fallback_to_plain_vibrate,
            repeating: false,
            vibrating_until: None,
        }
    }

    /// Encodes the effect's curve. One pass lasts until the last keyframe.
    pub fn from_effect(effect: &Effect) -> Result<LoopingEffect, EncodeError> {
        Ok(LoopingEffect::new(
            effect.pattern()?,
            Duration::try_from_secs_f64(effect.period()).unwrap_or_default(),
            effect.looping(),
            effect.fallback_to_plain_vibrate(),
        ))
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Triggers one pass of the pattern.
    pub fn play(&mut self, dispatcher: &Dispatcher, now: Instant) -> Result<(), DispatchError> {
        self.vibrating_until = Some(now + self.period);
        self.repeating = self.looping;
        dispatcher.trigger(&self.pattern, self.fallback_to_plain_vibrate)
    }

    /// Starts the next pass once the current one has run its course.
    pub fn update(&mut self, dispatcher: &Dispatcher, now: Instant) -> Result<(), DispatchError> {
        match self.vibrating_until {
            Some(until) if self.repeating && now >= until => {
                debug!(pattern = %self.pattern, "Looping effect.");
                self.play(dispatcher, now)
            }
            _ => Ok(()),
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.repeating || self.vibrating_until.is_some_and(|until| now < until)
    }

    /// Lets the current pass finish without starting another.
    pub fn stop(&mut self) {
        self.repeating = false;
    }

    /// Stops looping and silences the vibrator right away.
    pub fn stop_immediately(&mut self, dispatcher: &Dispatcher) -> Result<(), DispatchError> {
        self.repeating = false;
        self.vibrating_until = None;
        dispatcher.silence()
    }
}
