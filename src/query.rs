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
//! The remote-trigger request format: `t=<sample interval>&a=<a0>:<a1>:...`.
//!
//! Amplitudes are the sampled, two-decimal curve values the encoder works
//! from, so a decoded request encodes to the same pattern as the curve itself.

use std::{fmt, str::FromStr};

use crate::curve::AmplitudeCurve;
use crate::encoder::{self, EncodeError};
use crate::pattern::Pattern;
use crate::util::round_hundredths;

const INTERVAL_KEY: &str = "t";
const AMPLITUDES_KEY: &str = "a";
const AMPLITUDE_SEPARATOR: char = ':';

/// Malformed pattern requests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid argument: missing field {0}")]
    MissingField(&'static str),

    #[error("Invalid argument: duplicate field {0}")]
    DuplicateField(String),

    #[error("Invalid argument: unexpected field {0}")]
    UnknownField(String),

    #[error("Invalid argument: malformed field {0}")]
    MalformedField(String),

    #[error("Invalid argument: bad sample interval {0}")]
    BadInterval(String),

    #[error("Invalid argument: amplitude {index} is not a number: {token}")]
    BadAmplitude { index: usize, token: String },
}

/// A custom pattern request as sent by remote-trigger tooling.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRequest {
    sample_interval: f64,
    amplitudes: Vec<f64>,
}

impl PatternRequest {
    /// Creates a request, rounding the amplitudes to two decimals.
    pub fn new(sample_interval: f64, amplitudes: &[f64]) -> Result<PatternRequest, EncodeError> {
        encoder::validate_interval(sample_interval)?;
        Ok(PatternRequest {
            sample_interval,
            amplitudes: amplitudes.iter().map(|a| round_hundredths(*a)).collect(),
        })
    }

    /// Samples the curve the same way the encoder does.
    pub fn from_curve<C: AmplitudeCurve + ?Sized>(
        curve: &C,
        sample_interval: f64,
    ) -> Result<PatternRequest, EncodeError> {
        Ok(PatternRequest {
            sample_interval,
            amplitudes: encoder::sample(curve, sample_interval)?,
        })
    }

    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn to_query_string(&self) -> String {
        let amplitudes: Vec<String> = self.amplitudes.iter().map(|a| a.to_string()).collect();
        format!(
            "{}={}&{}={}",
            INTERVAL_KEY,
            self.sample_interval,
            AMPLITUDES_KEY,
            amplitudes.join(&AMPLITUDE_SEPARATOR.to_string())
        )
    }

    /// Parses a query string, with or without its leading `?`.
    pub fn parse(query: &str) -> Result<PatternRequest, QueryError> {
        let query = query.trim();
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut interval: Option<&str> = None;
        let mut amplitudes: Option<&str> = None;
        for field in query.split('&') {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| QueryError::MalformedField(field.to_string()))?;
            let slot = match key {
                INTERVAL_KEY => &mut interval,
                AMPLITUDES_KEY => &mut amplitudes,
                _ => return Err(QueryError::UnknownField(key.to_string())),
            };
            if slot.replace(value).is_some() {
                return Err(QueryError::DuplicateField(key.to_string()));
            }
        }

        let interval = interval.ok_or(QueryError::MissingField(INTERVAL_KEY))?;
        let amplitudes = amplitudes.ok_or(QueryError::MissingField(AMPLITUDES_KEY))?;

        let sample_interval: f64 = interval
            .parse()
            .map_err(|_| QueryError::BadInterval(interval.to_string()))?;
        if encoder::validate_interval(sample_interval).is_err() {
            return Err(QueryError::BadInterval(interval.to_string()));
        }

        // A curve with fewer than two keyframes samples to nothing.
        if amplitudes.is_empty() {
            return Ok(PatternRequest {
                sample_interval,
                amplitudes: Vec::new(),
            });
        }

        let amplitudes = amplitudes
            .split(AMPLITUDE_SEPARATOR)
            .enumerate()
            .map(|(index, token)| {
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|a| a.is_finite())
                    .map(round_hundredths)
                    .ok_or_else(|| QueryError::BadAmplitude {
                        index,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, QueryError>>()?;

        Ok(PatternRequest {
            sample_interval,
            amplitudes,
        })
    }

    /// Encodes the requested samples into a pattern.
    pub fn to_pattern(&self) -> Result<Pattern, EncodeError> {
        encoder::pattern_from_samples(&self.amplitudes, self.sample_interval)
    }
}

impl FromStr for PatternRequest {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternRequest::parse(s)
    }
}

impl fmt::Display for PatternRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}
