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

use std::time::Duration;

/// Rounds to two decimal places, half away from zero.
pub fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scales a normalized amplitude to the 0-255 range, rounding half away
/// from zero. Out-of-range inputs are not clamped.
pub fn to_amplitude(normalized: f64) -> i32 {
    (255.0 * normalized).round() as i32
}

/// Outputs the given duration in milliseconds, e.g. `120ms`.
pub fn duration_millis(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use crate::util::{duration_millis, round_hundredths, to_amplitude};

    #[test]
    fn test_round_hundredths() {
        assert_eq!(0.33, round_hundredths(1.0 / 3.0));
        assert_eq!(0.67, round_hundredths(2.0 / 3.0));
        assert_eq!(0.5, round_hundredths(0.499999));
        assert_eq!(-0.12, round_hundredths(-0.1249));
    }

    #[test]
    fn test_to_amplitude() {
        assert_eq!(0, to_amplitude(0.0));
        assert_eq!(128, to_amplitude(0.5));
        assert_eq!(255, to_amplitude(1.0));
        assert_eq!(-26, to_amplitude(-0.1));
        assert_eq!(510, to_amplitude(2.0));
    }

    #[test]
    fn test_duration_millis() {
        assert_eq!("0ms", duration_millis(Duration::ZERO));
        assert_eq!("120ms", duration_millis(Duration::from_millis(120)));
    }
}
