use serde::{Deserialize, Serialize};

/// The inputs sent to the car for one tick.
///
/// Axes are normalised to `[-1, 1]`:
/// - `throttle`: `+` forward, `-` reverse
/// - `steer` and `yaw`: `+` turns left (counter-clockwise seen from above)
/// - `pitch`: `+` raises the nose
/// - `roll`: `+` lifts the left side
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerOutput {
    pub throttle: f64,
    pub steer: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub boost: bool,
    pub jump: bool,
}

impl ControllerOutput {
    /// All axes centered, no buttons pressed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp every axis to `[-1, 1]`, replacing NaN with `0`.
    pub fn sanitized(self) -> Self {
        Self {
            throttle: clamp_axis(self.throttle),
            steer: clamp_axis(self.steer),
            pitch: clamp_axis(self.pitch),
            yaw: clamp_axis(self.yaw),
            roll: clamp_axis(self.roll),
            boost: self.boost,
            jump: self.jump,
        }
    }

    /// Center the air-control axes, so a jump doesn't turn into a dodge.
    pub fn with_neutral_stick(mut self) -> Self {
        self.pitch = 0.0;
        self.yaw = 0.0;
        self.roll = 0.0;
        self
    }
}

pub(crate) fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

impl std::fmt::Display for ControllerOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T{:.2} S{:.2} P{:.2} Y{:.2} R{:.2}{}{}",
            self.throttle,
            self.steer,
            self.pitch,
            self.yaw,
            self.roll,
            if self.boost { " B" } else { "" },
            if self.jump { " J" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized() {
        let output = ControllerOutput {
            throttle: 3.0,
            steer: f64::NAN,
            pitch: -7.0,
            yaw: 0.5,
            roll: f64::NEG_INFINITY,
            boost: true,
            jump: false,
        }
        .sanitized();

        assert_eq!(output.throttle, 1.0);
        assert_eq!(output.steer, 0.0);
        assert_eq!(output.pitch, -1.0);
        assert_eq!(output.yaw, 0.5);
        assert_eq!(output.roll, -1.0);
        assert!(output.boost);
    }

    #[test]
    fn test_display() {
        let output = ControllerOutput {
            throttle: 1.0,
            boost: true,
            ..Default::default()
        };
        assert_eq!(output.to_string(), "T1.00 S0.00 P0.00 Y0.00 R0.00 B");
    }
}
