use redline_core::{CarData, ControllerSettings, Vector3};

use super::{output::clamp_axis, ControllerOutput};

/// Angles (in radians) the car has to rotate by to face a target, as returned by
/// [`aim_at`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TargetAngles {
    /// Positive when the target is above the nose
    pub pitch: f64,
    /// Positive when the target is to the left
    pub yaw: f64,
    /// Positive when the car has to roll left (raise its right side) to be upright
    pub roll: f64,
}

/// Cubic proportional-derivative law shared by every rotation axis.
///
/// `rate` is the damping term, already scaled and signed so that it opposes the current
/// rotation. The result is always in `[-1, 1]`; NaN inputs give `0`.
pub fn steer_pd(angle: f64, rate: f64, settings: &ControllerSettings) -> f64 {
    clamp_axis((settings.steer_gain * (angle + rate)).powi(3) / settings.steer_divisor)
}

/// Turn the car to face `target` (world coordinates), writing steer, pitch, yaw and roll
/// into `output`.
///
/// `up` is the direction the roof should face; a zero vector means world up. With
/// `backwards` the car points its tail at the target instead.
pub fn aim_at(
    car: &CarData,
    target: Vector3,
    up: Vector3,
    backwards: bool,
    settings: &ControllerSettings,
    output: &mut ControllerOutput,
) -> TargetAngles {
    let facing = if backwards { -1.0 } else { 1.0 };
    let local_target = car.local(target - car.position) * facing;
    let local_up = car.local(redline_core::safe_normalize(up).unwrap_or_else(Vector3::z));
    let angles = TargetAngles {
        pitch: local_target.z.atan2(local_target.x),
        yaw: local_target.y.atan2(local_target.x),
        roll: (-local_up.y).atan2(local_up.z),
    };

    // x rolls the left side up, y lowers the nose, z turns left
    let rates = car.local_angular_velocity();
    output.steer = steer_pd(angles.yaw, -rates.z * settings.steer_damping, settings) * facing;
    output.pitch = steer_pd(angles.pitch, rates.y * settings.pitch_damping, settings);
    output.yaw = steer_pd(angles.yaw, -rates.z * settings.yaw_damping, settings);
    output.roll = steer_pd(angles.roll, -rates.x * settings.roll_damping, settings);

    angles
}

/// Throttle (and boost, when it pays off) towards `target_speed` along the car's nose.
///
/// Returns the car's current forward speed.
pub fn throttle(
    car: &CarData,
    target_speed: f64,
    backwards: bool,
    settings: &ControllerSettings,
    output: &mut ControllerOutput,
) -> f64 {
    let speed = car.forward_speed();
    let target = if backwards { -target_speed } else { target_speed };
    let error = target - speed;
    output.throttle = clamp_axis(error.powi(3) / settings.throttle_response);
    output.boost = target_speed > settings.boost_min_target_speed
        && error > settings.boost_min_speed_error
        && speed < settings.boost_max_speed
        && output.throttle >= 1.0
        && !backwards;
    speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;
    use redline_core::TeamColor;
    use std::f64::consts::FRAC_PI_2;

    fn settings() -> ControllerSettings {
        ControllerSettings::default()
    }

    #[test]
    fn test_steer_pd_is_bounded() {
        let settings = settings();
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let angle = rng.gen_range(-1e6..1e6);
            let rate = rng.gen_range(-1e6..1e6);
            let out = steer_pd(angle, rate, &settings);
            assert!((-1.0..=1.0).contains(&out), "{angle} {rate} -> {out}");
        }
        assert_eq!(steer_pd(f64::MAX, f64::MAX, &settings), 1.0);
        assert_eq!(steer_pd(f64::MIN, 0.0, &settings), -1.0);
        assert_eq!(steer_pd(f64::NAN, 0.0, &settings), 0.0);
    }

    #[test]
    fn test_steer_pd_small_errors() {
        let settings = settings();
        assert_eq!(steer_pd(0.0, 0.0, &settings), 0.0);
        // (35 * 0.01)^3 / 10
        assert_relative_eq!(steer_pd(0.01, 0.0, &settings), 0.0042875, epsilon = 1e-9);
        assert_relative_eq!(
            steer_pd(-0.01, 0.0, &settings),
            -steer_pd(0.01, 0.0, &settings)
        );
    }

    #[test]
    fn test_aim_at_turns_towards_target() {
        let settings = settings();
        let car = CarData::new(0, TeamColor::Blue);

        let mut output = ControllerOutput::new();
        let angles = aim_at(
            &car,
            Vector3::new(0.0, 1000.0, car.position.z),
            Vector3::zeros(),
            false,
            &settings,
            &mut output,
        );
        assert_relative_eq!(angles.yaw, FRAC_PI_2, epsilon = 1e-9);
        assert_eq!(output.steer, 1.0);
        assert_eq!(output.yaw, 1.0);
        assert_relative_eq!(angles.roll, 0.0);

        let mut output = ControllerOutput::new();
        aim_at(
            &car,
            Vector3::new(0.0, -1000.0, car.position.z),
            Vector3::zeros(),
            false,
            &settings,
            &mut output,
        );
        assert_eq!(output.steer, -1.0);
    }

    #[test]
    fn test_aim_at_backwards() {
        let settings = settings();
        let car = CarData::new(0, TeamColor::Blue);
        let mut output = ControllerOutput::new();
        // Directly behind: nothing to do when reversing
        let angles = aim_at(
            &car,
            Vector3::new(-1000.0, 0.0, car.position.z),
            Vector3::zeros(),
            true,
            &settings,
            &mut output,
        );
        assert_relative_eq!(angles.yaw, 0.0, epsilon = 1e-9);
        assert_relative_eq!(output.steer, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_aim_at_pitch_and_roll() {
        let settings = settings();
        // Rolled right: the left side is up, so it has to roll left
        let car = CarData {
            orientation: redline_core::Rotation3::from_axis_angle(&Vector3::x_axis(), 0.5),
            ..CarData::new(0, TeamColor::Blue)
        };
        let mut output = ControllerOutput::new();
        let angles = aim_at(
            &car,
            car.position + Vector3::new(1000.0, 0.0, 1000.0),
            Vector3::zeros(),
            false,
            &settings,
            &mut output,
        );
        assert!(angles.pitch > 0.0);
        assert!(output.pitch > 0.0);
        assert_relative_eq!(angles.roll, -0.5, epsilon = 1e-9);
        assert_eq!(output.roll, -1.0);
    }

    #[test]
    fn test_aim_at_is_damped() {
        let settings = settings();
        // Slightly left of the nose, but already spinning left quickly
        let car = CarData {
            angular_velocity: Vector3::new(0.0, 0.0, 5.0),
            ..CarData::new(0, TeamColor::Blue)
        };
        let mut output = ControllerOutput::new();
        aim_at(
            &car,
            Vector3::new(1000.0, 100.0, car.position.z),
            Vector3::zeros(),
            false,
            &settings,
            &mut output,
        );
        assert!(output.yaw < 0.0);
    }

    #[test]
    fn test_throttle_is_bounded() {
        let settings = settings();
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let car = CarData::new(0, TeamColor::Blue)
                .with_velocity(Vector3::new(rng.gen_range(-3000.0..3000.0), 0.0, 0.0));
            let mut output = ControllerOutput::new();
            throttle(
                &car,
                rng.gen_range(-1e9..1e9),
                rng.gen_bool(0.5),
                &settings,
                &mut output,
            );
            assert!((-1.0..=1.0).contains(&output.throttle));
        }
    }

    #[test]
    fn test_throttle_boost_rules() {
        let settings = settings();
        let stopped = CarData::new(0, TeamColor::Blue);

        let mut output = ControllerOutput::new();
        let speed = throttle(&stopped, 2300.0, false, &settings, &mut output);
        assert_eq!(speed, 0.0);
        assert_eq!(output.throttle, 1.0);
        assert!(output.boost);

        // Slow targets never boost
        let mut output = ControllerOutput::new();
        throttle(&stopped, 1000.0, false, &settings, &mut output);
        assert!(!output.boost);

        // Nor do reversing cars
        let mut output = ControllerOutput::new();
        throttle(&stopped, 2300.0, true, &settings, &mut output);
        assert_eq!(output.throttle, -1.0);
        assert!(!output.boost);

        // Nor fast ones
        let fast = stopped.clone().with_velocity(Vector3::new(2260.0, 0.0, 0.0));
        let mut output = ControllerOutput::new();
        throttle(&fast, 2300.0, false, &settings, &mut output);
        assert!(!output.boost);
    }

    #[test]
    fn test_throttle_small_error() {
        let settings = settings();
        let car = CarData::new(0, TeamColor::Blue).with_velocity(Vector3::new(990.0, 0.0, 0.0));
        let mut output = ControllerOutput::new();
        throttle(&car, 1000.0, false, &settings, &mut output);
        assert_relative_eq!(output.throttle, 1000.0 / 30_000.0, epsilon = 1e-12);
    }
}
