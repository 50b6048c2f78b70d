//! Simple kinematic models used to decide whether a car can get somewhere in time.

use redline_core::{
    consts::{
        BOOST_ACCEL, CAR_MAX_SPEED, CAR_THROTTLE_MAX_SPEED, GRAVITY, JUMP_HOLD_ACCEL,
        JUMP_HOLD_TIME, JUMP_IMPULSE_SPEED, THROTTLE_ACCEL, TICK_DT,
    },
    flat, CarData, Vector3,
};

/// Number of bisection steps when inverting the jump height curve.
const JUMP_SEARCH_STEPS: usize = 40;

/// Heading error of the car towards `target`, seen from above, in `[0, pi]`.
pub fn heading_error(car: &CarData, target: Vector3) -> f64 {
    let local = car.local(flat(target - car.position));
    if local.x == 0.0 && local.y == 0.0 {
        0.0
    } else {
        local.y.atan2(local.x).abs()
    }
}

/// Time for a car moving at `speed` to cover `distance` in a straight line, accelerating at
/// `accel` up to `top_speed`.
pub fn straight_line_time(distance: f64, speed: f64, accel: f64, top_speed: f64) -> f64 {
    if distance <= 0.0 {
        return 0.0;
    }
    let speed = speed.clamp(0.0, top_speed);
    if accel <= 0.0 {
        return if speed > 0.0 { distance / speed } else { f64::INFINITY };
    }

    let time_to_top = (top_speed - speed) / accel;
    let distance_to_top = speed * time_to_top + 0.5 * accel * time_to_top.powi(2);
    if distance_to_top >= distance {
        (-speed + (speed.powi(2) + 2.0 * accel * distance).sqrt()) / accel
    } else {
        time_to_top + (distance - distance_to_top) / top_speed
    }
}

/// Estimated time for a grounded car to get within `standoff` of `target`.
///
/// The car first turns on the spot (`turn_time_per_radian` per radian of heading error),
/// then accelerates in a straight line, boosting while it has boost left.
pub fn ground_eta(
    car: &CarData,
    target: Vector3,
    standoff: f64,
    turn_time_per_radian: f64,
) -> f64 {
    let to_target = flat(target - car.position);
    let distance = (to_target.norm() - standoff).max(0.0);
    if distance == 0.0 {
        return 0.0;
    }

    let speed_towards = car.velocity.dot(&(to_target / to_target.norm())).max(0.0);
    let (accel, top_speed) = if car.boost > 0.0 {
        (THROTTLE_ACCEL + BOOST_ACCEL, CAR_MAX_SPEED)
    } else {
        (THROTTLE_ACCEL, CAR_THROTTLE_MAX_SPEED)
    };
    heading_error(car, target) * turn_time_per_radian
        + straight_line_time(distance, speed_towards, accel, top_speed)
}

/// How many jumps the car uses to get up to the ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpKind {
    Single,
    Double,
}

impl JumpKind {
    /// Time after the first jump at which the second jump is pressed. The jump button
    /// has to be released for one tick in between.
    fn second_jump_time() -> f64 {
        JUMP_HOLD_TIME + TICK_DT
    }

    /// Height gained and vertical speed `time` seconds after jumping off flat ground.
    pub fn state_at(self, time: f64) -> (f64, f64) {
        let hold_accel = JUMP_HOLD_ACCEL - GRAVITY;
        let held = time.clamp(0.0, JUMP_HOLD_TIME);
        let mut height = JUMP_IMPULSE_SPEED * held + 0.5 * hold_accel * held.powi(2);
        let mut speed = JUMP_IMPULSE_SPEED + hold_accel * held;
        if time <= JUMP_HOLD_TIME {
            return (height, speed);
        }

        let fall = |height: &mut f64, speed: &mut f64, duration: f64| {
            *height += *speed * duration - 0.5 * GRAVITY * duration.powi(2);
            *speed -= GRAVITY * duration;
        };
        match self {
            JumpKind::Single => fall(&mut height, &mut speed, time - JUMP_HOLD_TIME),
            JumpKind::Double => {
                let second = Self::second_jump_time();
                fall(&mut height, &mut speed, time.min(second) - JUMP_HOLD_TIME);
                if time > second {
                    speed += JUMP_IMPULSE_SPEED;
                    fall(&mut height, &mut speed, time - second);
                }
            }
        }
        (height, speed)
    }

    /// Time and height of the highest point of the jump.
    pub fn apex(self) -> (f64, f64) {
        let start = match self {
            JumpKind::Single => JUMP_HOLD_TIME,
            JumpKind::Double => Self::second_jump_time(),
        };
        let (_, speed) = self.state_at(start);
        let speed = match self {
            JumpKind::Single => speed,
            JumpKind::Double => speed + JUMP_IMPULSE_SPEED,
        };
        let time = start + speed / GRAVITY;
        (time, self.state_at(time).0)
    }

    /// Time after jumping at which the car has risen by `rise`, on the way up. `None` if
    /// the jump never gets that high.
    pub fn time_to_rise(self, rise: f64) -> Option<f64> {
        if rise <= 0.0 {
            return Some(0.0);
        }
        let (apex_time, apex_height) = self.apex();
        if rise > apex_height {
            return None;
        }

        let (mut low, mut high) = (0.0, apex_time);
        for _ in 0..JUMP_SEARCH_STEPS {
            let middle = (low + high) / 2.0;
            if self.state_at(middle).0 < rise {
                low = middle;
            } else {
                high = middle;
            }
        }
        Some(high)
    }
}

/// Average acceleration (on top of gravity) a car needs to be at `target` in `time`
/// seconds. A grounded car is assumed to jump off first.
pub fn aerial_acceleration(car: &CarData, target: Vector3, time: f64) -> Vector3 {
    let mut velocity = car.velocity;
    if car.is_grounded {
        velocity += car.up() * JUMP_IMPULSE_SPEED;
    }
    let gravity = Vector3::new(0.0, 0.0, -GRAVITY);
    let drift = car.position + velocity * time + 0.5 * gravity * time.powi(2);
    (target - drift) * 2.0 / time.powi(2)
}
