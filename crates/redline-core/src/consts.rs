//! Physical constants of the simulated arena, in unreal units and seconds.

/// The distance from the field center to the side wall.
pub const FIELD_MAX_X: f64 = 4096.0;

/// The distance from the field center to the back wall (and the goal line).
pub const FIELD_MAX_Y: f64 = 5120.0;

/// The distance from the ground (z = 0) to the ceiling.
pub const FIELD_MAX_Z: f64 = 2044.0;

/// The z-coordinate of the crossbar.
pub const CROSSBAR_Z: f64 = 642.775;

/// The absolute value of the x-coordinate of the goalposts.
pub const GOALPOST_X: f64 = 892.755;

/// Magnitude of the gravitational acceleration (it points towards `-z`).
pub const GRAVITY: f64 = 650.0;

pub const BALL_RADIUS: f64 = 92.75;

/// Fraction of the normal velocity the ball keeps when bouncing off the floor.
pub const BALL_RESTITUTION: f64 = 0.6;

/// The z location of the car when sitting on the ground.
pub const CAR_REST_Z: f64 = 17.01;

/// The max speed a car can reach using only the throttle.
pub const CAR_THROTTLE_MAX_SPEED: f64 = 1410.0;

/// The max speed a car can reach by boosting.
pub const CAR_MAX_SPEED: f64 = 2300.0;

/// Acceleration from full throttle at standstill.
pub const THROTTLE_ACCEL: f64 = 1600.0;

/// Acceleration from full throttle while airborne.
pub const AIR_THROTTLE_ACCEL: f64 = 200.0 / 3.0;

pub const BOOST_ACCEL: f64 = 991.0 + 2.0 / 3.0;

/// Boost depletion per second while boosting.
pub const BOOST_CONSUMPTION: f64 = 100.0 / 3.0;

/// The instantaneous vertical velocity change on the first frame of a jump.
pub const JUMP_IMPULSE_SPEED: f64 = 291.0 + 2.0 / 3.0;

/// The additional acceleration during a jump while holding the button down.
pub const JUMP_HOLD_ACCEL: f64 = 1458.0 + 1.0 / 3.0;

/// The amount of time additional force can be added during a jump while holding
/// the button down.
pub const JUMP_HOLD_TIME: f64 = 0.2;

/// The velocity increase when dodging.
pub const DODGE_IMPULSE: f64 = 500.0;

/// The number of seconds between physics ticks.
pub const PHYSICS_DT: f64 = 1.0 / 120.0;

/// The number of seconds between two decisions of the bot.
pub const TICK_DT: f64 = 1.0 / 60.0;

pub const MAX_BOOST: f64 = 100.0;
