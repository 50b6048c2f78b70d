use redline_core::{
    cap_magnitude, consts::CAR_MAX_SPEED, flatten_along, BallPrediction, BallSlice, CarData,
    ShotSettings,
};

use super::{AerialShot, GroundShot, JumpKind, JumpShot, Shot, ShotPlan};
use crate::Target;

/// Everything [`default_shot_check`] needs to know besides the slice and the target.
#[derive(Clone, Copy, Debug)]
pub struct ShotCtx<'a> {
    pub car: &'a CarData,
    /// Current game time
    pub now: f64,
    pub settings: &'a ShotSettings,
}

impl<'a> ShotCtx<'a> {
    pub fn new(car: &'a CarData, now: f64, settings: &'a ShotSettings) -> Self {
        Self { car, now, settings }
    }
}

/// Find the earliest slice of `prediction` for which `check` comes up with a shot.
///
/// `check` is called once per slice until it succeeds, then once more on the winning
/// slice to build the shot, so it must give the same answer for the same input. Badly
/// ordered or empty predictions never produce a shot.
pub fn find_shot<F>(prediction: &BallPrediction, target: &Target, check: F) -> Option<Shot>
where
    F: Fn(&BallSlice, &Target) -> Option<Shot>,
{
    if prediction.is_empty() {
        log::warn!("Ball prediction is empty, no shot to look for");
        return None;
    }
    if !prediction.is_well_ordered() {
        log::warn!("Ball prediction is not ordered by time, ignoring it");
        return None;
    }

    let slice = prediction
        .iter()
        .find(|slice| check(slice, target).is_some())?;
    check(slice, target)
}

/// The standard shot check: can the car hit the ball at `slice` so that it goes into
/// `target`, and if so, how.
///
/// Shot types are tried in a fixed order (aerial, ground, jump, double jump) and the first
/// one that works is returned.
pub fn default_shot_check(ctx: &ShotCtx<'_>, slice: &BallSlice, target: &Target) -> Option<Shot> {
    let car = ctx.car;
    let time_remaining = slice.time_remaining(ctx.now);
    if time_remaining <= 0.0 || !target.fits(car.position, slice.position) {
        return None;
    }

    // The ball leaves with the car's velocity plus what's left of its own sideways motion
    let car_velocity = cap_magnitude(
        (slice.position - car.position) / time_remaining,
        0.0,
        CAR_MAX_SPEED,
    );
    let carried = flatten_along(slice.velocity, car_velocity) * ctx.settings.carry_through;
    let ball_velocity = car_velocity + carried;
    let aim = target.clamp(slice.position, ball_velocity);
    let plan = ShotPlan::new(car, *slice, ball_velocity, aim);

    let candidates = [
        Shot::Aerial(AerialShot::new(plan.clone())),
        Shot::Ground(GroundShot::new(plan.clone())),
        Shot::Jump(JumpShot::new(JumpKind::Single, plan.clone())),
        Shot::DoubleJump(JumpShot::new(JumpKind::Double, plan)),
    ];
    candidates
        .into_iter()
        .find(|shot| shot.is_valid(car, ctx.now, ctx.settings))
}
