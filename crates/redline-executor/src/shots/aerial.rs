use redline_core::{
    consts::{AIR_THROTTLE_ACCEL, BOOST_ACCEL, BOOST_CONSUMPTION, JUMP_HOLD_TIME, TICK_DT},
    safe_normalize, CarData, DebugColor, ShotSettings, Vector3,
};

use super::{reach, ShotPlan};
use crate::{
    actions::{ActionCtx, ActionProgress},
    control::{aim_at, ControllerOutput},
};

/// Boost only fires while the nose is this well aligned with the needed acceleration.
const BOOST_ALIGNMENT: f64 = 0.9;
/// A take-off that hasn't left the ground by now has failed, in seconds.
const TAKEOFF_TIMEOUT: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
enum AerialPhase {
    Start,
    Takeoff { start: f64 },
    Flying,
}

/// Fly to the ball with boost.
#[derive(Clone, Debug, PartialEq)]
pub struct AerialShot {
    plan: ShotPlan,
    phase: AerialPhase,
    finished: bool,
}

impl AerialShot {
    pub fn new(plan: ShotPlan) -> Self {
        Self {
            plan,
            phase: AerialPhase::Start,
            finished: false,
        }
    }

    pub fn plan(&self) -> &ShotPlan {
        &self.plan
    }

    pub fn is_valid(&self, car: &CarData, now: f64, settings: &ShotSettings) -> bool {
        let time_remaining = self.plan.time_remaining(now);
        if time_remaining <= 0.0
            || self.plan.slice.position.z < settings.aerial_min_height
            || car.boost < settings.aerial_min_boost
        {
            return false;
        }

        let hit_point = self.plan.air_hit_point(settings.contact_distance);
        let required = reach::aerial_acceleration(car, hit_point, time_remaining);
        let acceleration = required.norm();
        let boost_needed = acceleration / BOOST_ACCEL * time_remaining * BOOST_CONSUMPTION;

        // Turning towards the needed acceleration (and jumping off) takes time too
        let turn = safe_normalize(required).map_or(0.0, |dir| car.forward().angle(&dir));
        let takeoff = if car.is_grounded { JUMP_HOLD_TIME } else { 0.0 };
        let setup_time = turn * settings.aerial_orient_time + takeoff;

        acceleration <= BOOST_ACCEL * settings.aerial_accel_margin
            && boost_needed <= car.boost
            && setup_time <= time_remaining
    }

    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        let car = ctx.car;
        let now = ctx.now();
        let settings = &ctx.settings.shot;
        let controller = &ctx.settings.controller;
        let time_remaining = self.plan.time_remaining(now);

        if time_remaining < -settings.expiry_grace {
            return self.done(ActionProgress::success());
        }

        if self.phase == AerialPhase::Start {
            self.phase = if car.is_grounded {
                AerialPhase::Takeoff { start: now }
            } else {
                AerialPhase::Flying
            };
        }

        let hit_point = self.plan.air_hit_point(settings.contact_distance);
        self.plan.draw(ctx.debug, hit_point, DebugColor::Purple);
        let required = reach::aerial_acceleration(car, hit_point, time_remaining.max(TICK_DT));

        let mut output = ControllerOutput::new();
        output.throttle = 1.0;
        match self.phase {
            AerialPhase::Takeoff { start } => {
                let elapsed = now - start;
                if elapsed > TAKEOFF_TIMEOUT && car.is_grounded {
                    log::debug!("Aerial never left the ground");
                    return self.done(ActionProgress::failure());
                }
                if elapsed < JUMP_HOLD_TIME {
                    output.jump = true;
                } else {
                    self.phase = AerialPhase::Flying;
                }
                // Start pointing the nose the right way while still rising
                let heading = safe_normalize(required).unwrap_or_else(|| car.forward());
                aim_at(
                    car,
                    car.position + heading * 1000.0,
                    Vector3::zeros(),
                    false,
                    controller,
                    &mut output,
                );
            }
            AerialPhase::Flying => {
                if car.is_grounded {
                    return self.done(if time_remaining <= 0.0 {
                        ActionProgress::success()
                    } else {
                        ActionProgress::failure()
                    });
                }
                if !self.plan.is_still_predicted(&ctx.world.ball_prediction) {
                    log::debug!("Aerial at t={:.2} is out of reach", self.plan.slice.time);
                    return self.done(ActionProgress::failure());
                }

                match safe_normalize(required).filter(|_| time_remaining > 0.0) {
                    Some(heading) => {
                        aim_at(
                            car,
                            car.position + heading * 1000.0,
                            Vector3::zeros(),
                            false,
                            controller,
                            &mut output,
                        );
                        output.boost = car.forward().dot(&heading) > BOOST_ALIGNMENT
                            && required.norm() > AIR_THROTTLE_ACCEL;
                    }
                    None => {
                        aim_at(
                            car,
                            self.plan.slice.position,
                            Vector3::zeros(),
                            false,
                            controller,
                            &mut output,
                        );
                    }
                }
            }
            AerialPhase::Start => {}
        }
        ActionProgress::Continue(output)
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn abandon(&mut self) {
        self.finished = true;
    }

    fn done(&mut self, progress: ActionProgress) -> ActionProgress {
        self.finished = true;
        progress
    }
}
