use redline_core::{CarData, DebugColor, ShotSettings};

use super::{approach, reach, ShotPlan};
use crate::actions::{ActionCtx, ActionProgress};

/// Below this much time remaining a ground shot no longer lets go.
const COMMIT_TIME: f64 = 0.5;

/// Hit the ball without leaving the ground.
#[derive(Clone, Debug, PartialEq)]
pub struct GroundShot {
    plan: ShotPlan,
    committed: bool,
    finished: bool,
}

impl GroundShot {
    pub fn new(plan: ShotPlan) -> Self {
        Self {
            plan,
            committed: false,
            finished: false,
        }
    }

    pub fn plan(&self) -> &ShotPlan {
        &self.plan
    }

    pub fn is_valid(&self, car: &CarData, now: f64, settings: &ShotSettings) -> bool {
        let time_remaining = self.plan.time_remaining(now);
        time_remaining > 0.0
            && car.is_grounded
            && self.plan.slice.position.z <= settings.ground_max_height
            && self.plan.approach_angle(car) <= settings.max_approach_angle
            && reach::ground_eta(
                car,
                self.plan.slice.position,
                settings.contact_distance,
                settings.turn_time_per_radian,
            ) <= time_remaining
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
        if !car.is_grounded || !self.plan.is_still_predicted(&ctx.world.ball_prediction) {
            log::debug!("Ground shot at t={:.2} is out of reach", self.plan.slice.time);
            return self.done(ActionProgress::failure());
        }
        if time_remaining <= COMMIT_TIME {
            self.committed = true;
        }

        self.plan.draw(
            ctx.debug,
            self.plan.ground_hit_point(settings.contact_distance),
            DebugColor::Green,
        );
        ActionProgress::Continue(approach(&self.plan, car, now, settings, controller))
    }

    pub fn interruptible(&self) -> bool {
        !self.committed
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
