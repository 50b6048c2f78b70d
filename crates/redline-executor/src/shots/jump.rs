use redline_core::{
    consts::{CAR_REST_Z, JUMP_HOLD_TIME},
    CarData, DebugColor, ShotSettings, Vector3,
};

use super::{approach, reach, JumpKind, ShotPlan};
use crate::{
    actions::{ActionCtx, ActionProgress},
    control::{aim_at, ControllerOutput},
};

/// Longest a jump may last before the shot gives up, in seconds.
const JUMP_TIMEOUT: f64 = 2.5;

#[derive(Clone, Copy, Debug, PartialEq)]
enum JumpPhase {
    Approach,
    Jumping {
        start: f64,
        released: bool,
        second_jump: bool,
    },
}

/// Jump (once or twice) to hit a ball above the ground.
#[derive(Clone, Debug, PartialEq)]
pub struct JumpShot {
    kind: JumpKind,
    plan: ShotPlan,
    phase: JumpPhase,
    finished: bool,
}

impl JumpShot {
    pub fn new(kind: JumpKind, plan: ShotPlan) -> Self {
        Self {
            kind,
            plan,
            phase: JumpPhase::Approach,
            finished: false,
        }
    }

    pub fn kind(&self) -> JumpKind {
        self.kind
    }

    pub fn plan(&self) -> &ShotPlan {
        &self.plan
    }

    /// Whether the car has left the ground for this shot.
    pub fn is_jumping(&self) -> bool {
        matches!(self.phase, JumpPhase::Jumping { .. })
    }

    /// Seconds between pressing jump and reaching the ball's height, if the jump gets
    /// that high at all.
    pub fn jump_time(&self, settings: &ShotSettings) -> Option<f64> {
        let rise = self.plan.slice.position.z - settings.contact_reach - CAR_REST_Z;
        self.kind.time_to_rise(rise)
    }

    fn max_height(&self, settings: &ShotSettings) -> f64 {
        match self.kind {
            JumpKind::Single => settings.jump_max_height,
            JumpKind::Double => settings.double_jump_max_height,
        }
    }

    pub fn is_valid(&self, car: &CarData, now: f64, settings: &ShotSettings) -> bool {
        let time_remaining = self.plan.time_remaining(now);
        let height = self.plan.slice.position.z;
        if time_remaining <= 0.0
            || !car.is_grounded
            || height <= settings.ground_max_height
            || height > self.max_height(settings)
            || self.plan.approach_angle(car) > settings.max_approach_angle
        {
            return false;
        }

        let Some(jump_time) = self.jump_time(settings) else {
            return false;
        };
        jump_time <= time_remaining
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
        self.plan.draw(
            ctx.debug,
            self.plan.ground_hit_point(settings.contact_distance),
            DebugColor::Blue,
        );

        let (start, mut released, mut second_jump) = match self.phase {
            JumpPhase::Jumping {
                start,
                released,
                second_jump,
            } => (start, released, second_jump),
            JumpPhase::Approach => {
                if !car.is_grounded || !self.plan.is_still_predicted(&ctx.world.ball_prediction) {
                    log::debug!("Jump shot at t={:.2} is out of reach", self.plan.slice.time);
                    return self.done(ActionProgress::failure());
                }
                let jump_time = self.jump_time(settings).unwrap_or(0.0);
                if time_remaining > jump_time {
                    return ActionProgress::Continue(approach(
                        &self.plan, car, now, settings, controller,
                    ));
                }
                (now, false, false)
            }
        };
        let elapsed = now - start;
        if elapsed > JUMP_HOLD_TIME && car.is_grounded {
            // Landed
            return self.done(ActionProgress::success());
        }
        if elapsed > JUMP_TIMEOUT {
            return self.done(ActionProgress::failure());
        }

        let mut output = ControllerOutput::new();
        output.throttle = 1.0;
        aim_at(
            car,
            self.plan.slice.position,
            Vector3::zeros(),
            false,
            controller,
            &mut output,
        );
        if elapsed < JUMP_HOLD_TIME {
            output.jump = true;
        } else if self.kind == JumpKind::Double && !released {
            // One tick with the button up before the second jump
            released = true;
        } else if self.kind == JumpKind::Double && !second_jump {
            second_jump = true;
            output = output.with_neutral_stick();
            output.jump = true;
        }
        self.phase = JumpPhase::Jumping {
            start,
            released,
            second_jump,
        };
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shots::test_utils::{blue_car, ball_world};
    use redline_core::{BallSlice, BotSettings, DebugDraw};

    fn shot_at(kind: JumpKind, height: f64, time: f64) -> JumpShot {
        let ball = Vector3::new(1000.0, 0.0, height);
        JumpShot::new(
            kind,
            ShotPlan::new(
                &blue_car(),
                BallSlice::new(time, ball, Vector3::zeros()),
                Vector3::zeros(),
                Vector3::new(5000.0, 0.0, height),
            ),
        )
    }

    #[test]
    fn test_height_bands() {
        let settings = ShotSettings::default();
        let car = blue_car();
        assert!(!shot_at(JumpKind::Single, 100.0, 2.0).is_valid(&car, 0.0, &settings));
        assert!(shot_at(JumpKind::Single, 250.0, 2.0).is_valid(&car, 0.0, &settings));
        assert!(!shot_at(JumpKind::Single, 450.0, 2.0).is_valid(&car, 0.0, &settings));
        assert!(shot_at(JumpKind::Double, 450.0, 2.0).is_valid(&car, 0.0, &settings));
        assert!(!shot_at(JumpKind::Double, 800.0, 2.0).is_valid(&car, 0.0, &settings));
    }

    #[test]
    fn test_jump_time_counts() {
        let settings = ShotSettings::default();
        let car = blue_car().with_position(Vector3::new(850.0, 0.0, 17.01));
        let shot = shot_at(JumpKind::Double, 450.0, 2.0);
        let jump_time = shot.jump_time(&settings).unwrap();
        assert!(jump_time > JUMP_HOLD_TIME);
        // Close enough to drive there, but not to jump that high
        assert!(!shot.is_valid(&car, 2.0 - jump_time * 0.5, &settings));
    }

    #[test]
    fn test_double_jump_sequence() {
        let settings = BotSettings::default();
        let mut shot = shot_at(JumpKind::Double, 450.0, 1.0);
        let jump_time = shot.jump_time(&settings.shot).unwrap();
        let car = blue_car().with_position(Vector3::new(850.0, 0.0, 17.01));
        let mut debug = DebugDraw::new();

        let mut jumps = Vec::new();
        let mut now = 1.0 - jump_time + 1e-6;
        for tick in 0..20 {
            // Leaves the ground after the first tick
            let car = if tick == 0 {
                car.clone()
            } else {
                car.clone().airborne()
            };
            let world = ball_world(car.clone(), shot.plan.slice.position, now);
            let mut ctx = ActionCtx::new(&car, &world, &settings, &mut debug);
            match shot.run(&mut ctx) {
                ActionProgress::Continue(output) => jumps.push(output.jump),
                other => panic!("unexpected {other:?}"),
            }
            now += 1.0 / 60.0;
        }

        assert!(shot.is_jumping());
        // Held for the hold time, one tick off, one tick on, then off
        let held = jumps.iter().take_while(|jump| **jump).count();
        assert!((12..=13).contains(&held), "{jumps:?}");
        assert_eq!(&jumps[held..held + 3], &[false, true, false]);
    }
}
