use redline_core::{consts::CAR_MAX_SPEED, direction, flat_direction, DebugColor, Vector3};

use super::{Action, ActionCtx, ActionProgress, Dodge, Speedflip};
use crate::control::{aim_at, throttle, ControllerOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickoffState {
    Approaching,
    SpeedFlipping,
    Finished,
}

/// Race to the ball at the start of a round, speedflipping on the way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Kickoff {
    speedflipped: bool,
    speedflip: Option<Speedflip>,
    finished: bool,
}

impl Kickoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> KickoffState {
        if self.finished {
            KickoffState::Finished
        } else if self.speedflip.as_ref().is_some_and(|flip| !flip.finished()) {
            KickoffState::SpeedFlipping
        } else {
            KickoffState::Approaching
        }
    }

    /// The speedflip started during this kickoff, if any.
    pub fn speedflip(&self) -> Option<&Speedflip> {
        self.speedflip.as_ref()
    }

    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        if !ctx.world.is_kickoff {
            log::debug!("Kickoff is over");
            self.finished = true;
            return ActionProgress::success();
        }

        if let Some(speedflip) = self.speedflip.as_mut().filter(|flip| !flip.finished()) {
            if let ActionProgress::Continue(output) = speedflip.run(ctx) {
                return ActionProgress::Continue(ControllerOutput {
                    boost: true,
                    ..output
                });
            }
        }

        let car = ctx.car;
        let settings = ctx.settings;
        let ball = ctx.world.ball.position;
        let their_goal = ctx.world.their_goal(car.team).location;
        let shot_direction = flat_direction(ball, their_goal)
            .unwrap_or_else(|| Vector3::new(0.0, -car.team.goal_side(), 0.0));
        // Slightly behind the ball, for a better angle on the 50/50
        let aim = ball - shot_direction * settings.kickoff.aim_offset;

        let mut output = ControllerOutput::new();
        throttle(car, CAR_MAX_SPEED, false, &settings.controller, &mut output);
        aim_at(car, aim, Vector3::zeros(), false, &settings.controller, &mut output);
        ctx.debug.cross(aim, 60.0, DebugColor::Orange);

        if car.velocity.norm() > settings.kickoff.speedflip_speed && !self.speedflipped {
            log::debug!("Speedflipping at {:.0} uu/s", car.velocity.norm());
            self.speedflipped = true;
            let heading = direction(car.position, aim).unwrap_or_else(|| car.forward());
            let speedflip = self.speedflip.insert(Speedflip::new(heading));
            return speedflip.run(ctx).map_output(|output| ControllerOutput {
                boost: true,
                ..output
            });
        }
        if !self.speedflipped
            && car.distance_to(ball) < settings.kickoff.dodge_distance
            && car.is_grounded
        {
            log::debug!("Dodging into the ball");
            self.finished = true;
            let dodge = Dodge::new(shot_direction, settings.kickoff.dodge_jump_duration);
            return ActionProgress::Handoff(Box::new(Action::Dodge(dodge)));
        }

        ActionProgress::Continue(output)
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn abandon(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use redline_core::{BotSettings, CarData, DebugDraw, TeamColor, WorldData};

    fn kickoff_world(car: CarData, time: f64) -> WorldData {
        WorldData {
            game_time: time,
            is_kickoff: true,
            cars: vec![car],
            ..Default::default()
        }
    }

    fn run(kickoff: &mut Kickoff, world: &WorldData) -> ActionProgress {
        let settings = BotSettings::default();
        let mut debug = DebugDraw::new();
        let mut ctx = ActionCtx::new(&world.cars[0], world, &settings, &mut debug);
        kickoff.run(&mut ctx)
    }

    fn diagonal_car(speed: f64) -> CarData {
        let heading = std::f64::consts::FRAC_PI_4;
        CarData::new(0, TeamColor::Blue)
            .with_position(Vector3::new(-2048.0, -2560.0, 17.01))
            .with_yaw(heading)
            .with_velocity(Vector3::new(heading.cos(), heading.sin(), 0.0) * speed)
    }

    #[test_log::test]
    fn test_approaches_with_full_throttle() {
        let mut kickoff = Kickoff::new();
        let world = kickoff_world(diagonal_car(300.0), 0.0);
        let ActionProgress::Continue(output) = run(&mut kickoff, &world) else {
            panic!("kickoff should be running");
        };
        assert_eq!(output.throttle, 1.0);
        assert!(output.boost);
        assert_eq!(kickoff.state(), KickoffState::Approaching);
        assert!(kickoff.speedflip().is_none());
    }

    #[test_log::test]
    fn test_steers_towards_the_offset_point() {
        // Facing +x from the left corner: the point behind the ball is to the left
        let car = CarData::new(0, TeamColor::Blue)
            .with_position(Vector3::new(-2048.0, -2560.0, 17.01))
            .with_velocity(Vector3::new(300.0, 0.0, 0.0));
        let ActionProgress::Continue(output) =
            run(&mut Kickoff::new(), &kickoff_world(car, 0.0))
        else {
            panic!("kickoff should be running");
        };
        assert!(output.steer > 0.0);

        // Facing -x from the right corner: now it's to the right
        let car = CarData::new(0, TeamColor::Blue)
            .with_position(Vector3::new(2048.0, -2560.0, 17.01))
            .with_yaw(std::f64::consts::PI)
            .with_velocity(Vector3::new(-300.0, 0.0, 0.0));
        let ActionProgress::Continue(output) =
            run(&mut Kickoff::new(), &kickoff_world(car, 0.0))
        else {
            panic!("kickoff should be running");
        };
        assert!(output.steer < 0.0);
    }

    #[test_log::test]
    fn test_speedflips_above_threshold() {
        let mut kickoff = Kickoff::new();
        let world = kickoff_world(diagonal_car(650.0), 0.0);
        let ActionProgress::Continue(output) = run(&mut kickoff, &world) else {
            panic!("kickoff should be running");
        };
        assert_eq!(kickoff.state(), KickoffState::SpeedFlipping);
        assert!(output.jump && output.boost);

        // Seeded towards the point behind the ball, not the ball itself
        let car = &world.cars[0];
        let ball = world.ball.position;
        let aim = ball - Vector3::y() * BotSettings::default().kickoff.aim_offset;
        let seeded = kickoff.speedflip().unwrap().direction();
        assert_relative_eq!(seeded, direction(car.position, aim).unwrap(), epsilon = 1e-9);
        assert!(seeded.angle(&direction(car.position, ball).unwrap()) > 0.01);

        // Only once
        let world = kickoff_world(diagonal_car(650.0), 0.05);
        run(&mut kickoff, &world);
        assert_eq!(kickoff.state(), KickoffState::SpeedFlipping);
    }

    #[test_log::test]
    fn test_finishes_when_kickoff_ends_mid_speedflip() {
        let mut kickoff = Kickoff::new();
        let world = kickoff_world(diagonal_car(650.0), 0.0);
        run(&mut kickoff, &world);
        assert_eq!(kickoff.state(), KickoffState::SpeedFlipping);

        let mut world = kickoff_world(diagonal_car(900.0).airborne(), 0.1);
        world.is_kickoff = false;
        assert!(matches!(run(&mut kickoff, &world), ActionProgress::Done(_)));
        assert!(kickoff.finished());
        assert_eq!(kickoff.state(), KickoffState::Finished);
    }

    #[test_log::test]
    fn test_dodges_when_close_and_slow() {
        let mut kickoff = Kickoff::new();
        let car = CarData::new(0, TeamColor::Blue)
            .with_position(Vector3::new(0.0, -700.0, 17.01))
            .with_yaw(std::f64::consts::FRAC_PI_2);
        let world = kickoff_world(car, 0.0);
        let ActionProgress::Handoff(next) = run(&mut kickoff, &world) else {
            panic!("expected a dodge");
        };
        let Action::Dodge(dodge) = *next else {
            panic!("expected a dodge");
        };
        assert!(dodge.direction().y > 0.99);
        assert!(kickoff.finished());
    }
}
