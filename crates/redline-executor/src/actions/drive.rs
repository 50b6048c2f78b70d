use redline_core::{flat, safe_normalize, CarData, ControllerSettings, DebugColor, Vector3};

use super::{ActionCtx, ActionProgress};
use crate::control::{aim_at, throttle, ControllerOutput};

/// Heading error above which the car slows down to turn, in radians.
const SHARP_TURN_ANGLE: f64 = 1.2;
/// Speed used for sharp turns, in uu/s.
const SHARP_TURN_SPEED: f64 = 900.0;

/// Drive to a point on the ground at the configured speed.
#[derive(Clone, Debug, PartialEq)]
pub struct Drive {
    target: Vector3,
    finished: bool,
}

impl Drive {
    pub fn new(target: Vector3) -> Self {
        Self {
            target,
            finished: false,
        }
    }

    pub fn target(&self) -> Vector3 {
        self.target
    }

    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        let car = ctx.car;
        let settings = ctx.settings;
        let to_target = flat(self.target - car.position);
        if to_target.norm() <= settings.drive.arrive_radius {
            self.finished = true;
            return ActionProgress::success();
        }

        let mut output = ControllerOutput::new();
        if !car.is_grounded {
            land_facing(car, to_target, &settings.controller, &mut output);
            return ActionProgress::Continue(output);
        }

        let angles = aim_at(
            car,
            Vector3::new(self.target.x, self.target.y, car.position.z),
            Vector3::zeros(),
            false,
            &settings.controller,
            &mut output,
        );
        let mut speed = settings.drive.speed;
        if angles.yaw.abs() > SHARP_TURN_ANGLE {
            speed = speed.min(SHARP_TURN_SPEED);
        }
        throttle(car, speed, false, &settings.controller, &mut output);

        ctx.debug.line_3d(car.position, self.target, DebugColor::White);
        ActionProgress::Continue(output)
    }

    pub fn interruptible(&self) -> bool {
        true
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn abandon(&mut self) {
        self.finished = true;
    }
}

/// Turn the wheels down and the nose along `heading` while in the air.
pub(crate) fn land_facing(
    car: &CarData,
    heading: Vector3,
    settings: &ControllerSettings,
    output: &mut ControllerOutput,
) {
    let heading = safe_normalize(flat(heading))
        .or_else(|| safe_normalize(flat(car.forward())))
        .unwrap_or_else(Vector3::x);
    aim_at(
        car,
        car.position + heading * 1000.0,
        Vector3::z(),
        false,
        settings,
        output,
    );
    output.throttle = 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::{BotSettings, DebugDraw, TeamColor, WorldData};

    fn run(drive: &mut Drive, car: &CarData) -> ActionProgress {
        run_with(drive, car, &BotSettings::default())
    }

    fn run_with(drive: &mut Drive, car: &CarData, settings: &BotSettings) -> ActionProgress {
        let world = WorldData {
            cars: vec![car.clone()],
            ..Default::default()
        };
        let mut debug = DebugDraw::new();
        let mut ctx = ActionCtx::new(car, &world, settings, &mut debug);
        drive.run(&mut ctx)
    }

    #[test]
    fn test_drive_arrives() {
        let car = CarData::new(0, TeamColor::Blue);
        let mut drive = Drive::new(Vector3::new(50.0, 0.0, 0.0));
        assert!(matches!(run(&mut drive, &car), ActionProgress::Done(_)));
        assert!(drive.finished());
    }

    #[test]
    fn test_drive_steers_towards_target() {
        let car = CarData::new(0, TeamColor::Blue);
        let mut drive = Drive::new(Vector3::new(1000.0, 1000.0, 0.0));
        let ActionProgress::Continue(output) = run(&mut drive, &car) else {
            panic!("drive should still be going");
        };
        assert!(output.steer > 0.0);
        assert_eq!(output.throttle, 1.0);
        assert!(!drive.finished());
    }

    #[test]
    fn test_drive_uses_configured_speed() {
        let mut settings = BotSettings::default();
        settings.drive.speed = 500.0;
        let car = CarData::new(0, TeamColor::Blue).with_velocity(Vector3::new(1000.0, 0.0, 0.0));
        let mut drive = Drive::new(Vector3::new(3000.0, 0.0, 0.0));
        let ActionProgress::Continue(output) = run_with(&mut drive, &car, &settings) else {
            panic!("drive should still be going");
        };
        assert!(output.throttle < 0.0);
        assert!(!output.boost);
        assert!(drive.interruptible());
    }

    #[test]
    fn test_drive_slows_for_sharp_turns() {
        let car = CarData::new(0, TeamColor::Blue).with_velocity(Vector3::new(1400.0, 0.0, 0.0));
        let mut drive = Drive::new(Vector3::new(-1000.0, 10.0, 0.0));
        let ActionProgress::Continue(output) = run(&mut drive, &car) else {
            panic!("drive should still be going");
        };
        assert!(output.throttle < 0.0);
    }

    #[test]
    fn test_drive_lands_upright() {
        // Upside down in the air
        let car = CarData {
            orientation: redline_core::Rotation3::from_axis_angle(&Vector3::x_axis(), 3.0),
            ..CarData::new(0, TeamColor::Blue)
                .with_position(Vector3::new(0.0, 0.0, 500.0))
                .airborne()
        };
        let mut drive = Drive::new(Vector3::new(1000.0, 0.0, 0.0));
        let ActionProgress::Continue(output) = run(&mut drive, &car) else {
            panic!("drive should still be going");
        };
        assert!(output.roll.abs() > 0.5);
        assert!(!output.boost);
    }
}
