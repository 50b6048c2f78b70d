//! Committed maneuvers that intercept a predicted ball state.

mod aerial;
mod ground;
mod jump;
mod reach;
mod search;

pub use aerial::AerialShot;
pub use ground::GroundShot;
pub use jump::JumpShot;
pub use reach::JumpKind;
pub use search::{default_shot_check, find_shot, ShotCtx};

use redline_core::{
    consts::{CAR_MAX_SPEED, CAR_REST_Z},
    direction, flat, flat_angle_between, flat_direction, safe_normalize, BallPrediction, BallSlice,
    CarData, ControllerSettings, DebugColor, DebugDraw, ShotSettings, Vector3,
};

use crate::{
    actions::{ActionCtx, ActionProgress},
    control::{aim_at, throttle, ControllerOutput},
};

/// How far (in seconds) from a shot's slice time the current prediction is searched for a
/// matching slice.
const PREDICTION_MATCH_TIME: f64 = 0.05;
/// How far the ball may drift from the planned slice before the shot is given up, in uu.
const PREDICTION_MATCH_DISTANCE: f64 = 50.0;

/// What every shot knows about the hit it is going for.
#[derive(Clone, Debug, PartialEq)]
pub struct ShotPlan {
    /// The predicted ball state the shot intercepts
    pub slice: BallSlice,
    /// Expected ball velocity right after the hit
    pub ball_velocity: Vector3,
    /// Where the ball should end up, inside the target
    pub aim: Vector3,
    /// Unit vector from the ball towards `aim`
    pub direction: Vector3,
    /// `direction` projected to the ground and normalized
    pub flat_direction: Vector3,
}

impl ShotPlan {
    pub fn new(car: &CarData, slice: BallSlice, ball_velocity: Vector3, aim: Vector3) -> Self {
        // Without a usable aim direction the ball is hit the way the car is going
        let fallback = flat_direction(car.position, slice.position)
            .or_else(|| safe_normalize(flat(car.forward())))
            .unwrap_or_else(Vector3::x);
        let direction = direction(slice.position, aim).unwrap_or(fallback);
        let flat_direction = safe_normalize(flat(direction)).unwrap_or(fallback);
        Self {
            slice,
            ball_velocity,
            aim,
            direction,
            flat_direction,
        }
    }

    pub fn time_remaining(&self, now: f64) -> f64 {
        self.slice.time_remaining(now)
    }

    /// Where a grounded car's center should be at contact.
    pub fn ground_hit_point(&self, contact_distance: f64) -> Vector3 {
        let point = self.slice.position - self.flat_direction * contact_distance;
        Vector3::new(point.x, point.y, CAR_REST_Z)
    }

    /// Where an airborne car's center should be at contact.
    pub fn air_hit_point(&self, contact_distance: f64) -> Vector3 {
        self.slice.position - self.direction * contact_distance
    }

    /// Angle between the car's approach to the ball and the direction it should leave in,
    /// seen from above.
    pub fn approach_angle(&self, car: &CarData) -> f64 {
        flat_direction(car.position, self.slice.position)
            .map_or(0.0, |approach| flat_angle_between(approach, self.flat_direction).abs())
    }

    /// Whether the latest prediction still puts the ball where this plan expects it.
    ///
    /// Predictions that don't cover the slice's time can't contradict the plan.
    pub fn is_still_predicted(&self, prediction: &BallPrediction) -> bool {
        let nearest = prediction.iter().min_by(|a, b| {
            let a = (a.time - self.slice.time).abs();
            let b = (b.time - self.slice.time).abs();
            a.total_cmp(&b)
        });
        match nearest {
            Some(slice) if (slice.time - self.slice.time).abs() <= PREDICTION_MATCH_TIME => {
                let drift = (slice.position - self.slice.position).norm();
                let allowed = PREDICTION_MATCH_DISTANCE
                    + self.slice.velocity.norm() * (slice.time - self.slice.time).abs();
                drift <= allowed
            }
            _ => true,
        }
    }

    fn draw(&self, debug: &mut DebugDraw, hit_point: Vector3, color: DebugColor) {
        debug.line_3d(self.slice.position, self.aim, color);
        debug.cross(self.aim, 80.0, color);
        debug.octahedron(self.slice.position, 2.0 * redline_core::consts::BALL_RADIUS, color);
        debug.cube(hit_point, Vector3::new(118.0, 84.0, 36.0), color);
    }
}

/// Drive towards the ground hit point so that the car arrives when the ball does.
fn approach(
    plan: &ShotPlan,
    car: &CarData,
    now: f64,
    shot: &ShotSettings,
    controller: &ControllerSettings,
) -> ControllerOutput {
    let time_remaining = plan.time_remaining(now);
    let ball = plan.slice.position;
    let distance_to_ball = flat(ball - car.position).norm();
    // Once lined up, go straight through the ball
    let aim = if distance_to_ball <= 2.0 * shot.contact_distance {
        ball
    } else {
        plan.ground_hit_point(shot.contact_distance)
    };
    let distance = (distance_to_ball - shot.contact_distance).max(0.0);
    let speed = if time_remaining > 0.0 {
        (distance / time_remaining).min(CAR_MAX_SPEED)
    } else {
        CAR_MAX_SPEED
    };

    let mut output = ControllerOutput::new();
    aim_at(
        car,
        Vector3::new(aim.x, aim.y, car.position.z),
        Vector3::zeros(),
        false,
        controller,
        &mut output,
    );
    throttle(car, speed, false, controller, &mut output);
    output
}

/// A shot, one variant per way of reaching the ball.
#[derive(Clone, Debug, PartialEq)]
pub enum Shot {
    Aerial(AerialShot),
    Ground(GroundShot),
    Jump(JumpShot),
    /// Always holds a [`JumpShot`] of [`JumpKind::Double`]
    DoubleJump(JumpShot),
}

impl Shot {
    pub fn plan(&self) -> &ShotPlan {
        match self {
            Shot::Aerial(shot) => shot.plan(),
            Shot::Ground(shot) => shot.plan(),
            Shot::Jump(shot) | Shot::DoubleJump(shot) => shot.plan(),
        }
    }

    pub fn slice(&self) -> &BallSlice {
        &self.plan().slice
    }

    /// Whether the car can still make this shot. Pure: no state is touched.
    pub fn is_valid(&self, car: &CarData, now: f64, settings: &ShotSettings) -> bool {
        match self {
            Shot::Aerial(shot) => shot.is_valid(car, now, settings),
            Shot::Ground(shot) => shot.is_valid(car, now, settings),
            Shot::Jump(shot) | Shot::DoubleJump(shot) => shot.is_valid(car, now, settings),
        }
    }

    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        match self {
            Shot::Aerial(shot) => shot.run(ctx),
            Shot::Ground(shot) => shot.run(ctx),
            Shot::Jump(shot) | Shot::DoubleJump(shot) => shot.run(ctx),
        }
    }

    pub fn interruptible(&self) -> bool {
        match self {
            Shot::Aerial(_) => false,
            Shot::Ground(shot) => shot.interruptible(),
            Shot::Jump(_) | Shot::DoubleJump(_) => false,
        }
    }

    pub fn finished(&self) -> bool {
        match self {
            Shot::Aerial(shot) => shot.finished(),
            Shot::Ground(shot) => shot.finished(),
            Shot::Jump(shot) | Shot::DoubleJump(shot) => shot.finished(),
        }
    }

    pub(crate) fn abandon(&mut self) {
        match self {
            Shot::Aerial(shot) => shot.abandon(),
            Shot::Ground(shot) => shot.abandon(),
            Shot::Jump(shot) | Shot::DoubleJump(shot) => shot.abandon(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shot::Aerial(_) => "AerialShot",
            Shot::Ground(_) => "GroundShot",
            Shot::Jump(_) => "JumpShot",
            Shot::DoubleJump(_) => "DoubleJumpShot",
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use redline_core::{BallData, BallPrediction, CarData, TeamColor, WorldData};

    use super::*;

    /// A world with a ball released at `position`, predicted at 60 Hz from `now`.
    pub fn ball_world(car: CarData, position: Vector3, now: f64) -> WorldData {
        let ball = BallData {
            position,
            ..Default::default()
        };
        WorldData {
            game_time: now,
            ball_prediction: BallPrediction::ballistic(&ball, now, 4.0, 1.0 / 60.0),
            ball,
            cars: vec![car],
            ..Default::default()
        }
    }

    pub fn blue_car() -> CarData {
        CarData::new(0, TeamColor::Blue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use redline_core::TeamColor;

    fn plan(car: &CarData, ball: Vector3, aim: Vector3) -> ShotPlan {
        ShotPlan::new(car, BallSlice::new(1.0, ball, Vector3::zeros()), Vector3::zeros(), aim)
    }

    #[test]
    fn test_hit_points() {
        let car = CarData::new(0, TeamColor::Blue);
        let plan = plan(
            &car,
            Vector3::new(0.0, 1000.0, 300.0),
            Vector3::new(0.0, 5120.0, 300.0),
        );
        assert_relative_eq!(plan.flat_direction, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(
            plan.ground_hit_point(150.0),
            Vector3::new(0.0, 850.0, CAR_REST_Z),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            plan.air_hit_point(150.0),
            Vector3::new(0.0, 850.0, 300.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_degenerate_aim_uses_approach() {
        let car = CarData::new(0, TeamColor::Blue);
        let ball = Vector3::new(500.0, 0.0, 92.75);
        let plan = plan(&car, ball, ball);
        assert_relative_eq!(plan.flat_direction, Vector3::x(), epsilon = 1e-12);
        assert_relative_eq!(plan.approach_angle(&car), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_is_still_predicted() {
        let car = CarData::new(0, TeamColor::Blue);
        let ball = Vector3::new(0.0, 1000.0, 92.75);
        let plan = plan(&car, ball, Vector3::new(0.0, 5120.0, 92.75));

        let same = BallPrediction::new(vec![BallSlice::new(1.0, ball, Vector3::zeros())]);
        assert!(plan.is_still_predicted(&same));

        let moved = BallSlice::new(1.0, ball + Vector3::new(300.0, 0.0, 0.0), Vector3::zeros());
        assert!(!plan.is_still_predicted(&BallPrediction::new(vec![moved])));

        // Nothing close in time to compare with
        let later = BallSlice::new(3.0, Vector3::zeros(), Vector3::zeros());
        assert!(plan.is_still_predicted(&BallPrediction::new(vec![later])));
        assert!(plan.is_still_predicted(&BallPrediction::default()));
    }
}
