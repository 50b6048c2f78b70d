use serde::{Deserialize, Serialize};

use crate::{
    consts::{CAR_REST_Z, MAX_BOOST},
    BallPrediction, FieldGeometry, Goal, Rotation3, TeamColor, Vector3,
};

/// A struct to store the state of a car from a single frame.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CarData {
    /// Index of the car in the match
    pub index: usize,
    pub team: TeamColor,
    /// Position of the car's center of mass in world coordinates
    pub position: Vector3,
    /// Velocity in uu/s, world coordinates
    pub velocity: Vector3,
    /// Angular velocity in rad/s, world coordinates
    pub angular_velocity: Vector3,
    /// Rotation from the car's local frame (`x` forward, `y` left, `z` up) to the world
    /// frame.
    pub orientation: Rotation3,
    /// Boost amount, in `[0, 100]`
    pub boost: f64,
    /// Whether all wheels are touching a surface
    pub is_grounded: bool,
    /// Whether the second jump (or dodge) has been used since leaving the ground
    pub has_double_jumped: bool,
}

impl CarData {
    /// A car resting on the ground at the origin, facing `+x`.
    pub fn new(index: usize, team: TeamColor) -> Self {
        Self {
            index,
            team,
            position: Vector3::new(0.0, 0.0, CAR_REST_Z),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            orientation: Rotation3::identity(),
            boost: 33.0,
            is_grounded: true,
            has_double_jumped: false,
        }
    }

    pub fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vector3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Rotate the car to the given heading (counter-clockwise from `+x`), upright.
    pub fn with_yaw(mut self, yaw: f64) -> Self {
        self.orientation = Rotation3::from_axis_angle(&Vector3::z_axis(), yaw);
        self
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = boost.clamp(0.0, MAX_BOOST);
        self
    }

    pub fn airborne(mut self) -> Self {
        self.is_grounded = false;
        self
    }

    pub fn forward(&self) -> Vector3 {
        self.orientation * Vector3::x()
    }

    pub fn left(&self) -> Vector3 {
        self.orientation * Vector3::y()
    }

    pub fn up(&self) -> Vector3 {
        self.orientation * Vector3::z()
    }

    /// Express a world-space vector in the car's local frame.
    pub fn local(&self, v: Vector3) -> Vector3 {
        self.orientation.inverse() * v
    }

    /// Express a car-local vector in world space.
    pub fn global(&self, v: Vector3) -> Vector3 {
        self.orientation * v
    }

    /// Angular velocity in the local frame: `x` is the roll rate (positive lifts the left
    /// side), `y` is the pitch rate (positive lowers the nose), `z` is the yaw rate
    /// (positive turns left).
    pub fn local_angular_velocity(&self) -> Vector3 {
        self.local(self.angular_velocity)
    }

    /// Signed speed along the car's nose.
    pub fn forward_speed(&self) -> f64 {
        self.local(self.velocity).x
    }

    pub fn distance_to(&self, point: Vector3) -> f64 {
        (point - self.position).norm()
    }
}

/// A struct to store the ball state from a single frame.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BallData {
    /// Position of the ball's center, world coordinates
    pub position: Vector3,
    /// Velocity in uu/s
    pub velocity: Vector3,
    pub angular_velocity: Vector3,
}

impl Default for BallData {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, crate::consts::BALL_RADIUS),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

/// A boost pickup on the field.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BoostPad {
    pub position: Vector3,
    /// Whether this pad refills to 100 (otherwise it gives a small amount)
    pub is_full_boost: bool,
    /// Whether the pad can currently be picked up
    pub is_active: bool,
}

/// A struct to store the world state from a single frame.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct WorldData {
    /// Seconds on the game clock. Ball prediction timestamps use the same clock.
    pub game_time: f64,
    /// Whether the round is in its kickoff phase
    pub is_kickoff: bool,
    pub cars: Vec<CarData>,
    pub ball: BallData,
    pub ball_prediction: BallPrediction,
    pub boost_pads: Vec<BoostPad>,
    pub field: FieldGeometry,
}

impl WorldData {
    pub fn car(&self, index: usize) -> Option<&CarData> {
        self.cars.iter().find(|car| car.index == index)
    }

    /// All cars on the same team as `car`, excluding `car` itself.
    pub fn teammates<'a>(&'a self, car: &'a CarData) -> impl Iterator<Item = &'a CarData> + 'a {
        self.cars
            .iter()
            .filter(move |other| other.team == car.team && other.index != car.index)
    }

    /// The goal defended by `team`.
    pub fn own_goal(&self, team: TeamColor) -> Goal {
        self.field.goal(team)
    }

    /// The goal `team` attacks.
    pub fn their_goal(&self, team: TeamColor) -> Goal {
        self.field.goal(team.opponent())
    }
}
