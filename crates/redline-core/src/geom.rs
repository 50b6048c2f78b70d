use serde::{Deserialize, Serialize};

use crate::{
    consts::{CROSSBAR_Z, FIELD_MAX_X, FIELD_MAX_Y, FIELD_MAX_Z, GOALPOST_X},
    Vector3,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamColor {
    Blue,
    Orange,
}

impl TeamColor {
    pub fn opponent(&self) -> TeamColor {
        match self {
            TeamColor::Blue => TeamColor::Orange,
            TeamColor::Orange => TeamColor::Blue,
        }
    }

    /// The sign of the y coordinate of this team's goal. Blue defends `-y`.
    pub fn goal_side(&self) -> f64 {
        match self {
            TeamColor::Blue => -1.0,
            TeamColor::Orange => 1.0,
        }
    }
}

impl std::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamColor::Blue => write!(f, "blue"),
            TeamColor::Orange => write!(f, "orange"),
        }
    }
}

/// A goal mouth, seen from the field.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Goal {
    /// The team defending this goal
    pub team: TeamColor,
    /// Center of the goal line, on the ground
    pub location: Vector3,
    /// Bottom of the left post, as seen by an attacker facing the goal
    pub left_post: Vector3,
    /// Bottom of the right post, as seen by an attacker facing the goal
    pub right_post: Vector3,
    /// Height of the crossbar
    pub height: f64,
}

impl Goal {
    /// Top of the left post.
    pub fn top_left(&self) -> Vector3 {
        self.left_post + Vector3::new(0.0, 0.0, self.height)
    }

    /// Bottom of the right post.
    pub fn bottom_right(&self) -> Vector3 {
        self.right_post
    }

    pub fn width(&self) -> f64 {
        (self.left_post - self.right_post).norm()
    }
}

/// The field geometry.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FieldGeometry {
    /// Distance from the center to the side walls
    pub half_width: f64,
    /// Distance from the center to the goal lines
    pub half_length: f64,
    /// Height of the ceiling
    pub height: f64,
    /// Distance from the center of the goal to each post
    pub goal_half_width: f64,
    pub goal_height: f64,
}

impl Default for FieldGeometry {
    fn default() -> Self {
        Self {
            half_width: FIELD_MAX_X,
            half_length: FIELD_MAX_Y,
            height: FIELD_MAX_Z,
            goal_half_width: GOALPOST_X,
            goal_height: CROSSBAR_Z,
        }
    }
}

impl FieldGeometry {
    /// The goal defended by `team`.
    pub fn goal(&self, team: TeamColor) -> Goal {
        let y = team.goal_side() * self.half_length;
        // An attacker faces `side` along y, so its left is at `-side` along x.
        let side = team.goal_side();
        Goal {
            team,
            location: Vector3::new(0.0, y, 0.0),
            left_post: Vector3::new(-side * self.goal_half_width, y, 0.0),
            right_post: Vector3::new(side * self.goal_half_width, y, 0.0),
            height: self.goal_height,
        }
    }

    /// Whether `point` is within the walls, floor and ceiling.
    pub fn contains(&self, point: Vector3) -> bool {
        point.x.abs() <= self.half_width
            && point.y.abs() <= self.half_length
            && (0.0..=self.height).contains(&point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::flat_angle_between;

    #[test]
    fn test_goal_sides() {
        let field = FieldGeometry::default();
        let blue = field.goal(TeamColor::Blue);
        let orange = field.goal(TeamColor::Orange);
        assert!(blue.location.y < 0.0);
        assert!(orange.location.y > 0.0);
        assert_eq!(TeamColor::Blue.opponent(), TeamColor::Orange);
        assert!((blue.width() - 2.0 * GOALPOST_X).abs() < 1e-9);
    }

    #[test]
    fn test_left_post_is_on_the_attackers_left() {
        let field = FieldGeometry::default();
        for team in [TeamColor::Blue, TeamColor::Orange] {
            let goal = field.goal(team);
            let attacker = Vector3::new(0.0, 0.0, 0.0);
            let to_left = goal.left_post - attacker;
            let to_right = goal.right_post - attacker;
            // Rotating counter-clockwise from the right post reaches the left post
            assert!(flat_angle_between(to_right, to_left) > 0.0, "{team}");
        }
    }
}
