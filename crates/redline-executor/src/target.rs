use redline_core::{
    consts::BALL_RADIUS, find_flat_intersection, flat, flat_angle_between, flat_direction, Goal,
    Vector3,
};

/// A vertical rectangle the ball should end up in, usually a goal mouth.
///
/// The rectangle is given by two opposite corners. "Left" and "right" are as seen from the
/// side the ball is shot from, so walking from the right corner to the left corner turns
/// counter-clockwise around an attacker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    top_left: Vector3,
    bottom_right: Vector3,
    /// Distance kept from every edge, e.g. the ball radius for a goal
    margin: f64,
    /// Angle by which a shot may miss the region and still fit, in radians
    fit_tolerance: f64,
}

/// The region in a line-aligned frame.
struct Span {
    /// Bottom right corner projected to the ground
    origin: Vector3,
    /// Unit vector pointing from the right edge to the left edge
    axis: Vector3,
    /// Allowed distance along `axis` from `origin`
    along: (f64, f64),
    /// Allowed heights
    height: (f64, f64),
}

impl Span {
    fn point(&self, along: f64, z: f64) -> Vector3 {
        self.origin + self.axis * along + Vector3::new(0.0, 0.0, z)
    }
}

impl Target {
    pub fn new(top_left: Vector3, bottom_right: Vector3) -> Self {
        Self {
            top_left,
            bottom_right,
            margin: 0.0,
            fit_tolerance: 0.0,
        }
    }

    /// The mouth of `goal`, shrunk by a ball radius so that aim points keep the whole
    /// ball inside.
    pub fn goal(goal: &Goal) -> Self {
        Self::new(goal.top_left(), goal.bottom_right()).with_margin(BALL_RADIUS)
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin.max(0.0);
        self
    }

    pub fn with_fit_tolerance(mut self, tolerance: f64) -> Self {
        self.fit_tolerance = tolerance.max(0.0);
        self
    }

    pub fn top_left(&self) -> Vector3 {
        self.top_left
    }

    pub fn bottom_right(&self) -> Vector3 {
        self.bottom_right
    }

    fn span(&self) -> Span {
        let (axis, width) = match flat_direction(self.bottom_right, self.top_left) {
            Some(axis) => (axis, flat(self.top_left - self.bottom_right).norm()),
            None => (Vector3::x(), 0.0),
        };
        let low = self.bottom_right.z.min(self.top_left.z);
        let high = self.bottom_right.z.max(self.top_left.z);
        Span {
            origin: flat(self.bottom_right),
            axis,
            along: shrink(0.0, width, self.margin),
            height: shrink(low, high, self.margin),
        }
    }

    /// Whether a straight shot from `origin` through `point` goes into the region.
    ///
    /// The test is done from above: the direction `origin -> point` has to lie between
    /// the directions from `point` to the right and left edges, give or take the fit
    /// tolerance.
    pub fn fits(&self, origin: Vector3, point: Vector3) -> bool {
        let Some(shot) = flat_direction(origin, point) else {
            return false;
        };
        let span = self.span();
        let right = span.point(span.along.0, 0.0);
        let left = span.point(span.along.1, 0.0);
        let (Some(to_right), Some(to_left)) =
            (flat_direction(point, right), flat_direction(point, left))
        else {
            // Right on an edge
            return true;
        };
        if flat_angle_between(to_right, to_left) < 0.0 {
            // Behind the region
            return false;
        }

        let from_right = flat_angle_between(shot, to_right);
        let from_left = flat_angle_between(shot, to_left);
        if from_right <= 0.0 && from_left >= 0.0 {
            return true;
        }
        from_right.abs().min(from_left.abs()) <= self.fit_tolerance
    }

    /// Where a ball leaving `location` with `velocity` would cross the region's plane,
    /// moved to the nearest point of the region.
    ///
    /// Balls that never reach the plane aim at the point of the region closest to them.
    pub fn clamp(&self, location: Vector3, velocity: Vector3) -> Vector3 {
        let span = self.span();
        let destination = match find_flat_intersection(location, velocity, span.origin, span.axis)
        {
            Some((t, crossing)) if t > 0.0 => {
                crossing + Vector3::new(0.0, 0.0, location.z + velocity.z * t)
            }
            _ => location,
        };
        self.clamp_point(destination)
    }

    /// The point of the region closest to `point`, after projecting it onto the region's
    /// plane. Points inside the region are returned as is.
    pub fn clamp_point(&self, point: Vector3) -> Vector3 {
        let span = self.span();
        let offset = flat(point - span.origin);
        let along = offset.dot(&span.axis);
        let off_plane = (offset - span.axis * along).norm();
        let inside = off_plane < 1e-9
            && (span.along.0..=span.along.1).contains(&along)
            && (span.height.0..=span.height.1).contains(&point.z);
        if inside {
            return point;
        }

        span.point(
            along.clamp(span.along.0, span.along.1),
            point.z.clamp(span.height.0, span.height.1),
        )
    }

    /// Distance from `point` to the closest point of the region.
    pub fn distance_to(&self, point: Vector3) -> f64 {
        let span = self.span();
        let offset = flat(point - span.origin);
        let along = offset.dot(&span.axis);
        let closest = span.point(
            along.clamp(span.along.0, span.along.1),
            point.z.clamp(span.height.0, span.height.1),
        );
        (point - closest).norm()
    }
}

/// Shrinks `[low, high]` by `margin` on both sides, collapsing it to its middle if it is
/// too small.
fn shrink(low: f64, high: f64, margin: f64) -> (f64, f64) {
    if high - low >= 2.0 * margin {
        (low + margin, high - margin)
    } else {
        let middle = (low + high) / 2.0;
        (middle, middle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;
    use redline_core::{FieldGeometry, TeamColor};

    fn orange_goal() -> Target {
        Target::goal(&FieldGeometry::default().goal(TeamColor::Orange))
    }

    #[test]
    fn test_clamp_point_closure() {
        let target = orange_goal();
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            let point = Vector3::new(
                rng.gen_range(-5000.0..5000.0),
                rng.gen_range(-6000.0..6000.0),
                rng.gen_range(-500.0..2500.0),
            );
            let clamped = target.clamp_point(point);
            assert!(target.distance_to(clamped) < 1e-6, "{point:?} -> {clamped:?}");
            // Clamping twice changes nothing
            assert_relative_eq!(target.clamp_point(clamped), clamped, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_clamp_point_inside_is_unchanged() {
        let target = orange_goal();
        let inside = Vector3::new(-300.0, 5120.0, 250.0);
        assert_eq!(target.clamp_point(inside), inside);

        // Outside along the line: pushed in by the margin
        let clamped = target.clamp_point(Vector3::new(2000.0, 5120.0, 0.0));
        assert_relative_eq!(clamped.x, 892.755 - BALL_RADIUS, epsilon = 1e-9);
        assert_relative_eq!(clamped.z, BALL_RADIUS, epsilon = 1e-9);
    }

    #[test]
    fn test_narrow_target_collapses() {
        let target = Target::new(Vector3::new(-50.0, 0.0, 100.0), Vector3::new(50.0, 0.0, 0.0))
            .with_margin(BALL_RADIUS);
        let clamped = target.clamp_point(Vector3::new(500.0, -200.0, 900.0));
        assert_relative_eq!(clamped, Vector3::new(0.0, 0.0, 50.0), epsilon = 1e-9);
    }

    #[test]
    fn test_fits_straight_shot() {
        let target = orange_goal();
        assert!(target.fits(Vector3::new(0.0, -20.0, 17.0), Vector3::new(0.0, 0.0, 92.75)));
        assert!(target.fits(Vector3::new(300.0, 3000.0, 17.0), Vector3::new(200.0, 3500.0, 92.75)));
    }

    #[test]
    fn test_fits_rejects_wide_shots() {
        let target = orange_goal();
        // Driving across the field, the ball would go into the side wall
        let origin = Vector3::new(-2000.0, 0.0, 17.0);
        let point = Vector3::new(0.0, 100.0, 92.75);
        assert!(!target.fits(origin, point));
        assert!(target.with_fit_tolerance(std::f64::consts::FRAC_PI_2).fits(origin, point));
    }

    #[test]
    fn test_fits_degenerate() {
        let target = orange_goal();
        let point = Vector3::new(0.0, 0.0, 92.75);
        // No direction
        assert!(!target.fits(point, point));
        // Behind the goal line
        assert!(!target.fits(Vector3::new(0.0, 5500.0, 17.0), Vector3::new(0.0, 5600.0, 92.75)));
        // Shooting away from the goal
        assert!(!target.fits(Vector3::new(0.0, 100.0, 17.0), Vector3::new(0.0, 0.0, 92.75)));
    }

    #[test]
    fn test_clamp_follows_trajectory() {
        let target = orange_goal();
        let aim = target.clamp(Vector3::new(0.0, 0.0, 100.0), Vector3::new(100.0, 1000.0, 0.0));
        assert_relative_eq!(aim, Vector3::new(512.0, 5120.0, 100.0), epsilon = 1e-6);

        // Too wide: ends up at the post
        let aim = target.clamp(Vector3::new(0.0, 0.0, 100.0), Vector3::new(1000.0, 1000.0, 0.0));
        assert_relative_eq!(aim.x, 892.755 - BALL_RADIUS, epsilon = 1e-6);

        // Going away: the closest point to the ball
        let aim = target.clamp(Vector3::new(0.0, 0.0, 100.0), Vector3::new(0.0, -1000.0, 0.0));
        assert_relative_eq!(aim, Vector3::new(0.0, 5120.0, 100.0), epsilon = 1e-6);
    }
}
