use serde::{Deserialize, Serialize};

use crate::{
    consts::{BALL_RADIUS, BALL_RESTITUTION, GRAVITY},
    BallData, Vector3,
};

/// A sampled future state of the ball.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BallSlice {
    /// Game time at which the ball is predicted to be in this state, in seconds
    pub time: f64,
    pub position: Vector3,
    pub velocity: Vector3,
}

impl BallSlice {
    pub fn new(time: f64, position: Vector3, velocity: Vector3) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }

    /// Seconds left until the ball reaches this state.
    pub fn time_remaining(&self, now: f64) -> f64 {
        self.time - now
    }
}

/// A finite, time-ordered sequence of predicted ball states.
///
/// The prediction is produced outside of the bot and refreshed every tick; nothing
/// should assume a fixed slice count or spacing.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct BallPrediction {
    slices: Vec<BallSlice>,
}

impl BallPrediction {
    pub fn new(slices: Vec<BallSlice>) -> Self {
        Self { slices }
    }

    /// Predict a ball that only feels gravity and bounces off the floor.
    ///
    /// Walls, ceiling and spin are ignored, so this is only good for offline tooling and
    /// tests. Slices are `dt` apart and cover `horizon` seconds after `now`.
    pub fn ballistic(ball: &BallData, now: f64, horizon: f64, dt: f64) -> Self {
        if dt <= 0.0 || horizon <= 0.0 {
            return Self::default();
        }

        // Nudge down so that float noise in `horizon / dt` doesn't add a slice
        let steps = (horizon / dt - 1e-9).ceil() as usize;
        let mut position = ball.position;
        let mut velocity = ball.velocity;
        let mut slices = Vec::with_capacity(steps);
        for step in 1..=steps {
            velocity.z -= GRAVITY * dt;
            position += velocity * dt;
            if position.z < BALL_RADIUS {
                position.z = BALL_RADIUS + (BALL_RADIUS - position.z) * BALL_RESTITUTION;
                velocity.z = -velocity.z * BALL_RESTITUTION;
            }
            slices.push(BallSlice::new(now + step as f64 * dt, position, velocity));
        }

        Self { slices }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BallSlice> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BallSlice> {
        self.slices.get(index)
    }

    /// Whether the timestamps are strictly increasing (and finite).
    pub fn is_well_ordered(&self) -> bool {
        self.slices.iter().all(|slice| slice.time.is_finite())
            && self.slices.windows(2).all(|w| w[0].time < w[1].time)
    }
}

impl<'a> IntoIterator for &'a BallPrediction {
    type Item = &'a BallSlice;
    type IntoIter = std::slice::Iter<'a, BallSlice>;

    fn into_iter(self) -> Self::IntoIter {
        self.slices.iter()
    }
}

impl FromIterator<BallSlice> for BallPrediction {
    fn from_iter<T: IntoIterator<Item = BallSlice>>(iter: T) -> Self {
        Self {
            slices: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ballistic_is_well_ordered() {
        let ball = BallData {
            position: Vector3::new(0.0, 0.0, 500.0),
            velocity: Vector3::new(100.0, 0.0, 300.0),
            ..Default::default()
        };
        let prediction = BallPrediction::ballistic(&ball, 10.0, 3.0, 1.0 / 60.0);
        assert_eq!(prediction.len(), 180);
        assert!(prediction.is_well_ordered());
        assert!(prediction.get(0).unwrap().time > 10.0);
        // Never sinks into the floor
        assert!(prediction.iter().all(|s| s.position.z >= BALL_RADIUS - 1e-9));
    }

    #[test]
    fn test_ballistic_degenerate_inputs() {
        let ball = BallData::default();
        assert!(BallPrediction::ballistic(&ball, 0.0, 1.0, 0.0).is_empty());
        assert!(BallPrediction::ballistic(&ball, 0.0, -1.0, 0.1).is_empty());
    }

    #[test]
    fn test_malformed_order() {
        let slice = |t| BallSlice::new(t, Vector3::zeros(), Vector3::zeros());
        let ok: BallPrediction = vec![slice(0.1), slice(0.2)].into_iter().collect();
        assert!(ok.is_well_ordered());
        let repeated: BallPrediction = vec![slice(0.1), slice(0.1)].into_iter().collect();
        assert!(!repeated.is_well_ordered());
        let backwards: BallPrediction = vec![slice(0.2), slice(0.1)].into_iter().collect();
        assert!(!backwards.is_well_ordered());
        let nan: BallPrediction = vec![slice(f64::NAN)].into_iter().collect();
        assert!(!nan.is_well_ordered());
        assert!(BallPrediction::default().is_well_ordered());
    }
}
