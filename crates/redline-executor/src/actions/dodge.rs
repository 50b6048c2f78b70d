use redline_core::{CarData, Vector3};

use super::{drive::land_facing, ActionCtx, ActionProgress};
use crate::control::ControllerOutput;

/// A dodge that hasn't landed by now is given up, in seconds.
const DODGE_TIMEOUT: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DodgePhase {
    /// Holding the first jump
    Jumping,
    /// Jump button up for one tick
    Released,
    /// Second press with the stick tilted
    Flip,
    /// Flipping and landing
    Flipped,
}

/// Jump, then flip in a direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Dodge {
    direction: Vector3,
    jump_duration: f64,
    start: Option<f64>,
    phase: DodgePhase,
    finished: bool,
}

impl Dodge {
    /// Dodge towards `direction` (world coordinates) after holding jump for
    /// `jump_duration` seconds.
    pub fn new(direction: Vector3, jump_duration: f64) -> Self {
        Self {
            direction,
            jump_duration,
            start: None,
            phase: DodgePhase::Jumping,
            finished: false,
        }
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        let car = ctx.car;
        let now = ctx.now();
        if self.start.is_none() && !car.is_grounded {
            if car.has_double_jumped {
                log::debug!("No flip left to dodge with");
                return self.done(ActionProgress::failure());
            }
            // Already in the air: skip the jump
            self.phase = DodgePhase::Released;
        }
        let start = *self.start.get_or_insert(now);
        let elapsed = now - start;
        if elapsed > DODGE_TIMEOUT {
            return self.done(ActionProgress::failure());
        }

        let mut output = ControllerOutput::new();
        output.throttle = 1.0;
        match self.phase {
            DodgePhase::Jumping => {
                if elapsed < self.jump_duration {
                    output.jump = true;
                } else {
                    self.phase = DodgePhase::Flip;
                }
            }
            DodgePhase::Released => self.phase = DodgePhase::Flip,
            DodgePhase::Flip => {
                let (pitch, yaw) = flip_stick(car, self.direction);
                output.pitch = pitch;
                output.yaw = yaw;
                output.jump = true;
                self.phase = DodgePhase::Flipped;
            }
            DodgePhase::Flipped => {
                if car.is_grounded {
                    return self.done(ActionProgress::success());
                }
                land_facing(car, self.direction, &ctx.settings.controller, &mut output);
            }
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

/// Pitch and yaw that flip the car towards `direction`. The larger of the two is always
/// at full tilt.
pub(crate) fn flip_stick(car: &CarData, direction: Vector3) -> (f64, f64) {
    let local = car.local(direction);
    let scale = local.x.abs().max(local.y.abs());
    if scale < 1e-9 {
        return (-1.0, 0.0);
    }
    // Pushing the nose down flips forward
    (-local.x / scale, local.y / scale)
}
