use redline_core::Vector3;

use super::{drive::land_facing, ActionCtx, ActionProgress};
use crate::control::{aim_at, ControllerOutput};

/// End of the first jump, in seconds from the start.
const JUMP_END: f64 = 0.1;
/// The flip input starts here.
const FLIP_START: f64 = 0.15;
/// The flip cancel starts here.
const CANCEL_START: f64 = 0.2;
/// Nose up and air roll are held until here.
const CANCEL_END: f64 = 0.8;
const SPEEDFLIP_TIMEOUT: f64 = 2.0;

/// A diagonal flip cancelled right away, the fastest way to get going from a standstill.
///
/// Only ever run by a [`Kickoff`](super::Kickoff).
#[derive(Clone, Debug, PartialEq)]
pub struct Speedflip {
    direction: Vector3,
    start: Option<f64>,
    /// `1` to flip to the left, `-1` to the right
    side: Option<f64>,
    finished: bool,
}

impl Speedflip {
    pub fn new(direction: Vector3) -> Self {
        Self {
            direction,
            start: None,
            side: None,
            finished: false,
        }
    }

    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        let car = ctx.car;
        let now = ctx.now();
        let controller = &ctx.settings.controller;
        let start = *self.start.get_or_insert(now);
        let side = *self.side.get_or_insert_with(|| {
            if car.local(self.direction).y >= 0.0 {
                1.0
            } else {
                -1.0
            }
        });
        let elapsed = now - start;
        if elapsed > SPEEDFLIP_TIMEOUT || (elapsed >= CANCEL_START && car.is_grounded) {
            self.finished = true;
            return ActionProgress::success();
        }

        let mut output = ControllerOutput::new();
        output.throttle = 1.0;
        output.boost = true;
        if elapsed < JUMP_END {
            aim_at(
                car,
                car.position + self.direction * 1000.0,
                Vector3::zeros(),
                false,
                controller,
                &mut output,
            );
            output = output.with_neutral_stick();
            output.jump = true;
        } else if elapsed < FLIP_START {
            // Button up before the flip
        } else if elapsed < CANCEL_START {
            output.pitch = -1.0;
            output.yaw = side;
            output.jump = true;
        } else if elapsed < CANCEL_END {
            output.pitch = 1.0;
            output.roll = side;
        } else {
            land_facing(car, self.direction, controller, &mut output);
        }
        ActionProgress::Continue(output)
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}
