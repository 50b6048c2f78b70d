use redline_core::{
    consts::{CAR_THROTTLE_MAX_SPEED, MAX_BOOST},
    flat, BoostPad, CarData, DebugColor, Vector3, WorldData,
};

use super::{drive::land_facing, ActionCtx, ActionProgress};
use crate::control::{aim_at, throttle, ControllerOutput};

/// Pick up a boost pad, preferring the nearest full one.
#[derive(Clone, Debug, PartialEq)]
pub struct GetBoost {
    interruptible: bool,
    /// Index of the chosen pad in the world's pad list
    pad: Option<usize>,
    boost_at_start: f64,
    finished: bool,
}

impl GetBoost {
    pub fn new(interruptible: bool) -> Self {
        Self {
            interruptible,
            pad: None,
            boost_at_start: 0.0,
            finished: false,
        }
    }

    pub fn pad(&self) -> Option<usize> {
        self.pad
    }

    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        let car = ctx.car;
        let settings = ctx.settings;
        if car.boost >= MAX_BOOST {
            return self.done(ActionProgress::success());
        }

        let index = match self.pad {
            Some(index) => index,
            None => {
                let Some(index) = closest_pad(ctx.world, car) else {
                    log::debug!("No boost pad to go for");
                    return self.done(ActionProgress::failure());
                };
                self.pad = Some(index);
                self.boost_at_start = car.boost;
                index
            }
        };
        let Some(pad) = ctx.world.boost_pads.get(index).filter(|pad| pad.is_active) else {
            // Taken, by us or by someone else
            return self.done(if car.boost > self.boost_at_start {
                ActionProgress::success()
            } else {
                ActionProgress::failure()
            });
        };

        let mut output = ControllerOutput::new();
        if !car.is_grounded {
            land_facing(car, pad.position - car.position, &settings.controller, &mut output);
            return ActionProgress::Continue(output);
        }
        aim_at(
            car,
            Vector3::new(pad.position.x, pad.position.y, car.position.z),
            Vector3::zeros(),
            false,
            &settings.controller,
            &mut output,
        );
        throttle(car, CAR_THROTTLE_MAX_SPEED, false, &settings.controller, &mut output);
        output.boost = false;

        ctx.debug.circle(pad.position, Vector3::z(), 160.0, DebugColor::Orange);
        ActionProgress::Continue(output)
    }

    pub fn interruptible(&self) -> bool {
        self.interruptible
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

/// The closest active full boost pad, or the closest active small one if no full pad is
/// up.
fn closest_pad(world: &WorldData, car: &CarData) -> Option<usize> {
    let distance = |pad: &BoostPad| flat(pad.position - car.position).norm();
    let closest = |full: bool| {
        world
            .boost_pads
            .iter()
            .enumerate()
            .filter(|(_, pad)| pad.is_active && pad.is_full_boost == full)
            .min_by(|(_, a), (_, b)| distance(a).total_cmp(&distance(b)))
            .map(|(index, _)| index)
    };
    closest(true).or_else(|| closest(false))
}
