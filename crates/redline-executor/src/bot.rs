use std::path::Path;

use anyhow::Result;
use redline_core::{BotSettings, CarData, DebugColor, DebugDraw, Vector3, WorldData};

use crate::{
    actions::{Action, ActionCtx, ActionProgress, Drive, GetBoost, Kickoff},
    control::ControllerOutput,
    shots::{default_shot_check, find_shot, ShotCtx},
    Target,
};

/// Most handoffs followed within a single tick.
const MAX_HANDOFFS: usize = 4;

/// A single car's brain: picks an action each tick and runs it.
pub struct Bot {
    index: usize,
    settings: BotSettings,
    action: Option<Action>,
    debug: DebugDraw,
}

impl Bot {
    pub fn new(index: usize, settings: BotSettings) -> Self {
        Self {
            index,
            settings,
            action: None,
            debug: DebugDraw::new(),
        }
    }

    /// Create a bot with settings from `path`, writing the defaults there if the file
    /// doesn't exist yet.
    pub fn from_settings_file(index: usize, path: impl AsRef<Path>) -> Result<Self> {
        let settings = BotSettings::load_or_insert(path)?;
        Ok(Self::new(index, settings))
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Replace the current action, whatever it is.
    pub fn set_action(&mut self, action: Action) {
        if let Some(mut previous) = self.action.take() {
            if !previous.finished() {
                previous.abandon();
            }
        }
        self.action = Some(action);
    }

    /// What was drawn during the last tick.
    pub fn debug(&self) -> &DebugDraw {
        &self.debug
    }

    /// Decide what to do and compute the inputs for this tick.
    pub fn tick(&mut self, world: &WorldData) -> ControllerOutput {
        self.debug.clear();
        let Some(car) = world.car(self.index) else {
            log::warn!("Car {} is not in the world", self.index);
            return ControllerOutput::new();
        };

        if self.action.as_ref().is_some_and(Action::finished) {
            self.action = None;
        }
        self.decide(world, car);
        let output = self.run_action(world, car).sanitized();

        let name = self.action.as_ref().map_or("Idle", Action::name);
        self.debug.text_2d(
            format!("{}: {}", car.index, name),
            Vector3::new(10.0, 10.0 + 20.0 * car.index as f64, 0.0),
            1,
            DebugColor::White,
        );
        output
    }

    fn decide(&mut self, world: &WorldData, car: &CarData) {
        let replaceable = self
            .action
            .as_ref()
            .map_or(true, |action| action.is_idle() && action.interruptible());
        if !replaceable {
            return;
        }

        if world.is_kickoff {
            let action = if takes_kickoff(world, car) {
                Action::Kickoff(Kickoff::new())
            } else {
                Action::GetBoost(GetBoost::new(false))
            };
            log::info!("Car {} starts the round with {}", car.index, action);
            self.set_action(action);
            return;
        }

        let target = Target::goal(&world.their_goal(car.team))
            .with_fit_tolerance(self.settings.shot.target_fit_tolerance);
        let ctx = ShotCtx::new(car, world.game_time, &self.settings.shot);
        let shot = find_shot(&world.ball_prediction, &target, |slice, target| {
            default_shot_check(&ctx, slice, target)
        });
        match shot {
            Some(shot) => {
                log::debug!(
                    "Car {} goes for a {} at t={:.2}",
                    car.index,
                    shot.name(),
                    shot.slice().time
                );
                self.set_action(Action::Shot(shot));
            }
            None if self.action.is_none() => {
                // Nothing to do: fall back to defending
                let own_goal = world.own_goal(car.team).location;
                self.action = Some(Action::Drive(Drive::new(own_goal)));
            }
            None => {}
        }
    }

    fn run_action(&mut self, world: &WorldData, car: &CarData) -> ControllerOutput {
        for _ in 0..MAX_HANDOFFS {
            let Some(action) = self.action.as_mut() else {
                return ControllerOutput::new();
            };
            let mut ctx = ActionCtx::new(car, world, &self.settings, &mut self.debug);
            match action.run(&mut ctx) {
                ActionProgress::Continue(output) => return output,
                ActionProgress::Done(result) => {
                    log::debug!("{} finished: {:?}", action, result);
                    return ControllerOutput::new();
                }
                ActionProgress::Handoff(next) => {
                    log::debug!("{} hands off to {}", action, next);
                    self.action = Some(*next);
                }
            }
        }
        log::warn!("Too many handoffs in one tick");
        ControllerOutput::new()
    }
}

/// Whether `car` should go for the kickoff: no teammate may be strictly closer to the
/// ball.
fn takes_kickoff(world: &WorldData, car: &CarData) -> bool {
    let ball = world.ball.position;
    let distance = car.distance_to(ball);
    world
        .teammates(car)
        .all(|teammate| teammate.distance_to(ball) >= distance)
}
