//! Short-lived units of behavior, one of which runs every tick.

mod dodge;
mod drive;
mod get_boost;
mod kickoff;
mod speedflip;

pub use dodge::Dodge;
pub use drive::Drive;
pub use get_boost::GetBoost;
pub use kickoff::{Kickoff, KickoffState};
pub use speedflip::Speedflip;

use redline_core::{BotSettings, CarData, DebugDraw, WorldData};

use crate::{control::ControllerOutput, shots::Shot};

/// What an action gets to see (and draw on) while it runs.
pub struct ActionCtx<'a> {
    /// The car being controlled
    pub car: &'a CarData,
    pub world: &'a WorldData,
    pub settings: &'a BotSettings,
    pub debug: &'a mut DebugDraw,
}

impl<'a> ActionCtx<'a> {
    pub fn new(
        car: &'a CarData,
        world: &'a WorldData,
        settings: &'a BotSettings,
        debug: &'a mut DebugDraw,
    ) -> Self {
        Self {
            car,
            world,
            settings,
            debug,
        }
    }

    /// Current game time.
    pub fn now(&self) -> f64 {
        self.world.game_time
    }
}

/// How an action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Success,
    Failure,
}

/// The outcome of running an action for one tick.
#[derive(Debug)]
pub enum ActionProgress {
    /// Still going, send these inputs
    Continue(ControllerOutput),
    /// Done, replace the action
    Done(ActionResult),
    /// Replace the action with this one right away
    Handoff(Box<Action>),
}

impl ActionProgress {
    pub fn success() -> ActionProgress {
        ActionProgress::Done(ActionResult::Success)
    }

    pub fn failure() -> ActionProgress {
        ActionProgress::Done(ActionResult::Failure)
    }

    pub fn map_output<F>(self, f: F) -> ActionProgress
    where
        F: FnOnce(ControllerOutput) -> ControllerOutput,
    {
        match self {
            ActionProgress::Continue(output) => ActionProgress::Continue(f(output)),
            other => other,
        }
    }
}

/// The action a bot is currently performing.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Drive(Drive),
    GetBoost(GetBoost),
    Kickoff(Kickoff),
    Dodge(Dodge),
    Shot(Shot),
}

impl Action {
    pub fn run(&mut self, ctx: &mut ActionCtx<'_>) -> ActionProgress {
        match self {
            Action::Drive(action) => action.run(ctx),
            Action::GetBoost(action) => action.run(ctx),
            Action::Kickoff(action) => action.run(ctx),
            Action::Dodge(action) => action.run(ctx),
            Action::Shot(action) => action.run(ctx),
        }
    }

    /// Whether the action may be replaced before it finishes.
    pub fn interruptible(&self) -> bool {
        match self {
            Action::Drive(action) => action.interruptible(),
            Action::GetBoost(action) => action.interruptible(),
            Action::Kickoff(_) | Action::Dodge(_) => false,
            Action::Shot(action) => action.interruptible(),
        }
    }

    pub fn finished(&self) -> bool {
        match self {
            Action::Drive(action) => action.finished(),
            Action::GetBoost(action) => action.finished(),
            Action::Kickoff(action) => action.finished(),
            Action::Dodge(action) => action.finished(),
            Action::Shot(action) => action.finished(),
        }
    }

    /// Whether the action is just filling time until something better comes along.
    pub fn is_idle(&self) -> bool {
        match self {
            Action::Drive(_) => true,
            Action::GetBoost(action) => action.interruptible(),
            _ => false,
        }
    }

    /// Stop the action before it finished on its own. The replacement decides the inputs
    /// from the same tick on.
    pub fn abandon(&mut self) {
        log::debug!("Abandoning {}", self.name());
        match self {
            Action::Drive(action) => action.abandon(),
            Action::GetBoost(action) => action.abandon(),
            Action::Kickoff(action) => action.abandon(),
            Action::Dodge(action) => action.abandon(),
            Action::Shot(action) => action.abandon(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Drive(_) => "Drive",
            Action::GetBoost(_) => "GetBoost",
            Action::Kickoff(_) => "Kickoff",
            Action::Dodge(_) => "Dodge",
            Action::Shot(shot) => shot.name(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<Shot> for Action {
    fn from(shot: Shot) -> Self {
        Action::Shot(shot)
    }
}

impl From<Drive> for Action {
    fn from(drive: Drive) -> Self {
        Action::Drive(drive)
    }
}
