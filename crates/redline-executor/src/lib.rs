//! Decision making and control for a single car.
//!
//! [`Bot::tick`] is the entry point: it takes the latest [`WorldData`](redline_core::WorldData)
//! and returns the inputs for the car it controls.

pub mod actions;
pub mod control;
pub mod shots;

mod bot;
mod target;

pub use bot::Bot;
pub use control::ControllerOutput;
pub use target::Target;
