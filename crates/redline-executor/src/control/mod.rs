mod output;
mod pd;

pub use output::ControllerOutput;
pub use pd::{aim_at, steer_pd, throttle, TargetAngles};
