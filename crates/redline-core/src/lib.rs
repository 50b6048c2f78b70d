mod debug;
mod geom;
mod math;
mod prediction;
mod settings;
mod world;

pub mod consts;

pub use debug::*;
pub use geom::*;
pub use math::*;
pub use prediction::*;
pub use settings::*;
pub use world::*;

pub type Vector3 = nalgebra::Vector3<f64>;
pub type Rotation3 = nalgebra::Rotation3<f64>;
