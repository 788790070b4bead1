//! Cast requests: trigger modes, destinations and the cast pipeline.
mod battle_cast;
mod destination;
mod mode;
mod report;

pub use battle_cast::BattleCast;
pub use destination::{Destination, Target};
pub use mode::Mode;
pub use report::{CastReport, Reflection};

pub use crate::mechanics::CastOverrides;
