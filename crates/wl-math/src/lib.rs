//! Weibull life math utilities.

pub mod math;

pub use math::gamma::*;
pub use math::stable::*;
pub use math::stats::*;
pub use math::weibull::*;
