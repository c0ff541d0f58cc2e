//! Core math modules.

pub mod gamma;
pub mod stable;
pub mod stats;
pub mod weibull;
