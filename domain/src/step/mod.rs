//! Results produced by executing protocol steps.

pub mod result;
