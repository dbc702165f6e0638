//! Individual check families run by the engine.

pub mod element;
pub mod envelope;
pub mod presence;
