//! Tools backed by JPL's Solar System Dynamics APIs (ssd-api.jpl.nasa.gov).

pub mod cad;
pub mod fireball;
pub mod sbdb;
pub mod scout;

pub use cad::CadTool;
pub use fireball::FireballTool;
pub use sbdb::SbdbTool;
pub use scout::ScoutTool;
