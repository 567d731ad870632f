//! Integration test modules

mod launch_modes;
mod persistence;
mod results;
