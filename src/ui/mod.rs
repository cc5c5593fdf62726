//! Thin console shell around the simulation: prompting and rendering.

pub mod menu;
pub mod render;
