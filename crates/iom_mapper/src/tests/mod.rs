//! Scenario tests through the public surface.

mod objects;
mod primitives;
