//! Iterated-map core: the map library, the CPU orbit evaluator, and the
//! generated GPU mirror of both.

pub mod maps;
pub mod orbit;
pub mod wgsl;

pub use maps::MapKind;
pub use orbit::{evaluate, orbit_color, EscapeResult, OrbitTrail};
