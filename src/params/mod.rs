//! Parameter definitions with documented semantics and tuned defaults.
//!
//! All magic numbers are extracted here with:
//! - Units (Hz, seconds, pixels) where they apply
//! - Documented ranges and meanings
//! - Validation before values reach the engine

mod audio;
mod fractal;
mod render;

// Re-export all types
pub use audio::{audio_constants, SynthParams};
pub use fractal::FractalParams;
pub use render::{RecordingConfig, RenderConfig};
