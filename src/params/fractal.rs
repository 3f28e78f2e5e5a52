//! Fractal iteration parameters.

/// Escape-time iteration parameters.
///
/// The same values feed the CPU orbit evaluator and the generated WGSL
/// shader, so a point sounds the way it looks.
#[derive(Debug, Clone)]
pub struct FractalParams {
    /// Iteration cap per orbit, shared by CPU and GPU
    pub max_iters: u32,

    /// Squared escape radius; an orbit whose squared magnitude exceeds
    /// this counts as escaped
    pub escape_radius_sq: f64,

    /// Maximum number of steps recorded for the on-screen orbit trail
    pub trail_steps: u32,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            max_iters: 1200,
            escape_radius_sq: 1000.0,
            trail_steps: 200,
        }
    }
}

impl FractalParams {
    /// Validate parameters before they reach the evaluator or the shader
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iters == 0 {
            return Err("Iteration cap must be > 0".to_string());
        }
        if !(self.escape_radius_sq > 0.0) {
            return Err(format!(
                "Squared escape radius must be > 0, got {}",
                self.escape_radius_sq
            ));
        }
        if self.trail_steps == 0 {
            return Err("Orbit trail needs at least one step".to_string());
        }
        Ok(())
    }
}
