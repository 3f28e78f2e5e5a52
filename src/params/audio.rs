//! Synthesizer parameters.

/// Phase-distortion synthesizer configuration.
#[derive(Debug, Clone)]
pub struct SynthParams {
    /// Master output gain (linear)
    pub master_gain: f32,

    /// Phase-distortion depth at full orbit drive (radians)
    pub mod_depth: f32,

    /// Note attack time (seconds)
    pub attack_s: f32,

    /// Note release time (seconds)
    pub release_s: f32,

    /// Highest audible orbit step rate (Hz); also caps how far the
    /// orbit playhead may advance in a single video frame
    pub max_step_rate_hz: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            master_gain: 0.3,
            mod_depth: 2.5,
            attack_s: 0.005,
            release_s: 0.08,
            max_step_rate_hz: 4000.0,
        }
    }
}

impl SynthParams {
    /// Validate configuration (gain and envelope times must be sane)
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.master_gain) {
            return Err(format!(
                "Master gain must be in 0..=1, got {}",
                self.master_gain
            ));
        }
        if self.attack_s <= 0.0 || self.release_s <= 0.0 {
            return Err("Envelope times must be > 0".to_string());
        }
        if self.max_step_rate_hz <= 0.0 {
            return Err("Step rate cap must be > 0".to_string());
        }
        Ok(())
    }
}

/// Audio constants (compile-time, sized for the voice allocator)
pub mod audio_constants {
    /// Fixed polyphony; extra held notes wait until a voice frees up
    pub const MAX_VOICES: usize = 8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SynthParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_hot_gain() {
        let mut params = SynthParams::default();
        params.master_gain = 1.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_attack() {
        let mut params = SynthParams::default();
        params.attack_s = 0.0;
        assert!(params.validate().is_err());
    }
}
