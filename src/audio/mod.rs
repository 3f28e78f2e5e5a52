//! Real-time synthesis driven by orbit behaviour.

pub mod bridge;
pub mod engine;
pub mod voice;

pub use engine::AudioEngine;

use glam::DVec2;

/// Control state the UI thread publishes to the audio callback.
///
/// The callback copies it wholesale under a try-lock once per block and
/// keeps its previous copy when the lock is contended; stale values win
/// over blocking the audio thread.
#[derive(Debug, Clone, Copy)]
pub struct SharedParams {
    /// Active map id ([`crate::fractal::MapKind::id`])
    pub map_id: u32,

    /// Pinned Julia parameter, if any
    pub julia: Option<DVec2>,

    /// Held notes, bit n = MIDI note n
    pub held_notes: u128,

    /// Master gain (linear)
    pub gain: f32,
}

impl Default for SharedParams {
    fn default() -> Self {
        Self {
            map_id: 0,
            julia: None,
            held_notes: 0,
            gain: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_params_copy_snapshot() {
        let mut shared = SharedParams::default();
        let snapshot = shared;
        shared.held_notes |= 1 << 60;
        shared.map_id = 3;

        // the callback's copy must not alias the published state
        assert_eq!(snapshot.held_notes, 0);
        assert_eq!(snapshot.map_id, 0);
        assert_eq!(snapshot.julia, None);
    }
}
