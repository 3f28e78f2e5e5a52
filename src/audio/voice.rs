//! Fixed-pool phase-distortion voices.
//!
//! The pool is sized at construction and never allocates afterwards;
//! everything here is safe to run inside the audio callback.

use std::f32::consts::TAU;

use glam::DVec2;

use crate::fractal::MapKind;
use crate::params::{audio_constants::MAX_VOICES, FractalParams, SynthParams};

use super::bridge;

/// One playing or releasing note.
#[derive(Debug, Clone, Copy)]
struct Voice {
    note: u8,
    /// Oscillator phase in cycles, wrapped to [0, 1)
    phase: f32,
    phase_inc: f32,
    /// Envelope level in [0, 1]
    level: f32,
    /// Key still held; false while the release ramp runs out
    gate: bool,
    active: bool,
    /// Orbit drive, refreshed once per block
    drive: f32,
}

impl Voice {
    const fn silent() -> Self {
        Self {
            note: 0,
            phase: 0.0,
            phase_inc: 0.0,
            level: 0.0,
            gate: false,
            active: false,
            drive: 0.0,
        }
    }
}

/// Fixed-size pool of voices with linear attack/release ramps.
pub struct VoicePool {
    voices: [Voice; MAX_VOICES],
    sample_rate: f32,
    attack_step: f32,
    release_step: f32,
    mod_depth: f32,
}

impl VoicePool {
    pub fn new(sample_rate: f32, synth: &SynthParams) -> Self {
        Self {
            voices: [Voice::silent(); MAX_VOICES],
            sample_rate,
            attack_step: 1.0 / (synth.attack_s * sample_rate),
            release_step: 1.0 / (synth.release_s * sample_rate),
            mod_depth: synth.mod_depth,
        }
    }

    /// Reconcile the pool with the held-note bitmask.
    ///
    /// Gates drop for notes that vanished, re-press catches a voice
    /// still releasing the same note, and new notes claim free slots.
    /// When the pool is full the remaining notes simply wait; they get
    /// picked up by a later sync once a slot frees.
    pub fn sync_notes(&mut self, held: u128) {
        let mut sounding: u128 = 0;
        for voice in self.voices.iter_mut() {
            if !voice.active {
                continue;
            }
            let bit = 1u128 << voice.note;
            if voice.gate && held & bit == 0 {
                voice.gate = false;
            }
            if voice.gate {
                sounding |= bit;
            }
        }

        let mut pending = held & !sounding;
        while pending != 0 {
            let note = pending.trailing_zeros() as u8;
            pending &= pending - 1;
            self.start_note(note);
        }
    }

    fn start_note(&mut self, note: u8) {
        if let Some(voice) = self
            .voices
            .iter_mut()
            .find(|v| v.active && v.note == note && !v.gate)
        {
            voice.gate = true;
            return;
        }
        if let Some(voice) = self.voices.iter_mut().find(|v| !v.active) {
            *voice = Voice {
                note,
                phase: 0.0,
                phase_inc: bridge::note_hz(note) / self.sample_rate,
                level: 0.0,
                gate: true,
                active: true,
                drive: 0.0,
            };
        }
    }

    /// Refresh per-voice orbit drives; block rate, not sample rate
    pub fn update_drives(&mut self, kind: MapKind, julia: Option<DVec2>, fractal: &FractalParams) {
        for voice in self.voices.iter_mut().filter(|v| v.active) {
            let point = bridge::control_point(kind, voice.note);
            voice.drive = bridge::orbit_drive(kind, point, julia, fractal);
        }
    }

    /// Mix one mono sample and advance every envelope and phase
    pub fn next_sample(&mut self) -> f32 {
        let mut mix = 0.0;
        for voice in self.voices.iter_mut() {
            if !voice.active {
                continue;
            }
            if voice.gate {
                voice.level = (voice.level + self.attack_step).min(1.0);
            } else {
                voice.level -= self.release_step;
                if voice.level <= 0.0 {
                    *voice = Voice::silent();
                    continue;
                }
            }

            // phase distortion: the orbit drive bends the carrier with
            // its own second harmonic
            let theta = TAU * voice.phase;
            mix += (theta + self.mod_depth * voice.drive * (2.0 * theta).sin()).sin() * voice.level;

            voice.phase += voice.phase_inc;
            if voice.phase >= 1.0 {
                voice.phase -= 1.0;
            }
        }
        mix
    }

    pub fn active_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn pool() -> VoicePool {
        VoicePool::new(SR, &SynthParams::default())
    }

    fn mask(notes: &[u8]) -> u128 {
        notes.iter().fold(0u128, |m, n| m | (1u128 << n))
    }

    #[test]
    fn test_sync_starts_and_stops_voices() {
        let mut pool = pool();
        pool.sync_notes(mask(&[60, 64, 67]));
        assert_eq!(pool.active_voices(), 3);

        // repeat sync must not duplicate voices
        pool.sync_notes(mask(&[60, 64, 67]));
        assert_eq!(pool.active_voices(), 3);

        // released notes ramp out instead of cutting
        pool.sync_notes(mask(&[60]));
        assert_eq!(pool.active_voices(), 3);
        let release_samples = (SynthParams::default().release_s * SR) as usize + 2;
        for _ in 0..release_samples {
            pool.next_sample();
        }
        assert_eq!(pool.active_voices(), 1);
    }

    #[test]
    fn test_pool_saturates_at_max_voices() {
        let mut pool = pool();
        let notes: Vec<u8> = (60..60 + MAX_VOICES as u8 + 4).collect();
        pool.sync_notes(mask(&notes));
        assert_eq!(pool.active_voices(), MAX_VOICES);
    }

    #[test]
    fn test_waiting_note_starts_when_slot_frees() {
        let mut pool = pool();
        let full: Vec<u8> = (60..60 + MAX_VOICES as u8).collect();
        pool.sync_notes(mask(&full));

        // one extra note is held but cannot start yet
        let mut wanted = full.clone();
        wanted.push(90);
        pool.sync_notes(mask(&wanted));
        assert_eq!(pool.active_voices(), MAX_VOICES);

        // drop one of the original notes and run its release out
        let mut remaining = wanted.clone();
        remaining.retain(|&n| n != 60);
        pool.sync_notes(mask(&remaining));
        let release_samples = (SynthParams::default().release_s * SR) as usize + 2;
        for _ in 0..release_samples {
            pool.next_sample();
        }
        pool.sync_notes(mask(&remaining));
        assert_eq!(pool.active_voices(), MAX_VOICES);
    }

    #[test]
    fn test_repress_catches_releasing_voice() {
        let mut pool = pool();
        pool.sync_notes(mask(&[60]));
        for _ in 0..100 {
            pool.next_sample();
        }
        pool.sync_notes(0);
        pool.next_sample();

        // re-press before the ramp ends: same voice, no second slot
        pool.sync_notes(mask(&[60]));
        assert_eq!(pool.active_voices(), 1);
    }

    #[test]
    fn test_attack_ramps_from_silence() {
        let mut pool = pool();
        pool.sync_notes(mask(&[60]));
        let first = pool.next_sample().abs();
        assert!(first < 0.05, "attack must start near silence, got {}", first);

        let mut peak = 0.0f32;
        for _ in 0..(SR * 0.02) as usize {
            peak = peak.max(pool.next_sample().abs());
        }
        assert!(peak > 0.5, "voice should be audible after attack, got {}", peak);
    }

    #[test]
    fn test_single_voice_stays_bounded() {
        let mut pool = pool();
        pool.sync_notes(mask(&[69]));
        pool.update_drives(MapKind::Mandelbrot, None, &FractalParams::default());
        for _ in 0..4096 {
            let s = pool.next_sample();
            assert!(s.is_finite());
            assert!(s.abs() <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_silent_pool_outputs_zero() {
        let mut pool = pool();
        for _ in 0..64 {
            assert_eq!(pool.next_sample(), 0.0);
        }
    }

    #[test]
    fn test_update_drives_touches_active_voices() {
        let mut pool = pool();
        pool.sync_notes(mask(&[60, 72]));
        pool.update_drives(MapKind::Henon, None, &FractalParams::default());
        let with_drive: Vec<f32> = (0..256).map(|_| pool.next_sample()).collect();

        let mut flat = VoicePool::new(SR, &SynthParams::default());
        flat.sync_notes(mask(&[60, 72]));
        let without: Vec<f32> = (0..256).map(|_| flat.next_sample()).collect();

        // drives bend the waveform away from the plain carrier
        assert!(with_drive
            .iter()
            .zip(&without)
            .any(|(a, b)| (a - b).abs() > 1e-4));
    }
}
