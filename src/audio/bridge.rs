//! Maps held notes and orbit behaviour into synth control values.
//!
//! A note does not pick a frequency table entry and stop there: it also
//! picks a point in the active map's parameter space, and the way the
//! orbit at that point behaves (escape speed, or the interior stretch
//! statistic) becomes the voice's timbre drive.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::fractal::{evaluate, orbit, MapKind};
use crate::params::FractalParams;

/// Octave reference: notes sit on circles sized relative to middle C
const MIDDLE_C: u8 = 60;

/// Equal-tempered frequency of a MIDI note (A4 = 440 Hz)
pub fn note_hz(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// Parameter-space control point for a note on the given map.
///
/// The pitch class picks an angle on a circle around the map's anchor;
/// each octave away from middle C doubles or halves the radius.
pub fn control_point(kind: MapKind, note: u8) -> DVec2 {
    let pitch_class = (note % 12) as f64;
    let octave_offset = note as i32 / 12 - MIDDLE_C as i32 / 12;
    let angle = TAU * pitch_class / 12.0;
    let radius = kind.note_radius() * (octave_offset as f64).exp2();
    kind.note_anchor() + radius * DVec2::new(angle.cos(), angle.sin())
}

/// Timbre drive for a control point, always in [0, 1].
///
/// Escaped orbits report how much of the iteration budget they used;
/// bounded orbits report the interior palette band of their stretch
/// statistic, so the tone tracks the colour the same point renders as.
pub fn orbit_drive(
    kind: MapKind,
    point: DVec2,
    julia: Option<DVec2>,
    params: &FractalParams,
) -> f32 {
    let c = julia.unwrap_or(point);
    let result = evaluate(kind, point, c, params.max_iters, params.escape_radius_sq);
    let drive = if result.escaped {
        result.iterations_run as f64 / params.max_iters as f64
    } else {
        orbit::smooth_band(result.sumz.x)
    };
    drive as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_hz_references() {
        assert!((note_hz(69) - 440.0).abs() < 1e-3);
        assert!((note_hz(57) - 220.0).abs() < 1e-3);
        assert!((note_hz(60) - 261.6256).abs() < 1e-2);
    }

    #[test]
    fn test_control_point_geometry() {
        // pitch class 0 sits due east of the anchor at the base radius
        let point = control_point(MapKind::Henon, MIDDLE_C);
        let expected = MapKind::Henon.note_anchor() + DVec2::new(MapKind::Henon.note_radius(), 0.0);
        assert!((point - expected).length() < 1e-12);

        // one octave up doubles the circle
        let up = control_point(MapKind::Henon, MIDDLE_C + 12);
        let expected_up =
            MapKind::Henon.note_anchor() + DVec2::new(2.0 * MapKind::Henon.note_radius(), 0.0);
        assert!((up - expected_up).length() < 1e-12);
    }

    #[test]
    fn test_control_point_depends_on_map() {
        let a = control_point(MapKind::Mandelbrot, 64);
        let b = control_point(MapKind::Chirikov, 64);
        assert!((a - b).length() > 1e-6);
    }

    #[test]
    fn test_drive_stays_in_unit_interval() {
        let params = FractalParams::default();
        for kind in MapKind::ALL {
            for note in [48u8, 55, 60, 64, 67, 72] {
                let point = control_point(kind, note);
                let drive = orbit_drive(kind, point, None, &params);
                assert!(
                    (0.0..=1.0).contains(&drive),
                    "{:?} note {} -> drive {}",
                    kind,
                    note,
                    drive
                );
            }
        }
    }

    #[test]
    fn test_drive_is_deterministic() {
        let params = FractalParams::default();
        let point = control_point(MapKind::BurningShip, 62);
        let a = orbit_drive(MapKind::BurningShip, point, None, &params);
        let b = orbit_drive(MapKind::BurningShip, point, None, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn test_julia_pin_changes_drive_parameter() {
        let params = FractalParams::default();
        let point = control_point(MapKind::Mandelbrot, 60);
        let free = orbit_drive(MapKind::Mandelbrot, point, None, &params);
        // far-out Julia parameter forces an immediate escape
        let pinned = orbit_drive(
            MapKind::Mandelbrot,
            point,
            Some(DVec2::new(5.0, 5.0)),
            &params,
        );
        assert!(pinned < 0.01);
        assert_ne!(free, pinned);
    }
}
