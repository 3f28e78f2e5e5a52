//! CPU orbit evaluation: escape tests, smooth-colour statistics, and the
//! on-screen orbit trail.
//!
//! The evaluator here and the generated shader run the same loop; the
//! audio bridge reuses [`evaluate`] so a point always sounds like the
//! pixel it sits under.

use glam::{DVec2, DVec3};

use super::maps::MapKind;

/// Scale applied to the orbit statistic before the interior sine palette
pub const SMOOTH_COLOR_SCALE: f64 = 5.0;

/// Hue step per iteration for escaped points
pub const ESCAPE_HUE_STEP: f64 = 0.1;

/// Outcome of iterating one orbit to escape or to the iteration cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeResult {
    /// Completed non-escaping steps; equals the cap when the orbit
    /// never escaped
    pub iterations_run: u32,

    /// True when the orbit left the escape radius or went non-finite
    pub escaped: bool,

    /// Accumulated stretch/turn statistic, normalized by the iteration
    /// cap when the orbit ran to completion; raw partial sums when it
    /// escaped (the palette ignores them there)
    pub sumz: DVec3,
}

/// Iterate `z' = f(z, c)` from `seed` until escape or `max_iters`.
///
/// `sumz` gathers three dot products between consecutive orbit
/// displacements each step; its channels drive the interior palette and
/// the interior tone level. A non-finite iterate compares false against
/// the radius test and is counted as escaped on the spot.
pub fn evaluate(
    kind: MapKind,
    seed: DVec2,
    c: DVec2,
    max_iters: u32,
    escape_radius_sq: f64,
) -> EscapeResult {
    let mut z = seed;
    let mut pz = seed;
    let mut sumz = DVec3::ZERO;

    for i in 0..max_iters {
        let ppz = pz;
        pz = z;
        z = kind.advance(z, c);

        // NaN fails this comparison too, so a blown-up step escapes
        if !(z.length_squared() <= escape_radius_sq) {
            return EscapeResult {
                iterations_run: i,
                escaped: true,
                sumz,
            };
        }

        sumz += DVec3::new(
            (z - pz).dot(pz - ppz),
            (z - pz).dot(z - pz),
            (z - ppz).dot(z - ppz),
        );
    }

    EscapeResult {
        iterations_run: max_iters,
        escaped: false,
        sumz: sumz / max_iters as f64,
    }
}

/// Interior palette band: a sine fold of one orbit statistic into
/// (0.05, 0.95). The audio bridge reuses this for interior tone level.
pub fn smooth_band(v: f64) -> f64 {
    (v.abs() * SMOOTH_COLOR_SCALE).sin() * 0.45 + 0.5
}

/// Colour an evaluated orbit the same way the shader does.
///
/// Escaped points cycle hue with the iteration count; interior points
/// are flat black until `use_color`, which switches them to the smooth
/// orbit-statistic palette.
pub fn orbit_color(result: &EscapeResult, use_color: bool) -> DVec3 {
    if result.escaped {
        let phase = result.iterations_run as f64 * ESCAPE_HUE_STEP;
        let n1 = phase.sin() * 0.5 + 0.5;
        let n2 = phase.cos() * 0.5 + 0.5;
        let dim = if use_color { 0.15 } else { 1.0 };
        DVec3::new(n1, n2, 1.0) * dim
    } else if use_color {
        let s = result.sumz;
        DVec3::new(smooth_band(s.x), smooth_band(s.y), smooth_band(s.z))
    } else {
        DVec3::ZERO
    }
}

/// Recorded orbit polyline plus the rate-limited playhead marker.
pub struct OrbitTrail {
    /// Orbit points starting at the seed, cut at escape or at the cap
    pub points: Vec<DVec2>,

    /// Last pre-escape point the audio playhead could have reached this
    /// frame; frozen once the step index passes the per-frame budget
    pub marker: DVec2,
}

impl OrbitTrail {
    pub fn new(trail_steps: u32) -> Self {
        Self {
            points: Vec::with_capacity(trail_steps as usize + 1),
            marker: DVec2::ZERO,
        }
    }

    /// Re-trace the orbit from `seed` in place.
    ///
    /// `c` is the pinned Julia seed when one is set, otherwise the seed
    /// itself (the parameter-space reading of the same point).
    /// `marker_step_budget` is how many orbit steps fit in one video
    /// frame at the audible step-rate cap.
    pub fn retrace(
        &mut self,
        kind: MapKind,
        seed: DVec2,
        julia: Option<DVec2>,
        trail_steps: u32,
        marker_step_budget: u32,
        escape_radius_sq: f64,
    ) {
        let c = julia.unwrap_or(seed);
        let mut z = seed;

        self.points.clear();
        self.points.push(z);
        self.marker = z;

        for i in 0..trail_steps {
            z = kind.advance(z, c);
            if !(z.length_squared() <= escape_radius_sq) {
                break;
            }
            self.points.push(z);
            if i < marker_step_budget {
                self.marker = z;
            }
        }
    }
}
