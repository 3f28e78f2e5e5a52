//! The eight iterated 2D maps the instrument can play.
//!
//! Each map is a discrete-time recurrence `z' = f(z, c)` over the plane.
//! The CPU step below is the single source of truth; the matching WGSL
//! body for each map lives right next to it so the shader is generated
//! from the same definitions (see [`super::wgsl`]).

use glam::DVec2;

/// Complex product of `a` and `b`
fn cx_mul(a: DVec2, b: DVec2) -> DVec2 {
    DVec2::new(a.x * b.x - a.y * b.y, a.x * b.y + a.y * b.x)
}

/// Complex square of `a`
fn cx_sqr(a: DVec2) -> DVec2 {
    DVec2::new(a.x * a.x - a.y * a.y, 2.0 * a.x * a.y)
}

/// Complex cube of `a`
fn cx_cube(a: DVec2) -> DVec2 {
    let x2 = a.x * a.x;
    let y2 = a.y * a.y;
    DVec2::new(a.x * (x2 - 3.0 * y2), a.y * (3.0 * x2 - y2))
}

/// Complex quotient `a / b`; division by zero yields non-finite
/// components, which the orbit evaluator counts as an escape
fn cx_div(a: DVec2, b: DVec2) -> DVec2 {
    DVec2::new(a.x * b.x + a.y * b.y, a.y * b.x - a.x * b.y) / b.length_squared()
}

/// Selects which recurrence drives orbits, tones, and the rendered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// z' = z^2 + c
    Mandelbrot,
    /// z^2 + c with the imaginary part folded through |x*y|
    BurningShip,
    /// z' = z^3 / (1 + z^2) + c
    Feather,
    /// z' = z * |z|^2 - z * (cx^2, cy^2)
    Sfx,
    /// Henon map: (1 - cx*x^2 + y, cy*x)
    Henon,
    /// Duffing map: (y, -cy*x + cx*y - y^3)
    Duffing,
    /// Ikeda map with dissipation parameter folded into c
    Ikeda,
    /// Chirikov standard map; kick updates y before x reads it
    Chirikov,
}

impl MapKind {
    /// All maps, in keybinding order (digit 1 selects `ALL[0]`)
    pub const ALL: [MapKind; 8] = [
        MapKind::Mandelbrot,
        MapKind::BurningShip,
        MapKind::Feather,
        MapKind::Sfx,
        MapKind::Henon,
        MapKind::Duffing,
        MapKind::Ikeda,
        MapKind::Chirikov,
    ];

    /// Stable numeric id, also the shader-side dispatch index
    pub fn id(self) -> u32 {
        match self {
            MapKind::Mandelbrot => 0,
            MapKind::BurningShip => 1,
            MapKind::Feather => 2,
            MapKind::Sfx => 3,
            MapKind::Henon => 4,
            MapKind::Duffing => 5,
            MapKind::Ikeda => 6,
            MapKind::Chirikov => 7,
        }
    }

    pub fn from_id(id: u32) -> Option<MapKind> {
        MapKind::ALL.get(id as usize).copied()
    }

    /// Lowercase identifier used for CLI parsing and WGSL function names
    pub fn slug(self) -> &'static str {
        match self {
            MapKind::Mandelbrot => "mandelbrot",
            MapKind::BurningShip => "burning_ship",
            MapKind::Feather => "feather",
            MapKind::Sfx => "sfx",
            MapKind::Henon => "henon",
            MapKind::Duffing => "duffing",
            MapKind::Ikeda => "ikeda",
            MapKind::Chirikov => "chirikov",
        }
    }

    /// Display name for logs and the window title
    pub fn name(self) -> &'static str {
        match self {
            MapKind::Mandelbrot => "Mandelbrot",
            MapKind::BurningShip => "Burning Ship",
            MapKind::Feather => "Feather",
            MapKind::Sfx => "SFX",
            MapKind::Henon => "Henon",
            MapKind::Duffing => "Duffing",
            MapKind::Ikeda => "Ikeda",
            MapKind::Chirikov => "Chirikov",
        }
    }

    pub fn from_slug(name: &str) -> Option<MapKind> {
        let slug = name.to_lowercase().replace('-', "_");
        MapKind::ALL.iter().copied().find(|k| k.slug() == slug)
    }

    /// Advance the orbit one step.
    ///
    /// Total over finite input: no branching on validity. A step may
    /// produce non-finite components (Feather divides), and the orbit
    /// evaluator counts those as an immediate escape.
    pub fn advance(self, z: DVec2, c: DVec2) -> DVec2 {
        match self {
            MapKind::Mandelbrot => DVec2::new(
                z.x * z.x - z.y * z.y + c.x,
                2.0 * z.x * z.y + c.y,
            ),
            MapKind::BurningShip => DVec2::new(
                z.x * z.x - z.y * z.y + c.x,
                2.0 * (z.x * z.y).abs() + c.y,
            ),
            MapKind::Feather => {
                cx_div(cx_cube(z), DVec2::new(1.0, 0.0) + cx_sqr(z)) + c
            }
            MapKind::Sfx => {
                // c contributes through its componentwise square
                z * z.length_squared() - cx_mul(z, DVec2::new(c.x * c.x, c.y * c.y))
            }
            MapKind::Henon => DVec2::new(1.0 - c.x * z.x * z.x + z.y, c.y * z.x),
            MapKind::Duffing => DVec2::new(
                z.y,
                -c.y * z.x + c.x * z.y - z.y * z.y * z.y,
            ),
            MapKind::Ikeda => {
                let t = 0.4 - 6.0 / (1.0 + z.length_squared());
                let (st, ct) = t.sin_cos();
                DVec2::new(
                    1.0 + c.x * (z.x * ct - z.y * st),
                    c.y * (z.x * st + z.y * ct),
                )
            }
            MapKind::Chirikov => {
                // the kicked y feeds the x update within the same step
                let y = z.y + c.y * z.x.sin();
                DVec2::new(z.x + c.x * y, y)
            }
        }
    }

    /// WGSL translation of [`MapKind::advance`], kept adjacent so the
    /// two stay in lockstep when a recurrence changes
    pub fn wgsl_body(self) -> &'static str {
        match self {
            MapKind::Mandelbrot => {
                "return vec2f(z.x * z.x - z.y * z.y + c.x, 2.0 * z.x * z.y + c.y);"
            }
            MapKind::BurningShip => {
                "return vec2f(z.x * z.x - z.y * z.y + c.x, 2.0 * abs(z.x * z.y) + c.y);"
            }
            MapKind::Feather => {
                "return cx_div(cx_cube(z), vec2f(1.0, 0.0) + cx_sqr(z)) + c;"
            }
            MapKind::Sfx => {
                "return z * dot(z, z) - cx_mul(z, vec2f(c.x * c.x, c.y * c.y));"
            }
            MapKind::Henon => {
                "return vec2f(1.0 - c.x * z.x * z.x + z.y, c.y * z.x);"
            }
            MapKind::Duffing => {
                "return vec2f(z.y, -c.y * z.x + c.x * z.y - z.y * z.y * z.y);"
            }
            MapKind::Ikeda => {
                "let t = 0.4 - 6.0 / (1.0 + dot(z, z));\n    \
                 let st = sin(t);\n    \
                 let ct = cos(t);\n    \
                 return vec2f(1.0 + c.x * (z.x * ct - z.y * st), c.y * (z.x * st + z.y * ct));"
            }
            MapKind::Chirikov => {
                "let y = z.y + c.y * sin(z.x);\n    \
                 return vec2f(z.x + c.x * y, y);"
            }
        }
    }

    /// Centre of the parameter-space circle notes are placed on.
    ///
    /// Tuned by ear: each anchor sits in a region where the map mixes
    /// escaping and bounded orbits, so neighbouring notes get audibly
    /// different drive.
    pub fn note_anchor(self) -> DVec2 {
        match self {
            MapKind::Mandelbrot => DVec2::new(-0.5, 0.0),
            MapKind::BurningShip => DVec2::new(-1.75, -0.02),
            MapKind::Feather => DVec2::new(-0.1, 0.15),
            MapKind::Sfx => DVec2::new(0.6, 0.2),
            MapKind::Henon => DVec2::new(1.25, 0.3),
            MapKind::Duffing => DVec2::new(2.5, 0.2),
            MapKind::Ikeda => DVec2::new(0.9, 0.9),
            MapKind::Chirikov => DVec2::new(0.8, 0.8),
        }
    }

    /// Base radius of the note circle around [`MapKind::note_anchor`]
    pub fn note_radius(self) -> f64 {
        match self {
            MapKind::Mandelbrot => 0.25,
            MapKind::BurningShip => 0.04,
            MapKind::Feather => 0.25,
            MapKind::Sfx => 0.25,
            MapKind::Henon => 0.15,
            MapKind::Duffing => 0.3,
            MapKind::Ikeda => 0.05,
            MapKind::Chirikov => 0.4,
        }
    }
}
