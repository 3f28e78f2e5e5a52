//! Generates the field shader from the map definitions in [`super::maps`].
//!
//! Each [`MapKind`] carries its own WGSL step body; this module splices
//! those bodies, a dispatch switch, and the shared iteration constants
//! into the template in `field.wgsl`. The renderer compiles the result
//! at startup, so a recurrence only ever exists in one place.

use crate::params::FractalParams;

use super::maps::MapKind;

/// Julia-seed sentinel the shader treats as "unset"; mirrored by the
/// `JULIA_UNSET` constant in the template
pub const JULIA_UNSET: f32 = 1e8;

const FIELD_TEMPLATE: &str = include_str!("field.wgsl");

/// Render the complete field shader source for the given parameters
pub fn assemble_field_shader(params: &FractalParams) -> String {
    let mut funcs = String::new();
    for kind in MapKind::ALL {
        funcs.push_str(&format!(
            "fn map_{}(z: vec2f, c: vec2f) -> vec2f {{\n    {}\n}}\n\n",
            kind.slug(),
            kind.wgsl_body()
        ));
    }

    let mut dispatch =
        String::from("fn map_advance(id: u32, z: vec2f, c: vec2f) -> vec2f {\n    switch id {\n");
    for kind in MapKind::ALL {
        dispatch.push_str(&format!(
            "        case {}u: {{ return map_{}(z, c); }}\n",
            kind.id(),
            kind.slug()
        ));
    }
    dispatch.push_str("        default: { return map_mandelbrot(z, c); }\n    }\n}");

    FIELD_TEMPLATE
        .replace("__MAX_ITERS__", &params.max_iters.to_string())
        .replace(
            "__ESCAPE_RADIUS_SQ__",
            &format!("{:?}", params.escape_radius_sq as f32),
        )
        .replace("//__MAP_FUNCS__", funcs.trim_end())
        .replace("//__MAP_DISPATCH__", &dispatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembled() -> String {
        assemble_field_shader(&FractalParams::default())
    }

    #[test]
    fn test_every_map_gets_a_function() {
        let src = assembled();
        for kind in MapKind::ALL {
            let decl = format!("fn map_{}(z: vec2f, c: vec2f) -> vec2f", kind.slug());
            assert!(src.contains(&decl), "missing {}", decl);
            let case = format!("case {}u: {{ return map_{}(z, c); }}", kind.id(), kind.slug());
            assert!(src.contains(&case), "missing dispatch for {:?}", kind);
        }
    }

    #[test]
    fn test_constants_are_spliced() {
        let src = assembled();
        assert!(src.contains("const MAX_ITERS: i32 = 1200;"));
        assert!(src.contains("const ESCAPE_RADIUS_SQ: f32 = 1000.0;"));
        assert!(!src.contains("__"), "unexpanded placeholder left behind");
    }

    #[test]
    fn test_constants_follow_params() {
        let mut params = FractalParams::default();
        params.max_iters = 64;
        params.escape_radius_sq = 16.0;
        let src = assemble_field_shader(&params);
        assert!(src.contains("const MAX_ITERS: i32 = 64;"));
        assert!(src.contains("const ESCAPE_RADIUS_SQ: f32 = 16.0;"));
    }

    #[test]
    fn test_assembled_shader_parses_and_validates() {
        let src = assembled();
        let module = naga::front::wgsl::parse_str(&src)
            .unwrap_or_else(|e| panic!("WGSL parse failed: {}", e.emit_to_string(&src)));

        let stages: Vec<_> = module.entry_points.iter().map(|ep| ep.stage).collect();
        assert!(stages.contains(&naga::ShaderStage::Vertex));
        assert!(stages.contains(&naga::ShaderStage::Fragment));

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        );
        validator
            .validate(&module)
            .expect("assembled field shader must validate");
    }
}
