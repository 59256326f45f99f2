//! Module for the GLSL sources the renderer is initialized with.
//!
//! Shaders live in `shaders/<name>/{vert,frag}.glsl` and are embedded into the binary.

use include_dir::{Dir, include_dir};
use obsidian_core::{RenderError, ShaderSource};

static SHADERS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/src/render/shaders");

fn source(name: &str, stage: &str) -> Result<&'static str, RenderError> {
    let path = format!("{}/{}.glsl", name, stage);
    SHADERS
        .get_file(&path)
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| RenderError::ResourceInit(format!("Missing shader source '{}'", path)))
}

/// Looks up the embedded sources of the shader in directory `name`.
pub fn shader_source(name: &str) -> Result<ShaderSource<'static>, RenderError> {
    Ok(ShaderSource {
        vertex: source(name, "vert")?,
        fragment: source(name, "frag")?,
    })
}

/// The lit shape shader.
pub fn default_shader() -> Result<ShaderSource<'static>, RenderError> {
    shader_source("default")
}

/// The light glow shader.
pub fn fullscreen_quad_shader() -> Result<ShaderSource<'static>, RenderError> {
    shader_source("fullscreen_quad")
}

#[cfg(test)]
mod tests {
    use super::*;
    use obsidian_core::MAX_LIGHTS;

    #[test]
    fn test_builtin_shaders_are_embedded() {
        let default = default_shader().unwrap();
        for uniform in ["uMVP", "uModel", "uTexture", "uLights", "uNumLights"] {
            assert!(
                default.vertex.contains(uniform) || default.fragment.contains(uniform),
                "default shader lacks {}",
                uniform
            );
        }
        assert!(
            default
                .fragment
                .contains(&format!("#define MAX_LIGHTS {}", MAX_LIGHTS))
        );

        let quad = fullscreen_quad_shader().unwrap();
        for uniform in ["uLightPos", "uLightDir", "uCutoff", "uLightColor", "uIntensity", "uRadius"] {
            assert!(quad.fragment.contains(uniform), "quad shader lacks {}", uniform);
        }
    }

    #[test]
    fn test_glow_discards_faint_fragments() {
        let quad = fullscreen_quad_shader().unwrap();
        let discard = quad.fragment.find("discard").expect("glow shader never discards");
        let write = quad.fragment.find("FragColor =").unwrap();
        assert!(discard < write);
    }

    #[test]
    fn test_unknown_shader() {
        assert!(matches!(
            shader_source("missing"),
            Err(RenderError::ResourceInit(_))
        ));
    }
}
