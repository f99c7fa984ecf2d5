use wgpu::naga;
use wgpu::naga::front::glsl;
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{ShaderError, ShaderSource, Stage};

/// A single stage that parsed and validated.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    pub source: ShaderSource,
    pub module: naga::Module,
}

impl CompiledShader {
    pub fn stage(&self) -> Stage {
        self.source.stage
    }
}

/// Compiles one stage: GLSL front end, then validation.
///
/// Both parse and validation diagnostics are rendered against the source text
/// so the log points at lines the author wrote.
pub fn compile(source: &ShaderSource) -> Result<CompiledShader, ShaderError> {
    let fail = |log: String| ShaderError::Compile {
        stage: source.stage,
        path: source.path.clone(),
        log: non_empty(log, "unknown compiler error"),
    };

    let options = glsl::Options::from(source.stage.to_naga());
    let module = glsl::Frontend::default()
        .parse(&options, &source.text)
        .map_err(|errors| fail(errors.emit_to_string(&source.text)))?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|err| fail(err.emit_to_string(&source.text)))?;

    log::debug!("compiled {} shader '{}'", source.stage, source.path.display());

    Ok(CompiledShader {
        source: source.clone(),
        module,
    })
}

fn non_empty(log: String, fallback: &str) -> String {
    if log.trim().is_empty() { fallback.to_string() } else { log }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const VERT: &str = r#"#version 450 core
layout(location = 0) in vec3 aPos;
layout(location = 1) in vec3 aColor;
layout(location = 0) out vec3 vColor;
layout(set = 0, binding = 0) uniform Uniforms { float changingNum; } u;
void main() {
    vColor = aColor * u.changingNum;
    gl_Position = vec4(aPos, 1.0);
}
"#;

    pub(crate) const FRAG: &str = r#"#version 450 core
layout(location = 0) in vec3 vColor;
layout(location = 0) out vec4 fragColor;
void main() {
    fragColor = vec4(vColor, 1.0);
}
"#;

    pub(crate) fn compiled(stage: Stage, text: &str) -> CompiledShader {
        compile(&ShaderSource::from_text(stage, "inline", text)).unwrap()
    }

    #[test]
    fn valid_sources_compile() {
        let v = compiled(Stage::Vertex, VERT);
        let f = compiled(Stage::Fragment, FRAG);
        assert_eq!(v.stage(), Stage::Vertex);
        assert_eq!(f.module.entry_points.len(), 1);
        assert_eq!(f.module.entry_points[0].name, crate::shader::ENTRY_POINT);
    }

    #[test]
    fn syntax_error_reports_non_empty_log() {
        let broken = FRAG.replace("fragColor = vec4(vColor, 1.0);", "fragColor = vec4(vColor 1.0)");
        let err = compile(&ShaderSource::from_text(Stage::Fragment, "broken.frag", broken))
            .unwrap_err();

        match &err {
            ShaderError::Compile { stage, log, .. } => {
                assert_eq!(*stage, Stage::Fragment);
                assert!(!log.trim().is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
        assert!(err.to_string().contains("fragment shader compilation failed"));
    }

    #[test]
    fn undeclared_identifier_is_rejected() {
        let broken = VERT.replace("u.changingNum", "missingUniform");
        assert!(compile(&ShaderSource::from_text(Stage::Vertex, "v", broken)).is_err());
    }
}
