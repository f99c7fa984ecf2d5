use std::collections::BTreeMap;
use std::path::Path;

use wgpu::naga::{self, AddressSpace, Binding, Handle, TypeInner};

use super::{compile, CompiledShader, ShaderError, ShaderSource, Stage, ENTRY_POINT};

/// One location-bound value crossing a stage boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct StageIo {
    pub location: u32,
    pub name: Option<String>,
    pub inner: TypeInner,
}

impl StageIo {
    /// Number of scalar components, for scalars and vectors.
    pub fn components(&self) -> Option<u32> {
        match self.inner {
            TypeInner::Scalar(_) => Some(1),
            TypeInner::Vector { size, .. } => Some(size as u32),
            _ => None,
        }
    }

    /// True for `f32` scalars and vectors, the only inputs a float vertex
    /// attribute can feed.
    pub fn is_f32(&self) -> bool {
        match self.inner {
            TypeInner::Scalar(scalar) | TypeInner::Vector { scalar, .. } => {
                scalar == naga::Scalar::F32
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceKind {
    /// Uniform block; `size` is the block's std140 span in bytes.
    UniformBuffer { size: u32 },
    Texture,
    Sampler,
    /// Anything the mesh pipeline cannot bind (storage buffers, ...).
    Unsupported(String),
}

/// A bound resource and the stages that use it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub group: u32,
    pub binding: u32,
    pub name: Option<String>,
    pub kind: ResourceKind,
    pub visibility: wgpu::ShaderStages,
}

/// Reflected interface of a linked program.
#[derive(Debug, Clone, Default)]
pub struct ProgramInterface {
    /// Vertex shader inputs, sorted by location.
    pub vertex_inputs: Vec<StageIo>,

    /// Resources of both stages, sorted by `(group, binding)`.
    pub resources: Vec<Resource>,
}

impl ProgramInterface {
    /// The first uniform block, if the program declares one.
    pub fn uniform_block(&self) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| matches!(r.kind, ResourceKind::UniformBuffer { .. }))
    }

    pub fn resource(&self, group: u32, binding: u32) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.group == group && r.binding == binding)
    }
}

/// Linked vertex + fragment pair.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    vertex: CompiledShader,
    fragment: CompiledShader,
    interface: ProgramInterface,
}

impl ShaderProgram {
    /// Reads, compiles and links the two stages.
    ///
    /// Diagnostics are logged at `error` level and returned; nothing is
    /// retried.
    pub fn load(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let result = Self::read_and_link(vertex_path.as_ref(), fragment_path.as_ref());
        if let Err(e) = &result {
            log::error!("{e}");
        }
        result
    }

    fn read_and_link(vertex_path: &Path, fragment_path: &Path) -> Result<Self, ShaderError> {
        let vertex = ShaderSource::read(vertex_path, Stage::Vertex)?;
        let fragment = ShaderSource::read(fragment_path, Stage::Fragment)?;
        Self::from_sources(&vertex, &fragment)
    }

    pub fn from_sources(
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        link(compile(vertex)?, compile(fragment)?)
    }

    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }

    pub fn interface(&self) -> &ProgramInterface {
        &self.interface
    }

    /// Creates the device-side modules for both stages.
    pub fn create_modules(&self, device: &wgpu::Device) -> (wgpu::ShaderModule, wgpu::ShaderModule) {
        let create = |shader: &CompiledShader| {
            let label = format!("lumen {} shader", shader.stage());
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&label),
                source: wgpu::ShaderSource::Naga(std::borrow::Cow::Owned(shader.module.clone())),
            })
        };
        (create(&self.vertex), create(&self.fragment))
    }
}

/// Links two compiled stages.
///
/// Checks, in order: stage kinds, entry points, that every fragment input is
/// written by the vertex stage with the same type, and that resources shared
/// by both stages agree. All problems are collected into one log.
pub fn link(vertex: CompiledShader, fragment: CompiledShader) -> Result<ShaderProgram, ShaderError> {
    let mut problems = Vec::new();

    for (shader, expected) in [(&vertex, Stage::Vertex), (&fragment, Stage::Fragment)] {
        if shader.stage() != expected {
            problems.push(format!(
                "'{}' is a {} shader, expected {expected}",
                shader.source.path.display(),
                shader.stage()
            ));
        } else if entry_point(&shader.module, expected).is_none() {
            problems.push(format!(
                "{expected} shader '{}' has no '{ENTRY_POINT}' entry point",
                shader.source.path.display()
            ));
        }
    }

    if !problems.is_empty() {
        return Err(ShaderError::link(problems));
    }

    let (vertex_inputs, vertex_outputs) = stage_io(&vertex.module, Stage::Vertex);
    let (fragment_inputs, _) = stage_io(&fragment.module, Stage::Fragment);

    for input in &fragment_inputs {
        match vertex_outputs.iter().find(|o| o.location == input.location) {
            None => problems.push(format!(
                "fragment input {} at location {} is not written by the vertex shader",
                display_name(input),
                input.location
            )),
            Some(output) if output.inner != input.inner => problems.push(format!(
                "location {}: vertex writes {:?} but fragment reads {:?}",
                input.location, output.inner, input.inner
            )),
            Some(_) => {}
        }
    }

    let mut resources: BTreeMap<(u32, u32), Resource> = BTreeMap::new();
    for shader in [&vertex, &fragment] {
        for res in stage_resources(&shader.module, shader.stage()) {
            match resources.get_mut(&(res.group, res.binding)) {
                None => {
                    resources.insert((res.group, res.binding), res);
                }
                Some(existing) if existing.kind == res.kind => {
                    existing.visibility |= res.visibility;
                }
                Some(existing) => problems.push(format!(
                    "binding (set {}, binding {}) is {:?} in one stage and {:?} in the other",
                    res.group, res.binding, existing.kind, res.kind
                )),
            }
        }
    }

    if !problems.is_empty() {
        return Err(ShaderError::link(problems));
    }

    log::debug!(
        "linked program: {} vertex inputs, {} resources",
        vertex_inputs.len(),
        resources.len()
    );

    Ok(ShaderProgram {
        vertex,
        fragment,
        interface: ProgramInterface {
            vertex_inputs,
            resources: resources.into_values().collect(),
        },
    })
}

fn entry_point(module: &naga::Module, stage: Stage) -> Option<&naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == ENTRY_POINT && ep.stage == stage.to_naga())
}

/// Returns `(inputs, outputs)` of the stage's entry point, sorted by location.
fn stage_io(module: &naga::Module, stage: Stage) -> (Vec<StageIo>, Vec<StageIo>) {
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    if let Some(ep) = entry_point(module, stage) {
        for arg in &ep.function.arguments {
            collect_io(module, arg.name.clone(), arg.binding.as_ref(), arg.ty, &mut inputs);
        }
        if let Some(result) = &ep.function.result {
            collect_io(module, None, result.binding.as_ref(), result.ty, &mut outputs);
        }
    }

    inputs.sort_by_key(|io| io.location);
    outputs.sort_by_key(|io| io.location);
    (inputs, outputs)
}

fn collect_io(
    module: &naga::Module,
    name: Option<String>,
    binding: Option<&Binding>,
    ty: Handle<naga::Type>,
    out: &mut Vec<StageIo>,
) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(Binding::Location { location, .. }) => out.push(StageIo {
            location: *location,
            name,
            inner: inner.clone(),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for member in members {
                    collect_io(module, member.name.clone(), member.binding.as_ref(), member.ty, out);
                }
            }
        }
    }
}

fn stage_resources(module: &naga::Module, stage: Stage) -> Vec<Resource> {
    module
        .global_variables
        .iter()
        .filter_map(|(_, var)| {
            let rb = var.binding.as_ref()?;
            let inner = &module.types[var.ty].inner;
            let kind = match (var.space, inner) {
                (AddressSpace::Uniform, TypeInner::Struct { span, .. }) => {
                    ResourceKind::UniformBuffer { size: *span }
                }
                (AddressSpace::Uniform, other) => ResourceKind::UniformBuffer {
                    size: other.size(module.to_ctx()),
                },
                (AddressSpace::Handle, TypeInner::Image { .. }) => ResourceKind::Texture,
                (AddressSpace::Handle, TypeInner::Sampler { .. }) => ResourceKind::Sampler,
                (space, _) => ResourceKind::Unsupported(format!("{space:?}")),
            };
            Some(Resource {
                group: rb.group,
                binding: rb.binding,
                name: var.name.clone(),
                kind,
                visibility: stage.to_wgpu(),
            })
        })
        .collect()
}

fn display_name(io: &StageIo) -> String {
    io.name
        .as_deref()
        .map_or_else(|| "<unnamed>".to_string(), |n| format!("'{n}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::test_sources::{compiled, FRAG, VERT};

    #[test]
    fn matching_stages_link() {
        let program = link(compiled(Stage::Vertex, VERT), compiled(Stage::Fragment, FRAG)).unwrap();
        let iface = program.interface();

        let locations: Vec<_> = iface.vertex_inputs.iter().map(|i| i.location).collect();
        assert_eq!(locations, vec![0, 1]);
        assert!(iface.vertex_inputs.iter().all(|i| i.components() == Some(3)));

        let block = iface.uniform_block().expect("uniform block reflected");
        assert_eq!((block.group, block.binding), (0, 0));
        assert!(matches!(block.kind, ResourceKind::UniformBuffer { size } if size >= 4));
        assert_eq!(block.visibility, wgpu::ShaderStages::VERTEX);
    }

    #[test]
    fn unwritten_fragment_input_fails_to_link() {
        let frag = FRAG.replace("location = 0) in vec3 vColor", "location = 3) in vec3 vColor");
        let err = link(compiled(Stage::Vertex, VERT), compiled(Stage::Fragment, &frag)).unwrap_err();
        let log = err.log().unwrap();
        assert!(log.contains("location 3"), "{log}");
    }

    #[test]
    fn type_mismatch_fails_to_link() {
        let frag = FRAG
            .replace("in vec3 vColor", "in vec2 vColor")
            .replace("vec4(vColor, 1.0)", "vec4(vColor, 0.0, 1.0)");
        let err = link(compiled(Stage::Vertex, VERT), compiled(Stage::Fragment, &frag)).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn swapped_stages_fail_to_link() {
        let err = link(compiled(Stage::Fragment, FRAG), compiled(Stage::Vertex, VERT)).unwrap_err();
        assert!(err.log().unwrap().contains("expected vertex"));
    }

    #[test]
    fn shared_binding_visibility_is_merged() {
        let frag = r#"#version 450 core
layout(location = 0) in vec3 vColor;
layout(location = 0) out vec4 fragColor;
layout(set = 0, binding = 0) uniform Uniforms { float changingNum; } u;
void main() {
    fragColor = vec4(vColor * u.changingNum, 1.0);
}
"#;
        let program = link(compiled(Stage::Vertex, VERT), compiled(Stage::Fragment, frag)).unwrap();
        let block = program.interface().resource(0, 0).unwrap();
        assert_eq!(
            block.visibility,
            wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT
        );
    }

    #[test]
    fn conflicting_binding_kinds_fail_to_link() {
        let frag = r#"#version 450 core
layout(location = 0) in vec3 vColor;
layout(location = 0) out vec4 fragColor;
layout(set = 0, binding = 0) uniform sampler samp;
layout(set = 0, binding = 1) uniform texture2D tex;
void main() {
    fragColor = texture(sampler2D(tex, samp), vColor.xy);
}
"#;
        let err = link(compiled(Stage::Vertex, VERT), compiled(Stage::Fragment, frag)).unwrap_err();
        assert!(err.log().unwrap().contains("binding 0"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ShaderProgram::load("does/not/exist.vert", "does/not/exist.frag").unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(err.log().is_none());
    }
}
