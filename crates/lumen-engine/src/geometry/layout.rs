use crate::shader::{ProgramInterface, ShaderError};

use super::GeometryError;

/// What a vertex attribute carries. All components are `f32`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeKind {
    Position2,
    Position3,
    Color3,
    Color4,
    TexCoord2,
}

impl AttributeKind {
    pub fn components(self) -> u32 {
        match self {
            Self::Position2 | Self::TexCoord2 => 2,
            Self::Position3 | Self::Color3 => 3,
            Self::Color4 => 4,
        }
    }

    /// Size in bytes.
    pub fn size(self) -> u64 {
        self.components() as u64 * std::mem::size_of::<f32>() as u64
    }

    pub fn format(self) -> wgpu::VertexFormat {
        match self.components() {
            2 => wgpu::VertexFormat::Float32x2,
            3 => wgpu::VertexFormat::Float32x3,
            _ => wgpu::VertexFormat::Float32x4,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub location: u32,
    pub kind: AttributeKind,
}

impl VertexAttribute {
    pub const fn new(location: u32, kind: AttributeKind) -> Self {
        Self { location, kind }
    }
}

/// Interleaved, tightly packed vertex layout.
///
/// Attributes are stored in declaration order; offsets and stride are derived
/// from their sizes.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    wgpu_attributes: Vec<wgpu::VertexAttribute>,
    stride: u64,
}

impl VertexLayout {
    pub fn new(attributes: &[VertexAttribute]) -> Result<Self, GeometryError> {
        let mut wgpu_attributes = Vec::with_capacity(attributes.len());
        let mut offset = 0u64;

        for (i, attr) in attributes.iter().enumerate() {
            if attributes[..i].iter().any(|a| a.location == attr.location) {
                return Err(GeometryError::DuplicateLocation(attr.location));
            }
            wgpu_attributes.push(wgpu::VertexAttribute {
                format: attr.kind.format(),
                offset,
                shader_location: attr.location,
            });
            offset += attr.kind.size();
        }

        Ok(Self {
            attributes: attributes.to_vec(),
            wgpu_attributes,
            stride: offset,
        })
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Byte offset of the attribute bound to `location`.
    pub fn offset_of(&self, location: u32) -> Option<u64> {
        self.wgpu_attributes
            .iter()
            .find(|a| a.shader_location == location)
            .map(|a| a.offset)
    }

    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.wgpu_attributes,
        }
    }

    /// Checks that every vertex shader input is a float scalar or vector fed
    /// by an attribute of the same width.
    ///
    /// Attributes the shader does not read are allowed.
    pub fn check_against(&self, interface: &ProgramInterface) -> Result<(), ShaderError> {
        let problems: Vec<String> = interface
            .vertex_inputs
            .iter()
            .filter_map(|input| {
                let attr = self.attributes.iter().find(|a| a.location == input.location);
                match (attr, input.components()) {
                    (None, _) => Some(format!(
                        "vertex input at location {} has no matching vertex attribute",
                        input.location
                    )),
                    (Some(a), Some(_)) if !input.is_f32() => Some(format!(
                        "location {}: shader reads {:?}, layout provides f32 {:?}",
                        input.location, input.inner, a.kind
                    )),
                    (Some(a), Some(n)) if a.kind.components() != n => Some(format!(
                        "location {}: shader reads {n} components, layout provides {:?}",
                        input.location, a.kind
                    )),
                    (Some(_), None) => Some(format!(
                        "location {}: unsupported vertex input type {:?}",
                        input.location, input.inner
                    )),
                    _ => None,
                }
            })
            .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ShaderError::Link { log: problems.join("\n") })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::test_sources::{compiled, FRAG, VERT};
    use crate::shader::{link, Stage};

    fn textured() -> VertexLayout {
        VertexLayout::new(&[
            VertexAttribute::new(0, AttributeKind::Position3),
            VertexAttribute::new(1, AttributeKind::Color3),
            VertexAttribute::new(2, AttributeKind::TexCoord2),
        ])
        .unwrap()
    }

    #[test]
    fn stride_and_offsets_are_packed() {
        let layout = textured();
        assert_eq!(layout.stride(), 8 * 4);
        assert_eq!(layout.offset_of(0), Some(0));
        assert_eq!(layout.offset_of(1), Some(3 * 4));
        assert_eq!(layout.offset_of(2), Some(6 * 4));
        assert_eq!(layout.offset_of(7), None);

        let buffer = layout.buffer_layout();
        assert_eq!(buffer.attributes[2].format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn duplicate_locations_rejected() {
        let err = VertexLayout::new(&[
            VertexAttribute::new(0, AttributeKind::Position3),
            VertexAttribute::new(0, AttributeKind::Color3),
        ])
        .unwrap_err();
        assert_eq!(err, GeometryError::DuplicateLocation(0));
    }

    #[test]
    fn layout_checked_against_program_inputs() {
        let program = link(compiled(Stage::Vertex, VERT), compiled(Stage::Fragment, FRAG)).unwrap();

        assert!(textured().check_against(program.interface()).is_ok());

        let position_only =
            VertexLayout::new(&[VertexAttribute::new(0, AttributeKind::Position3)]).unwrap();
        let err = position_only.check_against(program.interface()).unwrap_err();
        assert!(err.log().unwrap().contains("location 1"));

        let narrow = VertexLayout::new(&[
            VertexAttribute::new(0, AttributeKind::Position2),
            VertexAttribute::new(1, AttributeKind::Color3),
        ])
        .unwrap();
        assert!(narrow.check_against(program.interface()).is_err());
    }

    #[test]
    fn integer_inputs_rejected_for_float_attributes() {
        let int_vert = VERT
            .replace("in vec3 aPos", "in ivec3 aPos")
            .replace("vec4(aPos, 1.0)", "vec4(vec3(aPos), 1.0)");
        let program =
            link(compiled(Stage::Vertex, &int_vert), compiled(Stage::Fragment, FRAG)).unwrap();

        let err = textured().check_against(program.interface()).unwrap_err();
        let log = err.log().unwrap();
        assert!(log.contains("location 0"));
        assert!(!log.contains("location 1"));
    }
}
