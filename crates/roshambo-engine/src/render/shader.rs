//! Shader programs: WGSL compilation, stage linking and pipeline creation.
//!
//! Stages are validated with naga before wgpu sees them, so a broken shader
//! surfaces as a [`ShaderError`] carrying the compiler log instead of a
//! device-level panic.

use std::collections::BTreeSet;
use std::error::Error as _;
use std::fmt;

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use super::reflect::UniformLayout;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to compile:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("shader program failed to link:\n{log}")]
    Link { log: String },
}

/// Parses and validates one WGSL stage.
pub fn compile_stage(source: &str, stage: ShaderStage) -> Result<naga::Module, ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Compile {
        stage,
        log: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator.validate(&module).map_err(|e| {
        let mut log = e.to_string();
        let mut cause = e.source();
        while let Some(c) = cause {
            log.push_str(&format!("\n  caused by: {c}"));
            cause = c.source();
        }
        ShaderError::Compile { stage, log }
    })?;

    Ok(module)
}

/// Checks the two stages form a program.
///
/// The vertex module must expose `vs_main`, the fragment module `fs_main`,
/// and every `@location` the fragment stage reads must be written by the
/// vertex stage.
pub fn link(vertex: &naga::Module, fragment: &naga::Module) -> Result<(), ShaderError> {
    let vs = find_entry(vertex, naga::ShaderStage::Vertex, VERTEX_ENTRY)?;
    let fs = find_entry(fragment, naga::ShaderStage::Fragment, FRAGMENT_ENTRY)?;

    let mut written = BTreeSet::new();
    if let Some(result) = vs.function.result.as_ref() {
        collect_locations(vertex, result.ty, result.binding.as_ref(), &mut written);
    }

    let mut read = BTreeSet::new();
    for arg in &fs.function.arguments {
        collect_locations(fragment, arg.ty, arg.binding.as_ref(), &mut read);
    }

    let missing: Vec<String> = read.difference(&written).map(|l| format!("@location({l})")).collect();
    if !missing.is_empty() {
        return Err(ShaderError::Link {
            log: format!("fragment inputs not written by the vertex stage: {}", missing.join(", ")),
        });
    }
    Ok(())
}

fn find_entry<'m>(
    module: &'m naga::Module,
    stage: naga::ShaderStage,
    name: &str,
) -> Result<&'m naga::EntryPoint, ShaderError> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage && ep.name == name)
        .ok_or_else(|| ShaderError::Link {
            log: format!("missing {stage:?} entry point `{name}`"),
        })
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

// ── vertex layout ─────────────────────────────────────────────────────────

/// Position-only vertex consumed at `@location(0)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct PositionVertex {
    pub pos: [f32; 2],
}

impl PositionVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PositionVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Two triangles covering NDC.
pub(crate) const FULLSCREEN_QUAD: [PositionVertex; 6] = [
    PositionVertex { pos: [-1.0, -1.0] },
    PositionVertex { pos: [1.0, -1.0] },
    PositionVertex { pos: [1.0, 1.0] },
    PositionVertex { pos: [-1.0, -1.0] },
    PositionVertex { pos: [1.0, 1.0] },
    PositionVertex { pos: [-1.0, 1.0] },
];

// ── program ───────────────────────────────────────────────────────────────

/// A linked vertex + fragment pair ready to draw.
pub struct ShaderProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    layout: UniformLayout,
}

impl ShaderProgram {
    /// Compiles, links and reflects both stages, then builds the pipeline.
    pub fn build(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = compile_stage(vertex_source, ShaderStage::Vertex)?;
        let fragment = compile_stage(fragment_source, ShaderStage::Fragment)?;
        link(&vertex, &fragment)?;
        let layout = UniformLayout::reflect(&[&fragment, &vertex]);

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("roshambo background vs"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("roshambo background fs"),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("roshambo background bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("roshambo background pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("roshambo background pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[PositionVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            bind_group_layout,
            layout,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn uniform_layout(&self) -> &UniformLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = r#"
struct VsOut {
    @builtin(position) pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) pos: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.pos = vec4<f32>(pos, 0.0, 1.0);
    out.uv = pos * 0.5 + vec2<f32>(0.5);
    return out;
}
"#;

    const FS: &str = r#"
@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(uv, 0.0, 1.0);
}
"#;

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn valid_stages_compile() {
        assert!(compile_stage(VS, ShaderStage::Vertex).is_ok());
        assert!(compile_stage(FS, ShaderStage::Fragment).is_ok());
    }

    #[test]
    fn syntax_error_carries_log() {
        let err = compile_stage("fn fs_main( -> {", ShaderStage::Fragment).unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(!log.trim().is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        let err = compile_stage(src, ShaderStage::Fragment).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: ShaderStage::Fragment, .. }));
    }

    // ── link ──────────────────────────────────────────────────────────────

    #[test]
    fn matching_stages_link() {
        let vs = compile_stage(VS, ShaderStage::Vertex).unwrap();
        let fs = compile_stage(FS, ShaderStage::Fragment).unwrap();
        assert!(link(&vs, &fs).is_ok());
    }

    #[test]
    fn unwritten_fragment_input_fails_to_link() {
        let fs_src = r#"
@fragment
fn fs_main(@location(3) tint: vec4<f32>) -> @location(0) vec4<f32> {
    return tint;
}
"#;
        let vs = compile_stage(VS, ShaderStage::Vertex).unwrap();
        let fs = compile_stage(fs_src, ShaderStage::Fragment).unwrap();
        match link(&vs, &fs) {
            Err(ShaderError::Link { log }) => assert!(log.contains("@location(3)")),
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn missing_entry_point_fails_to_link() {
        let fs_src = "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }";
        let vs = compile_stage(VS, ShaderStage::Vertex).unwrap();
        let fs = compile_stage(fs_src, ShaderStage::Fragment).unwrap();
        match link(&vs, &fs) {
            Err(ShaderError::Link { log }) => assert!(log.contains("fs_main")),
            other => panic!("expected link error, got {other:?}"),
        }
    }

    #[test]
    fn quad_covers_ndc() {
        let xs: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.pos[0]).collect();
        let ys: Vec<f32> = FULLSCREEN_QUAD.iter().map(|v| v.pos[1]).collect();
        assert!(xs.contains(&-1.0) && xs.contains(&1.0));
        assert!(ys.contains(&-1.0) && ys.contains(&1.0));
    }
}
