use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Instant;

use wgpu::util::DeviceExt;

use super::reflect::UniformLayout;
use super::shader::{FULLSCREEN_QUAD, ShaderError, ShaderProgram};
use super::uniform::{UniformBlock, UniformKind, UniformLocation, UniformSink, UniformValue, upload_uniform};
use super::{RenderCtx, RenderTarget};

pub const TIME_UNIFORM: &str = "iTime";
pub const RESOLUTION_UNIFORM: &str = "iResolution";

/// A full-window backdrop drawn before anything else each frame.
pub trait Background {
    /// Clears the target and draws the backdrop into it.
    fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>);

    /// Records a new drawable size. Does not draw.
    fn update_size(&mut self, width: u32, height: u32);

    /// Adds or replaces a custom uniform.
    fn set_uniform(&mut self, name: &str, value: UniformValue);
}

/// A background several screens draw, torn down with its last holder.
pub type SharedBackground = Rc<RefCell<dyn Background>>;

#[derive(Debug, Clone)]
struct CustomUniform {
    name: String,
    value: UniformValue,
    location: Option<UniformLocation>,
}

/// CPU side of a background's uniform block.
///
/// Holds the staged bytes plus every named value and its resolved location.
/// Names the shader does not declare are reported once and then skipped.
#[derive(Debug, Clone)]
pub struct BackgroundUniforms {
    layout: UniformLayout,
    block: UniformBlock,
    time: Option<UniformLocation>,
    resolution: Option<UniformLocation>,
    custom: Vec<CustomUniform>,
    failed: HashSet<String>,
}

impl BackgroundUniforms {
    pub fn new<I>(layout: UniformLayout, uniforms: I) -> Self
    where
        I: IntoIterator<Item = (String, UniformValue)>,
    {
        let size = (layout.size().max(16) as usize).next_multiple_of(16);
        let time = layout.location(TIME_UNIFORM);
        let resolution = layout.location(RESOLUTION_UNIFORM);

        let mut this = Self {
            layout,
            block: UniformBlock::new(size),
            time,
            resolution,
            custom: Vec::new(),
            failed: HashSet::new(),
        };
        for (name, value) in uniforms {
            this.set(&name, value);
        }
        this
    }

    /// Adds or replaces `name`. Resolution happens only on first sight.
    pub fn set(&mut self, name: &str, value: UniformValue) {
        if let Some(existing) = self.custom.iter_mut().find(|c| c.name == name) {
            existing.value = value;
            return;
        }
        let location = self.layout.location(name);
        if location.is_none() {
            log::warn!("background uniform `{name}` is not declared by the shader; ignoring it");
        }
        self.custom.push(CustomUniform {
            name: name.to_owned(),
            value,
            location,
        });
    }

    pub fn value(&self, name: &str) -> Option<&UniformValue> {
        self.custom.iter().find(|c| c.name == name).map(|c| &c.value)
    }

    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        match name {
            TIME_UNIFORM => self.time,
            RESOLUTION_UNIFORM => self.resolution,
            _ => self.custom.iter().find(|c| c.name == name).and_then(|c| c.location),
        }
    }

    /// Writes the built-ins and every resolved custom value into the block.
    pub fn stage(&mut self, elapsed: f32, width: u32, height: u32) -> &[u8] {
        if let Some(loc) = self.time {
            let res = self.block.uniform_1f(&loc, elapsed);
            note_failure(&mut self.failed, TIME_UNIFORM, res);
        }
        if let Some(loc) = self.resolution {
            let res = self.block.uniform_2f(&loc, width as f32, height as f32);
            note_failure(&mut self.failed, RESOLUTION_UNIFORM, res);
        }
        for c in &self.custom {
            let Some(loc) = c.location else { continue };
            let value = widen_for(&c.value, loc.kind);
            let res = upload_uniform(&mut self.block, &loc, &value);
            note_failure(&mut self.failed, &c.name, res);
        }
        self.block.as_bytes()
    }

    pub fn block_size(&self) -> usize {
        self.block.len()
    }
}

/// Integer values aimed at float members are converted component-wise.
/// Anything else is passed through for the sink to type-check.
fn widen_for(value: &UniformValue, kind: UniformKind) -> Cow<'_, UniformValue> {
    if kind != UniformKind::Float {
        return Cow::Borrowed(value);
    }
    match value {
        UniformValue::Bool(b) => Cow::Owned(UniformValue::Float(f32::from(u8::from(*b)))),
        UniformValue::Int(i) => Cow::Owned(UniformValue::Float(*i as f32)),
        UniformValue::IntVec(v) => Cow::Owned(UniformValue::FloatVec(v.iter().map(|i| *i as f32).collect())),
        _ => Cow::Borrowed(value),
    }
}

fn note_failure(failed: &mut HashSet<String>, name: &str, res: Result<(), super::UniformError>) {
    let Err(err) = res else { return };
    if failed.insert(name.to_owned()) {
        log::warn!("failed to upload uniform `{name}`: {err}");
    }
}

/// Shader-driven full-window background.
///
/// Owns its program, a static quad and the uniform buffer. `iTime` counts
/// seconds since construction; `iResolution` is the last size given to
/// [`Background::update_size`].
pub struct BackgroundRenderer {
    program: ShaderProgram,
    uniforms: BackgroundUniforms,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    quad: wgpu::Buffer,
    width: u32,
    height: u32,
    start: Instant,
}

impl BackgroundRenderer {
    pub fn new<I>(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        vertex_source: &str,
        fragment_source: &str,
        uniforms: I,
    ) -> Result<Self, ShaderError>
    where
        I: IntoIterator<Item = (String, UniformValue)>,
    {
        let program = ShaderProgram::build(device, format, vertex_source, fragment_source)?;
        let uniforms = BackgroundUniforms::new(program.uniform_layout().clone(), uniforms);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("roshambo background ubo"),
            size: uniforms.block_size() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("roshambo background bind group"),
            layout: program.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("roshambo background quad"),
            contents: bytemuck::cast_slice(&FULLSCREEN_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!("background ready ({}x{height}, {} uniform bytes)", width, uniforms.block_size());

        Ok(Self {
            program,
            uniforms,
            uniform_buffer,
            bind_group,
            quad,
            width,
            height,
            start: Instant::now(),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn uniforms(&self) -> &BackgroundUniforms {
        &self.uniforms
    }
}

impl Background for BackgroundRenderer {
    fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let elapsed = self.start.elapsed().as_secs_f32();
        let bytes = self.uniforms.stage(elapsed, self.width, self.height);
        ctx.queue.write_buffer(&self.uniform_buffer, 0, bytes);

        let mut rpass = target.begin_pass("roshambo background pass", wgpu::LoadOp::Clear(wgpu::Color::BLACK));

        let w = self.width.min(ctx.viewport.width);
        let h = self.height.min(ctx.viewport.height);
        if w == 0 || h == 0 {
            return;
        }

        rpass.set_viewport(0.0, 0.0, w as f32, h as f32, 0.0, 1.0);
        rpass.set_pipeline(self.program.pipeline());
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad.slice(..));
        rpass.draw(0..FULLSCREEN_QUAD.len() as u32, 0..1);
    }

    fn update_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FS: &str = r#"
struct Params {
    iTime: f32,
    iResolution: vec2<f32>,
    colour_1: vec4<f32>,
    mode: i32,
};

@group(0) @binding(0) var<uniform> params: Params;

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return params.colour_1 * params.iTime * f32(params.mode) / params.iResolution.x;
}
"#;

    fn layout() -> UniformLayout {
        let module = naga::front::wgsl::parse_str(FS).unwrap();
        UniformLayout::reflect(&[&module])
    }

    fn f32_at(bytes: &[u8], at: usize) -> f32 {
        f32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    fn i32_at(bytes: &[u8], at: usize) -> i32 {
        i32::from_ne_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    // ── staging ───────────────────────────────────────────────────────────

    #[test]
    fn builtins_and_customs_are_staged() {
        let mut u = BackgroundUniforms::new(
            layout(),
            [
                ("colour_1".to_owned(), UniformValue::from([0.5f32, 0.25, 1.0, 1.0])),
                ("mode".to_owned(), UniformValue::Int(3)),
            ],
        );
        let bytes = u.stage(1.5, 640, 360).to_vec();

        assert_eq!(f32_at(&bytes, 0), 1.5);
        assert_eq!(f32_at(&bytes, 8), 640.0);
        assert_eq!(f32_at(&bytes, 12), 360.0);
        assert_eq!(f32_at(&bytes, 16), 0.5);
        assert_eq!(f32_at(&bytes, 28), 1.0);
        assert_eq!(i32_at(&bytes, 32), 3);
    }

    #[test]
    fn block_is_padded_to_sixteen() {
        let u = BackgroundUniforms::new(layout(), Vec::<(String, UniformValue)>::new());
        assert_eq!(u.block_size() % 16, 0);
        assert!(u.block_size() >= 36);
    }

    // ── unresolved / failing ──────────────────────────────────────────────

    #[test]
    fn unknown_uniform_is_kept_but_never_uploaded() {
        let mut u = BackgroundUniforms::new(layout(), [("ghost".to_owned(), UniformValue::Float(9.0))]);
        assert!(u.location("ghost").is_none());
        assert_eq!(u.value("ghost"), Some(&UniformValue::Float(9.0)));
        let bytes = u.stage(0.0, 1, 1);
        assert!(!bytes.chunks(4).any(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]) == 9.0));
    }

    #[test]
    fn failed_upload_does_not_stop_the_frame() {
        let mut u = BackgroundUniforms::new(
            layout(),
            [
                ("colour_1".to_owned(), UniformValue::IntVec(vec![1, 2, 3, 4, 5])),
                ("mode".to_owned(), UniformValue::Int(7)),
            ],
        );
        let bytes = u.stage(2.0, 10, 10).to_vec();
        assert_eq!(f32_at(&bytes, 0), 2.0);
        assert_eq!(i32_at(&bytes, 32), 7);
        assert!(u.failed.contains("colour_1"));
    }

    #[test]
    fn integer_colour_reaches_a_float_member_as_floats() {
        let mut u = BackgroundUniforms::new(layout(), [("colour_1".to_owned(), UniformValue::IntVec(vec![1, 0, 0, 1]))]);
        let bytes = u.stage(0.0, 1, 1).to_vec();
        assert_eq!(f32_at(&bytes, 16), 1.0);
        assert_eq!(f32_at(&bytes, 20), 0.0);
        assert_eq!(f32_at(&bytes, 28), 1.0);
        assert!(u.failed.is_empty());
    }

    #[test]
    fn float_for_an_int_member_is_rejected_not_reinterpreted() {
        let mut u = BackgroundUniforms::new(layout(), [("mode".to_owned(), UniformValue::Float(2.0))]);
        let bytes = u.stage(0.0, 1, 1).to_vec();
        assert_eq!(i32_at(&bytes, 32), 0);
        assert!(u.failed.contains("mode"));
    }

    #[test]
    fn set_replaces_existing_value() {
        let mut u = BackgroundUniforms::new(layout(), [("mode".to_owned(), UniformValue::Int(1))]);
        u.set("mode", UniformValue::Int(2));
        assert_eq!(u.value("mode"), Some(&UniformValue::Int(2)));
        assert_eq!(i32_at(u.stage(0.0, 1, 1), 32), 2);
    }
}
