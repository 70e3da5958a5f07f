use std::collections::HashMap;

use naga::{AddressSpace, ArraySize, ScalarKind, TypeInner};

use super::uniform::{UniformKind, UniformLocation};

/// Group/binding the uniform block must be declared at.
pub const UNIFORM_GROUP: u32 = 0;
pub const UNIFORM_BINDING: u32 = 0;

/// Named member locations of the uniform block, read from shader modules.
#[derive(Debug, Clone, Default)]
pub struct UniformLayout {
    members: HashMap<String, UniformLocation>,
    size: u32,
}

impl UniformLayout {
    /// Reflects the `var<uniform>` at group 0 binding 0 across `modules`.
    ///
    /// Members seen in an earlier module win. Modules without the block
    /// contribute nothing; no block at all yields an empty layout.
    pub fn reflect(modules: &[&naga::Module]) -> Self {
        let mut layout = Self::default();
        for module in modules {
            layout.merge(module);
        }
        layout
    }

    fn merge(&mut self, module: &naga::Module) {
        let block = module.global_variables.iter().find(|(_, var)| {
            var.space == AddressSpace::Uniform
                && var
                    .binding
                    .as_ref()
                    .is_some_and(|b| b.group == UNIFORM_GROUP && b.binding == UNIFORM_BINDING)
        });
        let Some((_, var)) = block else { return };

        let gctx = module.to_ctx();
        let inner = &module.types[var.ty].inner;
        let TypeInner::Struct { members, span } = inner else {
            // A bare value block is addressable under the variable's own name.
            if let Some(name) = var.name.as_ref() {
                let size = inner.size(gctx);
                self.members.entry(name.clone()).or_insert(UniformLocation {
                    offset: 0,
                    size,
                    stride: array_stride(inner),
                    kind: scalar_kind(module, inner),
                });
                self.size = self.size.max(size);
            }
            return;
        };

        for member in members {
            let Some(name) = member.name.as_ref() else { continue };
            let ty = &module.types[member.ty].inner;
            self.members.entry(name.clone()).or_insert(UniformLocation {
                offset: member.offset,
                size: ty.size(gctx),
                stride: array_stride(ty),
                kind: scalar_kind(module, ty),
            });
        }
        self.size = self.size.max(*span);
    }

    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.members.get(name).copied()
    }

    /// Byte size of the block.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

fn array_stride(ty: &TypeInner) -> Option<u32> {
    match ty {
        TypeInner::Array { size: ArraySize::Constant(_), stride, .. } => Some(*stride),
        _ => None,
    }
}

/// Component kind of a member, looking through arrays.
fn scalar_kind(module: &naga::Module, ty: &TypeInner) -> UniformKind {
    let scalar = match ty {
        TypeInner::Scalar(s) | TypeInner::Atomic(s) => *s,
        TypeInner::Vector { scalar, .. } | TypeInner::Matrix { scalar, .. } => *scalar,
        TypeInner::Array { base, .. } => return scalar_kind(module, &module.types[*base].inner),
        _ => return UniformKind::Float,
    };
    match scalar.kind {
        ScalarKind::Sint | ScalarKind::AbstractInt => UniformKind::Sint,
        ScalarKind::Uint => UniformKind::Uint,
        _ => UniformKind::Float,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> naga::Module {
        naga::front::wgsl::parse_str(src).unwrap()
    }

    const FRAGMENT: &str = r#"
struct Params {
    iTime: f32,
    iResolution: vec2<f32>,
    colour_1: vec4<f32>,
    colour_2: vec4<f32>,
    colour_3: vec4<f32>,
    weights: array<vec4<f32>, 2>,
};

@group(0) @binding(0) var<uniform> params: Params;

@fragment
fn fs_main(@builtin(position) p: vec4<f32>) -> @location(0) vec4<f32> {
    return params.colour_1 * params.iTime + vec4<f32>(p.xy / params.iResolution, 0.0, 1.0);
}
"#;

    // ── offsets ───────────────────────────────────────────────────────────

    #[test]
    fn members_have_aligned_offsets() {
        let module = parse(FRAGMENT);
        let layout = UniformLayout::reflect(&[&module]);

        let at = |n: &str| layout.location(n).map(|l| (l.offset, l.size));
        assert_eq!(at("iTime"), Some((0, 4)));
        assert_eq!(at("iResolution"), Some((8, 8)));
        assert_eq!(at("colour_1"), Some((16, 16)));
        assert_eq!(at("colour_2"), Some((32, 16)));
        assert_eq!(at("colour_3"), Some((48, 16)));
        assert_eq!(layout.size(), 96);
    }

    #[test]
    fn arrays_report_stride() {
        let module = parse(FRAGMENT);
        let layout = UniformLayout::reflect(&[&module]);
        let weights = layout.location("weights").unwrap();
        assert_eq!((weights.offset, weights.size, weights.stride), (64, 32, Some(16)));
        assert_eq!(layout.location("iTime").unwrap().stride, None);
    }

    #[test]
    fn members_record_their_component_kind() {
        let module = parse(
            r#"
struct P { tint: vec4<f32>, mode: i32, flags: vec2<u32>, steps: array<vec4<i32>, 2> };
@group(0) @binding(0) var<uniform> p: P;
@fragment
fn fs_main() -> @location(0) vec4<f32> { return p.tint * f32(p.mode + p.steps[0].x) * f32(p.flags.x); }
"#,
        );
        let layout = UniformLayout::reflect(&[&module]);
        let kind = |n: &str| layout.location(n).map(|l| l.kind);
        assert_eq!(kind("tint"), Some(UniformKind::Float));
        assert_eq!(kind("mode"), Some(UniformKind::Sint));
        assert_eq!(kind("flags"), Some(UniformKind::Uint));
        assert_eq!(kind("steps"), Some(UniformKind::Sint));
    }

    // ── absence ───────────────────────────────────────────────────────────

    #[test]
    fn unknown_name_is_absent() {
        let module = parse(FRAGMENT);
        assert!(UniformLayout::reflect(&[&module]).location("nope").is_none());
    }

    #[test]
    fn other_bindings_are_ignored() {
        let module = parse(
            r#"
struct P { a: f32 };
@group(1) @binding(0) var<uniform> p: P;
@fragment
fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(p.a); }
"#,
        );
        let layout = UniformLayout::reflect(&[&module]);
        assert!(layout.is_empty());
        assert_eq!(layout.size(), 0);
    }
}
