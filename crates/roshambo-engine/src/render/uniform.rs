//! Uniform values and the upload protocol that maps them onto GPU writes.

use std::fmt;

use thiserror::Error;

/// A shader parameter value of one of the supported shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    IntVec(Vec<i32>),
    FloatVec(Vec<f32>),
}

impl UniformValue {
    /// Number of components the value carries.
    pub fn arity(&self) -> usize {
        match self {
            UniformValue::Bool(_) | UniformValue::Int(_) | UniformValue::Float(_) => 1,
            UniformValue::IntVec(v) => v.len(),
            UniformValue::FloatVec(v) => v.len(),
        }
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec<i32>> for UniformValue {
    fn from(v: Vec<i32>) -> Self {
        UniformValue::IntVec(v)
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(v: Vec<f32>) -> Self {
        UniformValue::FloatVec(v)
    }
}

impl<const N: usize> From<[i32; N]> for UniformValue {
    fn from(v: [i32; N]) -> Self {
        UniformValue::IntVec(v.to_vec())
    }
}

impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(v: [f32; N]) -> Self {
        UniformValue::FloatVec(v.to_vec())
    }
}

impl fmt::Display for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Bool(v) => write!(f, "{v}"),
            UniformValue::Int(v) => write!(f, "{v}"),
            UniformValue::Float(v) => write!(f, "{v}"),
            UniformValue::IntVec(v) => write!(f, "{v:?}"),
            UniformValue::FloatVec(v) => write!(f, "{v:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UniformError {
    #[error("unsupported uniform type: {found}")]
    UnsupportedType { found: String },

    #[error("unsupported uniform arity: {len} components")]
    UnsupportedArity { len: usize },

    #[error("uniform write of {len} bytes at offset {offset} exceeds capacity {capacity}")]
    OutOfBounds { offset: u32, len: u32, capacity: u32 },
}

/// Scalar kind of a uniform member's components.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UniformKind {
    Float,
    Sint,
    Uint,
}

impl UniformKind {
    pub fn is_integer(self) -> bool {
        matches!(self, UniformKind::Sint | UniformKind::Uint)
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniformKind::Float => "f32",
            UniformKind::Sint => "i32",
            UniformKind::Uint => "u32",
        })
    }
}

/// Where a named uniform lives inside the uniform block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UniformLocation {
    /// Byte offset from the start of the block.
    pub offset: u32,
    /// Byte size of the member.
    pub size: u32,
    /// Element stride when the member is an array.
    pub stride: Option<u32>,
    /// Component kind the shader declares for the member.
    pub kind: UniformKind,
}

/// Receiver of typed uniform writes.
///
/// One method per (kind, arity) pair. Bulk float arrays are optional; sinks
/// that cannot store them keep the default, which rejects the write.
pub trait UniformSink {
    fn uniform_1i(&mut self, loc: &UniformLocation, x: i32) -> Result<(), UniformError>;
    fn uniform_2i(&mut self, loc: &UniformLocation, x: i32, y: i32) -> Result<(), UniformError>;
    fn uniform_3i(&mut self, loc: &UniformLocation, x: i32, y: i32, z: i32) -> Result<(), UniformError>;
    fn uniform_4i(&mut self, loc: &UniformLocation, x: i32, y: i32, z: i32, w: i32) -> Result<(), UniformError>;

    fn uniform_1f(&mut self, loc: &UniformLocation, x: f32) -> Result<(), UniformError>;
    fn uniform_2f(&mut self, loc: &UniformLocation, x: f32, y: f32) -> Result<(), UniformError>;
    fn uniform_3f(&mut self, loc: &UniformLocation, x: f32, y: f32, z: f32) -> Result<(), UniformError>;
    fn uniform_4f(&mut self, loc: &UniformLocation, x: f32, y: f32, z: f32, w: f32) -> Result<(), UniformError>;

    fn uniform_1fv(&mut self, _loc: &UniformLocation, values: &[f32]) -> Result<(), UniformError> {
        Err(UniformError::UnsupportedArity { len: values.len() })
    }
}

/// Issues the single sink call matching `value`'s kind and arity.
pub fn upload_uniform<S>(sink: &mut S, loc: &UniformLocation, value: &UniformValue) -> Result<(), UniformError>
where
    S: UniformSink + ?Sized,
{
    match value {
        UniformValue::Bool(b) => sink.uniform_1i(loc, i32::from(*b)),
        UniformValue::Int(i) => sink.uniform_1i(loc, *i),
        UniformValue::Float(f) => sink.uniform_1f(loc, *f),

        UniformValue::IntVec(v) => match v.as_slice() {
            [x] => sink.uniform_1i(loc, *x),
            [x, y] => sink.uniform_2i(loc, *x, *y),
            [x, y, z] => sink.uniform_3i(loc, *x, *y, *z),
            [x, y, z, w] => sink.uniform_4i(loc, *x, *y, *z, *w),
            other => Err(UniformError::UnsupportedArity { len: other.len() }),
        },

        UniformValue::FloatVec(v) => match v.as_slice() {
            [] => Err(UniformError::UnsupportedArity { len: 0 }),
            [x] => sink.uniform_1f(loc, *x),
            [x, y] => sink.uniform_2f(loc, *x, *y),
            [x, y, z] => sink.uniform_3f(loc, *x, *y, *z),
            [x, y, z, w] => sink.uniform_4f(loc, *x, *y, *z, *w),
            many => sink.uniform_1fv(loc, many),
        },
    }
}

/// CPU staging bytes for one uniform buffer.
///
/// Writes land at the member's offset and never spill past its size.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    bytes: Vec<u8>,
}

impl UniformBlock {
    pub fn new(size: usize) -> Self {
        Self { bytes: vec![0; size] }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn check(&self, loc: &UniformLocation, rel: u32, len: u32) -> Result<usize, UniformError> {
        let oob = || UniformError::OutOfBounds {
            offset: loc.offset + rel,
            len,
            capacity: loc.size,
        };
        let end = rel.checked_add(len).ok_or_else(oob)?;
        if end > loc.size {
            return Err(oob());
        }
        let start = (loc.offset + rel) as usize;
        if start + len as usize > self.bytes.len() {
            return Err(oob());
        }
        Ok(start)
    }

    /// Integer calls only reach integer members and float calls float ones.
    fn check_kind(loc: &UniformLocation, integer: bool) -> Result<(), UniformError> {
        if loc.kind.is_integer() == integer {
            return Ok(());
        }
        let given = if integer { "int" } else { "float" };
        Err(UniformError::UnsupportedType {
            found: format!("{given} data for a {} member", loc.kind),
        })
    }

    fn write_ints(&mut self, loc: &UniformLocation, values: &[i32]) -> Result<(), UniformError> {
        Self::check_kind(loc, true)?;
        let words: Vec<[u8; 4]> = values.iter().map(|v| v.to_ne_bytes()).collect();
        self.write_words(loc, &words)
    }

    fn write_floats(&mut self, loc: &UniformLocation, values: &[f32]) -> Result<(), UniformError> {
        Self::check_kind(loc, false)?;
        let words: Vec<[u8; 4]> = values.iter().map(|v| v.to_ne_bytes()).collect();
        self.write_words(loc, &words)
    }

    fn write_words(&mut self, loc: &UniformLocation, words: &[[u8; 4]]) -> Result<(), UniformError> {
        let start = self.check(loc, 0, (words.len() * 4) as u32)?;
        for (i, w) in words.iter().enumerate() {
            self.bytes[start + i * 4..start + i * 4 + 4].copy_from_slice(w);
        }
        Ok(())
    }
}

impl UniformSink for UniformBlock {
    fn uniform_1i(&mut self, loc: &UniformLocation, x: i32) -> Result<(), UniformError> {
        self.write_ints(loc, &[x])
    }

    fn uniform_2i(&mut self, loc: &UniformLocation, x: i32, y: i32) -> Result<(), UniformError> {
        self.write_ints(loc, &[x, y])
    }

    fn uniform_3i(&mut self, loc: &UniformLocation, x: i32, y: i32, z: i32) -> Result<(), UniformError> {
        self.write_ints(loc, &[x, y, z])
    }

    fn uniform_4i(&mut self, loc: &UniformLocation, x: i32, y: i32, z: i32, w: i32) -> Result<(), UniformError> {
        self.write_ints(loc, &[x, y, z, w])
    }

    fn uniform_1f(&mut self, loc: &UniformLocation, x: f32) -> Result<(), UniformError> {
        self.write_floats(loc, &[x])
    }

    fn uniform_2f(&mut self, loc: &UniformLocation, x: f32, y: f32) -> Result<(), UniformError> {
        self.write_floats(loc, &[x, y])
    }

    fn uniform_3f(&mut self, loc: &UniformLocation, x: f32, y: f32, z: f32) -> Result<(), UniformError> {
        self.write_floats(loc, &[x, y, z])
    }

    fn uniform_4f(&mut self, loc: &UniformLocation, x: f32, y: f32, z: f32, w: f32) -> Result<(), UniformError> {
        self.write_floats(loc, &[x, y, z, w])
    }

    /// Array members are written one element per stride; plain members
    /// (matrices) take the floats back to back.
    fn uniform_1fv(&mut self, loc: &UniformLocation, values: &[f32]) -> Result<(), UniformError> {
        if values.is_empty() {
            return Err(UniformError::UnsupportedArity { len: 0 });
        }
        Self::check_kind(loc, false)?;
        let stride = loc.stride.unwrap_or(4);
        let span = (values.len() as u32 - 1) * stride + 4;
        self.check(loc, 0, span)?;
        for (i, v) in values.iter().enumerate() {
            let start = self.check(loc, i as u32 * stride, 4)?;
            self.bytes[start..start + 4].copy_from_slice(&v.to_ne_bytes());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        I(Vec<i32>),
        F(Vec<f32>),
        Fv(Vec<f32>),
    }

    /// Sink that records the call it received.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, Call)>,
    }

    impl UniformSink for Recorder {
        fn uniform_1i(&mut self, _: &UniformLocation, x: i32) -> Result<(), UniformError> {
            self.calls.push(("1i", Call::I(vec![x])));
            Ok(())
        }
        fn uniform_2i(&mut self, _: &UniformLocation, x: i32, y: i32) -> Result<(), UniformError> {
            self.calls.push(("2i", Call::I(vec![x, y])));
            Ok(())
        }
        fn uniform_3i(&mut self, _: &UniformLocation, x: i32, y: i32, z: i32) -> Result<(), UniformError> {
            self.calls.push(("3i", Call::I(vec![x, y, z])));
            Ok(())
        }
        fn uniform_4i(&mut self, _: &UniformLocation, x: i32, y: i32, z: i32, w: i32) -> Result<(), UniformError> {
            self.calls.push(("4i", Call::I(vec![x, y, z, w])));
            Ok(())
        }
        fn uniform_1f(&mut self, _: &UniformLocation, x: f32) -> Result<(), UniformError> {
            self.calls.push(("1f", Call::F(vec![x])));
            Ok(())
        }
        fn uniform_2f(&mut self, _: &UniformLocation, x: f32, y: f32) -> Result<(), UniformError> {
            self.calls.push(("2f", Call::F(vec![x, y])));
            Ok(())
        }
        fn uniform_3f(&mut self, _: &UniformLocation, x: f32, y: f32, z: f32) -> Result<(), UniformError> {
            self.calls.push(("3f", Call::F(vec![x, y, z])));
            Ok(())
        }
        fn uniform_4f(&mut self, _: &UniformLocation, x: f32, y: f32, z: f32, w: f32) -> Result<(), UniformError> {
            self.calls.push(("4f", Call::F(vec![x, y, z, w])));
            Ok(())
        }
        fn uniform_1fv(&mut self, _: &UniformLocation, values: &[f32]) -> Result<(), UniformError> {
            self.calls.push(("1fv", Call::Fv(values.to_vec())));
            Ok(())
        }
    }

    /// Sink without bulk support.
    struct NoBulk;

    impl UniformSink for NoBulk {
        fn uniform_1i(&mut self, _: &UniformLocation, _: i32) -> Result<(), UniformError> { Ok(()) }
        fn uniform_2i(&mut self, _: &UniformLocation, _: i32, _: i32) -> Result<(), UniformError> { Ok(()) }
        fn uniform_3i(&mut self, _: &UniformLocation, _: i32, _: i32, _: i32) -> Result<(), UniformError> { Ok(()) }
        fn uniform_4i(&mut self, _: &UniformLocation, _: i32, _: i32, _: i32, _: i32) -> Result<(), UniformError> { Ok(()) }
        fn uniform_1f(&mut self, _: &UniformLocation, _: f32) -> Result<(), UniformError> { Ok(()) }
        fn uniform_2f(&mut self, _: &UniformLocation, _: f32, _: f32) -> Result<(), UniformError> { Ok(()) }
        fn uniform_3f(&mut self, _: &UniformLocation, _: f32, _: f32, _: f32) -> Result<(), UniformError> { Ok(()) }
        fn uniform_4f(&mut self, _: &UniformLocation, _: f32, _: f32, _: f32, _: f32) -> Result<(), UniformError> { Ok(()) }
    }

    const LOC: UniformLocation = UniformLocation { offset: 0, size: 16, stride: None, kind: UniformKind::Float };

    fn upload(value: impl Into<UniformValue>) -> (Result<(), UniformError>, Recorder) {
        let mut rec = Recorder::default();
        let res = upload_uniform(&mut rec, &LOC, &value.into());
        (res, rec)
    }

    // ── dispatch ──────────────────────────────────────────────────────────

    #[test]
    fn three_floats_use_uniform_3f() {
        let (res, rec) = upload([0.1f32, 0.2, 0.3]);
        assert!(res.is_ok());
        assert_eq!(rec.calls, vec![("3f", Call::F(vec![0.1, 0.2, 0.3]))]);
    }

    #[test]
    fn two_ints_use_uniform_2i() {
        let (res, rec) = upload([3i32, 4]);
        assert!(res.is_ok());
        assert_eq!(rec.calls, vec![("2i", Call::I(vec![3, 4]))]);
    }

    #[test]
    fn bool_uploads_as_int() {
        let (_, rec) = upload(true);
        assert_eq!(rec.calls, vec![("1i", Call::I(vec![1]))]);
    }

    #[test]
    fn scalar_float_uses_uniform_1f() {
        let (_, rec) = upload(2.5f32);
        assert_eq!(rec.calls, vec![("1f", Call::F(vec![2.5]))]);
    }

    #[test]
    fn five_floats_use_bulk_upload() {
        let (res, rec) = upload(vec![1.0f32, 2.0, 3.0, 4.0, 5.0]);
        assert!(res.is_ok());
        assert_eq!(rec.calls, vec![("1fv", Call::Fv(vec![1.0, 2.0, 3.0, 4.0, 5.0]))]);
    }

    // ── rejection ─────────────────────────────────────────────────────────

    #[test]
    fn five_ints_are_unsupported() {
        let (res, rec) = upload(vec![1i32, 2, 3, 4, 5]);
        assert_eq!(res, Err(UniformError::UnsupportedArity { len: 5 }));
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn empty_vectors_are_unsupported() {
        assert_eq!(upload(Vec::<f32>::new()).0, Err(UniformError::UnsupportedArity { len: 0 }));
        assert_eq!(upload(Vec::<i32>::new()).0, Err(UniformError::UnsupportedArity { len: 0 }));
    }

    #[test]
    fn bulk_defaults_to_unsupported() {
        let res = upload_uniform(&mut NoBulk, &LOC, &UniformValue::FloatVec(vec![0.0; 6]));
        assert_eq!(res, Err(UniformError::UnsupportedArity { len: 6 }));
    }

    // ── staging block ─────────────────────────────────────────────────────

    fn read_f32(block: &UniformBlock, at: usize) -> f32 {
        let b = block.as_bytes();
        f32::from_ne_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
    }

    #[test]
    fn block_writes_at_member_offset() {
        let mut block = UniformBlock::new(32);
        let loc = UniformLocation { offset: 16, size: 16, stride: None, kind: UniformKind::Float };
        upload_uniform(&mut block, &loc, &UniformValue::from([1.0f32, 2.0, 3.0, 4.0])).unwrap();
        assert_eq!(read_f32(&block, 16), 1.0);
        assert_eq!(read_f32(&block, 28), 4.0);
        assert_eq!(read_f32(&block, 0), 0.0);
    }

    #[test]
    fn block_never_truncates_oversized_writes() {
        let mut block = UniformBlock::new(32);
        let vec3 = UniformLocation { offset: 16, size: 12, stride: None, kind: UniformKind::Float };
        let err = upload_uniform(&mut block, &vec3, &UniformValue::from([1.0f32; 4])).unwrap_err();
        assert!(matches!(err, UniformError::OutOfBounds { capacity: 12, .. }));
        assert!(block.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn block_bulk_respects_array_stride() {
        let mut block = UniformBlock::new(96);
        let arr = UniformLocation { offset: 16, size: 80, stride: Some(16), kind: UniformKind::Float };
        upload_uniform(&mut block, &arr, &UniformValue::from(vec![1.0f32, 2.0, 3.0, 4.0, 5.0])).unwrap();
        assert_eq!(read_f32(&block, 16), 1.0);
        assert_eq!(read_f32(&block, 32), 2.0);
        assert_eq!(read_f32(&block, 80), 5.0);

        let err = upload_uniform(&mut block, &arr, &UniformValue::from(vec![0.0f32; 6])).unwrap_err();
        assert!(matches!(err, UniformError::OutOfBounds { .. }));
    }

    #[test]
    fn block_rejects_int_data_for_float_members() {
        let mut block = UniformBlock::new(32);
        let colour = UniformLocation { offset: 16, size: 16, stride: None, kind: UniformKind::Float };
        let err = upload_uniform(&mut block, &colour, &UniformValue::from([1i32, 0, 0, 1])).unwrap_err();
        assert!(matches!(err, UniformError::UnsupportedType { .. }));
        assert!(block.as_bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn block_rejects_float_data_for_int_members() {
        let mut block = UniformBlock::new(16);
        let mode = UniformLocation { offset: 0, size: 4, stride: None, kind: UniformKind::Sint };
        assert!(upload_uniform(&mut block, &mode, &UniformValue::Float(1.0)).is_err());
        upload_uniform(&mut block, &mode, &UniformValue::Bool(true)).unwrap();
        assert_eq!(&block.as_bytes()[..4], &1i32.to_ne_bytes()[..]);
    }
}
