//! SQL Server `VECTOR` values.
//!
//! A [`Vector`] always holds its elements as `f32`, whatever element type it
//! is stored as on the server. Narrowing to float16 happens only when the
//! value is encoded; values decoded from float16 storage are widened exactly.

use core::fmt;

use bytes::{Bytes, BytesMut};

use crate::error::TypeError;

/// Smallest dimension count SQL Server accepts.
pub const MIN_DIMENSIONS: usize = 1;

/// Absolute tolerance used by [`floats_approx_eq`].
const APPROX_ABS_TOLERANCE: f32 = 1e-6;

/// Relative tolerance used by [`floats_approx_eq`].
const APPROX_REL_TOLERANCE: f32 = 1e-6;

/// Element storage type of a `VECTOR` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum VectorElementType {
    /// IEEE-754 single precision, 4 bytes per element.
    #[default]
    Float32 = 0x00,
    /// IEEE-754 half precision, 2 bytes per element.
    Float16 = 0x01,
}

impl VectorElementType {
    /// Map the header tag byte to an element type.
    pub fn from_u8(tag: u8) -> Result<Self, TypeError> {
        match tag {
            0x00 => Ok(Self::Float32),
            0x01 => Ok(Self::Float16),
            other => Err(TypeError::UnsupportedElementType(other)),
        }
    }

    /// Header tag byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Encoded size of one element in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::Float32 => 4,
            Self::Float16 => 2,
        }
    }

    /// Largest dimension count allowed for this element type.
    ///
    /// Both limits correspond to the same 7,992-byte payload ceiling.
    #[must_use]
    pub const fn max_dimensions(self) -> usize {
        match self {
            Self::Float32 => 1998,
            Self::Float16 => 3996,
        }
    }

    /// Name used in SQL type declarations.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float32 => "float32",
            Self::Float16 => "float16",
        }
    }

    pub(crate) fn check_dimensions(self, dimensions: usize) -> Result<(), TypeError> {
        let max = self.max_dimensions();
        if !(MIN_DIMENSIONS..=max).contains(&dimensions) {
            return Err(TypeError::InvalidDimensions {
                dimensions,
                min: MIN_DIMENSIONS,
                max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for VectorElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fixed-length array of floating point values.
///
/// `Vector` deliberately does not implement `PartialEq`: float16 storage and
/// JSON text both lose precision, so exact comparison is rarely what a caller
/// wants. Use [`Vector::approx_eq`] instead.
#[derive(Debug, Clone)]
pub struct Vector {
    element_type: VectorElementType,
    data: Vec<f32>,
}

impl Vector {
    /// Create a float32 vector.
    pub fn new(data: Vec<f32>) -> Result<Self, TypeError> {
        Self::with_element_type(VectorElementType::Float32, data)
    }

    /// Create a vector stored as the given element type.
    ///
    /// The values are kept as given; float16 rounding is applied on encode.
    pub fn with_element_type(
        element_type: VectorElementType,
        data: Vec<f32>,
    ) -> Result<Self, TypeError> {
        element_type.check_dimensions(data.len())?;
        Ok(Self { element_type, data })
    }

    /// Create a float32 vector from `f64` values, narrowing each element.
    pub fn from_f64(values: &[f64]) -> Result<Self, TypeError> {
        Self::new(values.iter().map(|&v| v as f32).collect())
    }

    /// Element storage type.
    #[must_use]
    pub fn element_type(&self) -> VectorElementType {
        self.element_type
    }

    /// Number of elements.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// The elements.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Take the elements.
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// Size of the native binary encoding, header included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        crate::encode::VECTOR_HEADER_LEN + self.data.len() * self.element_type.size()
    }

    /// Encode to the native binary layout.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        crate::encode::encode_vector(self, &mut buf);
        buf.freeze()
    }

    /// Compare element type and values using [`floats_approx_eq`].
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.element_type == other.element_type && floats_approx_eq(&self.data, &other.data)
    }
}

/// Element-wise float comparison with a small tolerance.
///
/// NaN matches NaN and infinities must match exactly. Any other pair matches
/// when the absolute or the relative difference is below `1e-6`.
#[must_use]
pub fn floats_approx_eq(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| float_approx_eq(x, y))
}

fn float_approx_eq(a: f32, b: f32) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    let diff = (a - b).abs();
    if diff < APPROX_ABS_TOLERANCE {
        return true;
    }
    diff / a.abs().max(b.abs()) < APPROX_REL_TOLERANCE
}

/// A vector that may be SQL `NULL`.
#[derive(Debug, Clone, Default)]
pub struct NullVector(Option<Vector>);

impl NullVector {
    /// The `NULL` value.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    /// Returns true when a vector is present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// The vector, unless `NULL`.
    #[must_use]
    pub fn vector(&self) -> Option<&Vector> {
        self.0.as_ref()
    }

    /// Convert into an `Option`.
    #[must_use]
    pub fn into_option(self) -> Option<Vector> {
        self.0
    }
}

impl From<Vector> for NullVector {
    fn from(vector: Vector) -> Self {
        Self(Some(vector))
    }
}

impl From<Option<Vector>> for NullVector {
    fn from(vector: Option<Vector>) -> Self {
        Self(vector)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_tags() {
        assert_eq!(
            VectorElementType::from_u8(0x00).unwrap(),
            VectorElementType::Float32
        );
        assert_eq!(
            VectorElementType::from_u8(0x01).unwrap(),
            VectorElementType::Float16
        );
        assert_eq!(
            VectorElementType::from_u8(0x07),
            Err(TypeError::UnsupportedElementType(0x07))
        );
        assert_eq!(VectorElementType::Float16.as_u8(), 0x01);
        assert_eq!(VectorElementType::Float16.to_string(), "float16");
    }

    #[test]
    fn test_new_defaults_to_float32() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(v.element_type(), VectorElementType::Float32);
        assert_eq!(v.dimensions(), 3);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(v.encoded_len(), 8 + 12);
    }

    #[test]
    fn test_dimension_bounds() {
        assert_eq!(
            Vector::new(Vec::new()).unwrap_err(),
            TypeError::InvalidDimensions {
                dimensions: 0,
                min: 1,
                max: 1998
            }
        );
        assert!(Vector::new(vec![0.0; 1998]).is_ok());
        assert!(Vector::new(vec![0.0; 1999]).is_err());
        assert!(Vector::with_element_type(VectorElementType::Float16, vec![0.0; 3996]).is_ok());
        assert_eq!(
            Vector::with_element_type(VectorElementType::Float16, vec![0.0; 3997]).unwrap_err(),
            TypeError::InvalidDimensions {
                dimensions: 3997,
                min: 1,
                max: 3996
            }
        );
    }

    #[test]
    fn test_float16_construction_keeps_values() {
        let v = Vector::with_element_type(VectorElementType::Float16, vec![0.1, 1e-9]).unwrap();
        assert_eq!(v.as_slice(), &[0.1, 1e-9]);
        assert_eq!(v.encoded_len(), 8 + 4);
    }

    #[test]
    fn test_from_f64_narrows() {
        let v = Vector::from_f64(&[0.5, 1.0 / 3.0]).unwrap();
        assert_eq!(v.as_slice(), &[0.5, (1.0f64 / 3.0) as f32]);
    }

    #[test]
    fn test_floats_approx_eq() {
        assert!(floats_approx_eq(&[f32::NAN], &[f32::NAN]));
        assert!(!floats_approx_eq(&[f32::NAN], &[0.0]));
        assert!(floats_approx_eq(&[f32::INFINITY], &[f32::INFINITY]));
        assert!(!floats_approx_eq(&[f32::INFINITY], &[f32::NEG_INFINITY]));
        assert!(!floats_approx_eq(&[f32::INFINITY], &[f32::MAX]));
        assert!(floats_approx_eq(&[1.0], &[1.0 + 5e-7]));
        assert!(floats_approx_eq(&[1e30], &[1.000_000_5e30]));
        assert!(!floats_approx_eq(&[1.0], &[1.001]));
        assert!(!floats_approx_eq(&[1.0], &[1.0, 2.0]));
        assert!(floats_approx_eq(&[0.0], &[-0.0]));
    }

    #[test]
    fn test_approx_eq_requires_same_element_type() {
        let a = Vector::new(vec![1.0, 2.0]).unwrap();
        let b = Vector::with_element_type(VectorElementType::Float16, vec![1.0, 2.0]).unwrap();
        assert!(a.approx_eq(&a.clone()));
        assert!(!a.approx_eq(&b));
    }

    #[test]
    fn test_null_vector() {
        let null = NullVector::null();
        assert!(!null.is_valid());
        assert!(null.vector().is_none());

        let valid = NullVector::from(Vector::new(vec![1.0]).unwrap());
        assert!(valid.is_valid());
        assert_eq!(valid.vector().unwrap().dimensions(), 1);
        assert!(valid.into_option().is_some());

        assert!(!NullVector::from(None).is_valid());
    }
}
